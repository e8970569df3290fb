use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{dtos::ItemRequest, errors::ApiError},
  application::billing::*,
};

/// List catalog items, newest first
/// GET /api/v1/items
pub async fn list_items_handler(
  use_case: web::Data<Arc<ListItemsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Create item
/// POST /api/v1/items
pub async fn create_item_handler(
  request: web::Json<ItemRequest>,
  use_case: web::Data<Arc<CreateItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let item = use_case
    .execute(CreateItemCommand {
      name: request.name,
      price: request.price,
      sku: request.sku,
    })
    .await?;

  Ok(HttpResponse::Created().json(item))
}

/// Update item; existing work lines keep their own price
/// PUT /api/v1/items/{id}
pub async fn update_item_handler(
  item_id: web::Path<Uuid>,
  request: web::Json<ItemRequest>,
  use_case: web::Data<Arc<UpdateItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let item = use_case
    .execute(UpdateItemCommand {
      item_id: item_id.into_inner(),
      name: request.name,
      price: request.price,
      sku: request.sku,
    })
    .await?;

  Ok(HttpResponse::Ok().json(item))
}

/// Delete item
/// DELETE /api/v1/items/{id}
pub async fn delete_item_handler(
  item_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(DeleteItemCommand {
      item_id: item_id.into_inner(),
    })
    .await?;

  Ok(HttpResponse::NoContent().finish())
}
