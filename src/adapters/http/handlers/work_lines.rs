use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{CreateWorkLineRequest, UpdateWorkLineRequest, WorkLineQuery},
    errors::ApiError,
  },
  application::billing::*,
};

/// List work lines, optionally for one customer, with the pending total
/// GET /api/v1/work-lines?customer_id=
pub async fn list_work_lines_handler(
  query: web::Query<WorkLineQuery>,
  use_case: web::Data<Arc<ListWorkLinesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case
    .execute(ListWorkLinesCommand {
      customer_id: query.customer_id,
    })
    .await?;

  Ok(HttpResponse::Ok().json(response))
}

/// Record delivered work
/// POST /api/v1/work-lines
pub async fn create_work_line_handler(
  request: web::Json<CreateWorkLineRequest>,
  use_case: web::Data<Arc<AddWorkLineUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let line = use_case
    .execute(AddWorkLineCommand {
      customer_id: request.customer_id,
      item_id: request.item_id,
      qty: request.qty,
      price: request.price,
      notes: request.notes,
      work_date: request.work_date,
    })
    .await?;

  Ok(HttpResponse::Created().json(line))
}

/// Edit an unbilled work line
/// PUT /api/v1/work-lines/{id}
pub async fn update_work_line_handler(
  line_id: web::Path<Uuid>,
  request: web::Json<UpdateWorkLineRequest>,
  use_case: web::Data<Arc<UpdateWorkLineUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let line = use_case
    .execute(UpdateWorkLineCommand {
      line_id: line_id.into_inner(),
      qty: request.qty,
      price: request.price,
      notes: request.notes,
      work_date: request.work_date,
    })
    .await?;

  Ok(HttpResponse::Ok().json(line))
}

/// Delete an unbilled work line
/// DELETE /api/v1/work-lines/{id}
pub async fn delete_work_line_handler(
  line_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteWorkLineUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(DeleteWorkLineCommand {
      line_id: line_id.into_inner(),
    })
    .await?;

  Ok(HttpResponse::NoContent().finish())
}
