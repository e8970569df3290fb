use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{dtos::CustomerRequest, errors::ApiError},
  application::billing::*,
};

/// List customers, newest first
/// GET /api/v1/customers
pub async fn list_customers_handler(
  use_case: web::Data<Arc<ListCustomersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Create customer
/// POST /api/v1/customers
pub async fn create_customer_handler(
  request: web::Json<CustomerRequest>,
  use_case: web::Data<Arc<CreateCustomerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let command = CreateCustomerCommand {
    name: request.name,
    tax_id: request.tax_id,
    address: request.address,
    city: request.city,
    postal_code: request.postal_code,
    province: request.province,
    phone: request.phone,
  };

  let customer = use_case.execute(command).await?;
  Ok(HttpResponse::Created().json(customer))
}

/// Update customer
/// PUT /api/v1/customers/{id}
pub async fn update_customer_handler(
  customer_id: web::Path<Uuid>,
  request: web::Json<CustomerRequest>,
  use_case: web::Data<Arc<UpdateCustomerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let command = UpdateCustomerCommand {
    customer_id: customer_id.into_inner(),
    name: request.name,
    tax_id: request.tax_id,
    address: request.address,
    city: request.city,
    postal_code: request.postal_code,
    province: request.province,
    phone: request.phone,
  };

  let customer = use_case.execute(command).await?;
  Ok(HttpResponse::Ok().json(customer))
}

/// Delete customer, refused while work lines or invoices reference it
/// DELETE /api/v1/customers/{id}
pub async fn delete_customer_handler(
  customer_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteCustomerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(DeleteCustomerCommand {
      customer_id: customer_id.into_inner(),
    })
    .await?;

  Ok(HttpResponse::NoContent().finish())
}
