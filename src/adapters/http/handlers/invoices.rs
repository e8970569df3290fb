use actix_web::{HttpRequest, HttpResponse, http::header::ContentType, web};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
  adapters::http::{dtos::IssueInvoiceRequest, errors::ApiError, middleware::RequestIdExt},
  application::billing::*,
};

/// Customers with unbilled work and the number the next invoice would get
/// GET /api/v1/pending
pub async fn list_pending_handler(
  use_case: web::Data<Arc<ListPendingUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Unbilled lines of one customer
/// GET /api/v1/pending/{customer_id}
pub async fn customer_pending_handler(
  customer_id: web::Path<Uuid>,
  use_case: web::Data<Arc<ListPendingUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.for_customer(customer_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Invoice history, newest first
/// GET /api/v1/invoices
pub async fn list_invoices_handler(
  use_case: web::Data<Arc<ListInvoicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Bill every pending line of a customer
/// POST /api/v1/invoices
///
/// Answers 204 when the customer has nothing pending.
pub async fn issue_invoice_handler(
  request: web::Json<IssueInvoiceRequest>,
  use_case: web::Data<Arc<IssueInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let customer_id = request.customer_id;
  tracing::debug!(
    "Issuing invoice for customer {} (request {:?})",
    customer_id,
    http_req.request_id()
  );

  match use_case.execute(IssueInvoiceCommand { customer_id }).await? {
    Some(issued) => Ok(HttpResponse::Created().json(issued)),
    None => Ok(HttpResponse::NoContent().finish()),
  }
}

/// Reverse an invoice: release its lines and delete it
/// DELETE /api/v1/invoices/{id}
pub async fn reverse_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<ReverseInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = invoice_id.into_inner();
  tracing::debug!(
    "Reversing invoice {} (request {:?})",
    invoice_id,
    http_req.request_id()
  );

  let response = use_case.execute(ReverseInvoiceCommand { invoice_id }).await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Printable HTML document
/// GET /api/v1/invoices/{id}/print
pub async fn print_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<PrintInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let html = use_case
    .execute(PrintInvoiceCommand {
      invoice_id: invoice_id.into_inner(),
    })
    .await?;

  Ok(
    HttpResponse::Ok()
      .content_type(ContentType::html())
      .body(html),
  )
}
