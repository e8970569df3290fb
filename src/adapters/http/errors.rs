use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::billing::BillingError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Invalid input or a missing selection (400 Bad Request)
  Validation(String),

  /// Referenced record does not exist (404 Not Found)
  NotFound(String),

  /// Request conflicts with the billing state (409 Conflict)
  Conflict(ConflictKind, String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Billing conflict kinds
#[derive(Debug, Clone, Copy, Serialize)]
pub enum ConflictKind {
  /// Work line already claimed by an invoice
  LineAlreadyInvoiced,

  /// Customer or item still referenced by work lines or invoices
  StillReferenced,

  /// Issuance claim no longer matched the pending set
  Consistency,
}

impl ConflictKind {
  fn code(self) -> &'static str {
    match self {
      ConflictKind::LineAlreadyInvoiced => "line_already_invoiced",
      ConflictKind::StillReferenced => "still_referenced",
      ConflictKind::Consistency => "consistency_error",
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(kind, msg) => write!(f, "Conflict ({:?}): {}", kind, msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(..) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Conflict(kind, msg) => (kind.code(), msg.clone()),
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert BillingError to ApiError
impl From<BillingError> for ApiError {
  fn from(error: BillingError) -> Self {
    match error {
      BillingError::Validation(err) => ApiError::Validation(err.to_string()),
      BillingError::MissingReference(msg) => ApiError::Validation(msg),
      e @ (BillingError::CustomerNotFound(_)
      | BillingError::ItemNotFound(_)
      | BillingError::WorkLineNotFound(_)
      | BillingError::InvoiceNotFound(_)) => ApiError::NotFound(e.to_string()),
      e @ BillingError::LineAlreadyInvoiced { .. } => {
        ApiError::Conflict(ConflictKind::LineAlreadyInvoiced, e.to_string())
      }
      e @ (BillingError::CustomerHasWorkLines(_) | BillingError::ItemHasWorkLines(_)) => {
        ApiError::Conflict(ConflictKind::StillReferenced, e.to_string())
      }
      BillingError::Consistency(msg) => {
        tracing::error!("Billing consistency check failed: {}", msg);
        ApiError::Conflict(
          ConflictKind::Consistency,
          "Pending lines changed while issuing; nothing was written, please retry".to_string(),
        )
      }
      BillingError::Render(msg) => ApiError::Internal(format!("Render error: {}", msg)),
      BillingError::Repository(msg) => ApiError::Internal(format!("Repository error: {}", msg)),
      BillingError::Database(err) => ApiError::Internal(format!("Database error: {}", err)),
    }
  }
}

impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::billing::ValueObjectError;
  use uuid::Uuid;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::NotFound("test".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Conflict(ConflictKind::Consistency, "test".to_string()).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_billing_error_conversion() {
    let api_error: ApiError = BillingError::Validation(ValueObjectError::InvalidQuantity(
      "Quantity must be greater than zero".to_string(),
    ))
    .into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError =
      BillingError::MissingReference("A customer must be selected".to_string()).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError = BillingError::InvoiceNotFound(Uuid::new_v4()).into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError = BillingError::LineAlreadyInvoiced {
      line_id: Uuid::new_v4(),
      invoice_id: Uuid::new_v4(),
    }
    .into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = BillingError::CustomerHasWorkLines(Uuid::new_v4()).into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = BillingError::Repository("connection reset".to_string()).into();
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[actix_web::test]
  async fn test_internal_details_not_exposed() {
    let api_error: ApiError = BillingError::Repository("password=secret".to_string()).into();
    let response = api_error.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("internal_error"));
    assert!(!body.contains("secret"));
  }
}
