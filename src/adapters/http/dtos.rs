use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for creating or updating a customer
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Customer name must be between 1 and 255 characters"
  ))]
  pub name: String,

  /// NIF/CIF
  #[validate(length(max = 64, message = "Tax id is too long"))]
  pub tax_id: Option<String>,

  pub address: Option<String>,

  #[validate(length(max = 255, message = "City is too long"))]
  pub city: Option<String>,

  #[validate(length(max = 32, message = "Postal code is too long"))]
  pub postal_code: Option<String>,

  #[validate(length(max = 255, message = "Province is too long"))]
  pub province: Option<String>,

  #[validate(length(max = 64, message = "Phone is too long"))]
  pub phone: Option<String>,
}

/// Request body for creating or updating a catalog item
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ItemRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Item name must be between 1 and 255 characters"
  ))]
  pub name: String,

  /// Missing means zero
  #[serde(default)]
  pub price: Option<Decimal>,

  #[validate(length(max = 128, message = "SKU is too long"))]
  pub sku: Option<String>,
}

/// Request body for recording delivered work
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkLineRequest {
  pub customer_id: Option<Uuid>,

  pub item_id: Option<Uuid>,

  /// Defaults to 1
  #[serde(default)]
  pub qty: Option<Decimal>,

  /// Defaults to the item's price
  #[serde(default)]
  pub price: Option<Decimal>,

  #[validate(length(max = 2000, message = "Notes are too long"))]
  pub notes: Option<String>,

  pub work_date: NaiveDate,
}

/// Request body for editing an unbilled work line
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorkLineRequest {
  pub qty: Decimal,

  pub price: Decimal,

  #[validate(length(max = 2000, message = "Notes are too long"))]
  pub notes: Option<String>,

  pub work_date: NaiveDate,
}

/// Query string of the work line list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkLineQuery {
  pub customer_id: Option<Uuid>,
}

/// Request body for issuing an invoice
#[derive(Debug, Clone, Deserialize)]
pub struct IssueInvoiceRequest {
  pub customer_id: Uuid,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
