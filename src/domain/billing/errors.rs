use super::value_objects::ValueObjectError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BillingError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Missing reference: {0}")]
  MissingReference(String),

  #[error("Customer not found: {0}")]
  CustomerNotFound(Uuid),

  #[error("Item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("Work line not found: {0}")]
  WorkLineNotFound(Uuid),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("Work line {line_id} is already claimed by invoice {invoice_id}")]
  LineAlreadyInvoiced { line_id: Uuid, invoice_id: Uuid },

  #[error("Customer {0} still has work lines or invoices")]
  CustomerHasWorkLines(Uuid),

  #[error("Item {0} is still used by work lines")]
  ItemHasWorkLines(Uuid),

  #[error("Consistency error: {0}")]
  Consistency(String),

  #[error("Render error: {0}")]
  Render(String),

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
