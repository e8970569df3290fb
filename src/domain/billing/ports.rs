use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Customer, Invoice, InvoiceDraft, Item, WorkLine};
use super::errors::BillingError;
use super::printable::PrintableInvoice;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
  async fn create(&self, customer: Customer) -> Result<Customer, BillingError>;
  async fn update(&self, customer: Customer) -> Result<Customer, BillingError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, BillingError>;
  /// Newest first.
  async fn list(&self) -> Result<Vec<Customer>, BillingError>;
  async fn delete(&self, id: Uuid) -> Result<(), BillingError>;
  /// True while any work line or invoice references the customer.
  async fn has_references(&self, id: Uuid) -> Result<bool, BillingError>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
  async fn create(&self, item: Item) -> Result<Item, BillingError>;
  async fn update(&self, item: Item) -> Result<Item, BillingError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, BillingError>;
  /// Newest first.
  async fn list(&self) -> Result<Vec<Item>, BillingError>;
  async fn delete(&self, id: Uuid) -> Result<(), BillingError>;
  async fn has_work_lines(&self, id: Uuid) -> Result<bool, BillingError>;
}

/// Every listing returns lines by work date, then creation order.
#[async_trait]
pub trait WorkLineRepository: Send + Sync {
  async fn create(&self, line: WorkLine) -> Result<WorkLine, BillingError>;
  async fn update(&self, line: WorkLine) -> Result<WorkLine, BillingError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkLine>, BillingError>;
  async fn delete(&self, id: Uuid) -> Result<(), BillingError>;
  async fn list(&self) -> Result<Vec<WorkLine>, BillingError>;
  async fn list_by_invoice(&self, invoice_id: Uuid) -> Result<Vec<WorkLine>, BillingError>;
  async fn list_unbilled_by_customer(
    &self,
    customer_id: Uuid,
  ) -> Result<Vec<WorkLine>, BillingError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, BillingError>;
  /// Most recently issued first.
  async fn list(&self) -> Result<Vec<Invoice>, BillingError>;
}

/// Transactional boundary around invoice issuance and reversal.
///
/// Implementations must make each call all-or-nothing: either the invoice
/// exists and every listed line points at it, or nothing changed.
#[async_trait]
pub trait InvoiceLedger: Send + Sync {
  /// Reserves the next number of the draft's issue year, stores the invoice
  /// and claims every line in `draft.line_ids`. Fails with
  /// `BillingError::Consistency` if any of those lines is no longer an
  /// unbilled line of the customer.
  async fn issue(&self, draft: InvoiceDraft) -> Result<Invoice, BillingError>;

  /// Releases every line claimed by the invoice, then deletes it. Returns
  /// the number of released lines.
  async fn reverse(&self, invoice_id: Uuid) -> Result<u64, BillingError>;
}

pub trait InvoiceRenderer: Send + Sync {
  fn render(&self, invoice: &PrintableInvoice) -> Result<String, BillingError>;
}
