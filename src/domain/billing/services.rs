use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use super::aggregation::{
  PendingSummary, compute_pending_by_customer, compute_pending_summaries, compute_total,
  filter_lines,
};
use super::entities::{Customer, Invoice, InvoiceDraft, IssuedInvoice, Item, WorkLine};
use super::errors::BillingError;
use super::numbering::next_invoice_number;
use super::ports::{
  CustomerRepository, InvoiceLedger, InvoiceRepository, ItemRepository, WorkLineRepository,
};
use super::value_objects::{CustomerDetails, CustomerName, InvoiceNumber, ItemName, Price, Quantity};

/// Work line creation data
pub struct NewWorkLine {
  pub customer_id: Option<Uuid>,
  pub item_id: Option<Uuid>,
  pub quantity: Quantity,
  /// Falls back to the item's current price when absent.
  pub price: Option<Price>,
  pub notes: Option<String>,
  pub work_date: NaiveDate,
}

/// Editable fields of an unbilled work line
pub struct WorkLineChanges {
  pub quantity: Quantity,
  pub price: Price,
  pub work_date: NaiveDate,
  pub notes: Option<String>,
}

/// Outcome of a reversal
#[derive(Debug, Clone)]
pub struct ReversedInvoice {
  pub invoice: Invoice,
  pub released_lines: u64,
}

pub struct BillingServiceDependencies {
  pub customer_repo: Arc<dyn CustomerRepository>,
  pub item_repo: Arc<dyn ItemRepository>,
  pub work_line_repo: Arc<dyn WorkLineRepository>,
  pub invoice_repo: Arc<dyn InvoiceRepository>,
  pub ledger: Arc<dyn InvoiceLedger>,
}

pub struct BillingService {
  customer_repo: Arc<dyn CustomerRepository>,
  item_repo: Arc<dyn ItemRepository>,
  work_line_repo: Arc<dyn WorkLineRepository>,
  invoice_repo: Arc<dyn InvoiceRepository>,
  ledger: Arc<dyn InvoiceLedger>,
}

impl BillingService {
  pub fn new(deps: BillingServiceDependencies) -> Self {
    Self {
      customer_repo: deps.customer_repo,
      item_repo: deps.item_repo,
      work_line_repo: deps.work_line_repo,
      invoice_repo: deps.invoice_repo,
      ledger: deps.ledger,
    }
  }

  // Customer operations
  pub async fn create_customer(
    &self,
    name: CustomerName,
    details: CustomerDetails,
  ) -> Result<Customer, BillingError> {
    let customer = Customer::new(name, details);
    self.customer_repo.create(customer).await
  }

  pub async fn update_customer(
    &self,
    customer_id: Uuid,
    name: CustomerName,
    details: CustomerDetails,
  ) -> Result<Customer, BillingError> {
    let mut customer = self.get_customer(customer_id).await?;
    customer.update(name, details);
    self.customer_repo.update(customer).await
  }

  /// Refuses to delete a customer that still has work lines or invoices.
  pub async fn delete_customer(&self, customer_id: Uuid) -> Result<(), BillingError> {
    self.get_customer(customer_id).await?;

    if self.customer_repo.has_references(customer_id).await? {
      return Err(BillingError::CustomerHasWorkLines(customer_id));
    }

    self.customer_repo.delete(customer_id).await
  }

  pub async fn get_customer(&self, customer_id: Uuid) -> Result<Customer, BillingError> {
    self
      .customer_repo
      .find_by_id(customer_id)
      .await?
      .ok_or(BillingError::CustomerNotFound(customer_id))
  }

  pub async fn list_customers(&self) -> Result<Vec<Customer>, BillingError> {
    self.customer_repo.list().await
  }

  // Item operations
  pub async fn create_item(
    &self,
    name: ItemName,
    price: Price,
    sku: Option<String>,
  ) -> Result<Item, BillingError> {
    let item = Item::new(name, price, sku);
    self.item_repo.create(item).await
  }

  pub async fn update_item(
    &self,
    item_id: Uuid,
    name: ItemName,
    price: Price,
    sku: Option<String>,
  ) -> Result<Item, BillingError> {
    let mut item = self.get_item(item_id).await?;
    item.update(name, price, sku);
    self.item_repo.update(item).await
  }

  pub async fn delete_item(&self, item_id: Uuid) -> Result<(), BillingError> {
    self.get_item(item_id).await?;

    if self.item_repo.has_work_lines(item_id).await? {
      return Err(BillingError::ItemHasWorkLines(item_id));
    }

    self.item_repo.delete(item_id).await
  }

  pub async fn get_item(&self, item_id: Uuid) -> Result<Item, BillingError> {
    self
      .item_repo
      .find_by_id(item_id)
      .await?
      .ok_or(BillingError::ItemNotFound(item_id))
  }

  pub async fn list_items(&self) -> Result<Vec<Item>, BillingError> {
    self.item_repo.list().await
  }

  // Work line operations
  pub async fn add_work_line(&self, data: NewWorkLine) -> Result<WorkLine, BillingError> {
    let customer_id = data
      .customer_id
      .ok_or_else(|| BillingError::MissingReference("A customer must be selected".to_string()))?;
    let item_id = data
      .item_id
      .ok_or_else(|| BillingError::MissingReference("An item must be selected".to_string()))?;

    self.get_customer(customer_id).await?;
    let item = self.get_item(item_id).await?;

    let price = data.price.unwrap_or(item.price);
    let line = WorkLine::new(
      customer_id,
      item_id,
      data.quantity,
      price,
      data.notes,
      data.work_date,
    );

    self.work_line_repo.create(line).await
  }

  pub async fn update_work_line(
    &self,
    line_id: Uuid,
    changes: WorkLineChanges,
  ) -> Result<WorkLine, BillingError> {
    let mut line = self.get_work_line(line_id).await?;
    line.update(
      changes.quantity,
      changes.price,
      changes.work_date,
      changes.notes,
    )?;
    self.work_line_repo.update(line).await
  }

  /// Invoiced lines cannot be deleted until their invoice is reversed.
  pub async fn delete_work_line(&self, line_id: Uuid) -> Result<(), BillingError> {
    let line = self.get_work_line(line_id).await?;
    line.ensure_unbilled()?;
    self.work_line_repo.delete(line_id).await
  }

  pub async fn get_work_line(&self, line_id: Uuid) -> Result<WorkLine, BillingError> {
    self
      .work_line_repo
      .find_by_id(line_id)
      .await?
      .ok_or(BillingError::WorkLineNotFound(line_id))
  }

  pub async fn list_work_lines(
    &self,
    customer_filter: Option<Uuid>,
  ) -> Result<Vec<WorkLine>, BillingError> {
    let lines = self.work_line_repo.list().await?;
    Ok(filter_lines(&lines, customer_filter))
  }

  // Aggregation
  pub async fn pending_by_customer(&self) -> Result<BTreeMap<Uuid, Vec<WorkLine>>, BillingError> {
    let lines = self.work_line_repo.list().await?;
    Ok(compute_pending_by_customer(&lines))
  }

  pub async fn pending_summaries(&self) -> Result<Vec<PendingSummary>, BillingError> {
    let lines = self.work_line_repo.list().await?;
    Ok(compute_pending_summaries(&lines))
  }

  /// The number the next issuance will most likely get. Informational only;
  /// the ledger assigns the real one atomically.
  pub async fn preview_next_invoice_number(
    &self,
    today: NaiveDate,
  ) -> Result<InvoiceNumber, BillingError> {
    let invoices = self.invoice_repo.list().await?;
    Ok(next_invoice_number(&invoices, today.year())?)
  }

  // Invoice operations
  pub async fn issue_invoice(
    &self,
    customer_id: Uuid,
  ) -> Result<Option<IssuedInvoice>, BillingError> {
    self.issue_invoice_at(customer_id, Utc::now()).await
  }

  /// Bills every unbilled line of the customer in one invoice.
  ///
  /// Returns `Ok(None)` without writing anything when there is nothing to
  /// bill.
  pub async fn issue_invoice_at(
    &self,
    customer_id: Uuid,
    issued_at: DateTime<Utc>,
  ) -> Result<Option<IssuedInvoice>, BillingError> {
    let pending = self
      .work_line_repo
      .list_unbilled_by_customer(customer_id)
      .await?;

    if pending.is_empty() {
      tracing::debug!("No pending lines for customer {}", customer_id);
      return Ok(None);
    }

    let draft = InvoiceDraft {
      customer_id,
      line_ids: pending.iter().map(|l| l.id).collect(),
      total: compute_total(&pending),
      issued_at,
    };

    let invoice = self.ledger.issue(draft).await.inspect_err(|e| {
      tracing::warn!("Invoice issuance for customer {} aborted: {}", customer_id, e);
    })?;

    let lines = pending
      .into_iter()
      .map(|mut line| {
        line.invoice_id = Some(invoice.id);
        line
      })
      .collect::<Vec<_>>();

    tracing::info!(
      "Issued invoice {} for customer {}: {} lines, total {}",
      invoice.number,
      customer_id,
      lines.len(),
      invoice.total
    );

    Ok(Some(IssuedInvoice { invoice, lines }))
  }

  /// Releases the invoice's lines back to pending and deletes it.
  pub async fn reverse_invoice(&self, invoice_id: Uuid) -> Result<ReversedInvoice, BillingError> {
    let invoice = self.get_invoice(invoice_id).await?;
    let released_lines = self.ledger.reverse(invoice_id).await?;

    tracing::info!(
      "Reversed invoice {}: {} lines released",
      invoice.number,
      released_lines
    );

    Ok(ReversedInvoice {
      invoice,
      released_lines,
    })
  }

  pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Invoice, BillingError> {
    self
      .invoice_repo
      .find_by_id(invoice_id)
      .await?
      .ok_or(BillingError::InvoiceNotFound(invoice_id))
  }

  pub async fn list_invoices(&self) -> Result<Vec<Invoice>, BillingError> {
    self.invoice_repo.list().await
  }

  pub async fn invoice_lines(&self, invoice_id: Uuid) -> Result<Vec<WorkLine>, BillingError> {
    self.work_line_repo.list_by_invoice(invoice_id).await
  }
}
