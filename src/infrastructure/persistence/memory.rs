//! In-memory persistence backend.
//!
//! All collections live behind one lock, so issuance and reversal are atomic
//! the same way the PostgreSQL transactions are.

use async_trait::async_trait;
use chrono::Datelike;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::billing::{
  BillingError, Customer, Invoice, InvoiceDraft, Item, WorkLine, aggregation::{compute_total, sort_canonical},
  numbering::next_invoice_number,
  ports::{CustomerRepository, InvoiceLedger, InvoiceRepository, ItemRepository, WorkLineRepository},
  value_objects::InvoiceNumber,
};

#[derive(Default)]
struct StoreState {
  customers: Vec<Customer>,
  items: Vec<Item>,
  // insertion order breaks ties between equal (work_date, created_at)
  work_lines: Vec<WorkLine>,
  invoices: Vec<Invoice>,
  // last sequence handed out per year
  sequences: HashMap<i32, u32>,
  writes: u64,
}

impl StoreState {
  fn sorted_lines<F>(&self, keep: F) -> Vec<WorkLine>
  where
    F: Fn(&WorkLine) -> bool,
  {
    let mut lines: Vec<WorkLine> = self.work_lines.iter().filter(|l| keep(l)).cloned().collect();
    sort_canonical(&mut lines);
    lines
  }

  fn reserve_number(&mut self, year: i32) -> Result<InvoiceNumber, BillingError> {
    let next = match self.sequences.get(&year) {
      Some(last) => InvoiceNumber::new(year, last + 1)?,
      None => next_invoice_number(&self.invoices, year)?,
    };
    self.sequences.insert(year, next.sequence());
    Ok(next)
  }
}

#[derive(Default)]
pub struct InMemoryBillingStore {
  state: RwLock<StoreState>,
}

impl InMemoryBillingStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of successful mutating calls so far.
  pub async fn write_count(&self) -> u64 {
    self.state.read().await.writes
  }
}

fn replace<T, F>(rows: &mut [T], matches: F, value: T) -> bool
where
  F: Fn(&T) -> bool,
{
  match rows.iter_mut().find(|row| matches(row)) {
    Some(slot) => {
      *slot = value;
      true
    }
    None => false,
  }
}

#[async_trait]
impl CustomerRepository for InMemoryBillingStore {
  async fn create(&self, customer: Customer) -> Result<Customer, BillingError> {
    let mut state = self.state.write().await;
    state.customers.push(customer.clone());
    state.writes += 1;
    Ok(customer)
  }

  async fn update(&self, customer: Customer) -> Result<Customer, BillingError> {
    let mut state = self.state.write().await;
    let id = customer.id;
    if !replace(&mut state.customers, |c| c.id == id, customer.clone()) {
      return Err(BillingError::CustomerNotFound(id));
    }
    state.writes += 1;
    Ok(customer)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, BillingError> {
    let state = self.state.read().await;
    Ok(state.customers.iter().find(|c| c.id == id).cloned())
  }

  async fn list(&self) -> Result<Vec<Customer>, BillingError> {
    let state = self.state.read().await;
    let mut customers = state.customers.clone();
    customers.reverse();
    customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(customers)
  }

  async fn delete(&self, id: Uuid) -> Result<(), BillingError> {
    let mut state = self.state.write().await;
    state.customers.retain(|c| c.id != id);
    state.writes += 1;
    Ok(())
  }

  async fn has_references(&self, id: Uuid) -> Result<bool, BillingError> {
    let state = self.state.read().await;
    Ok(
      state.work_lines.iter().any(|l| l.customer_id == id)
        || state.invoices.iter().any(|i| i.customer_id == id),
    )
  }
}

#[async_trait]
impl ItemRepository for InMemoryBillingStore {
  async fn create(&self, item: Item) -> Result<Item, BillingError> {
    let mut state = self.state.write().await;
    state.items.push(item.clone());
    state.writes += 1;
    Ok(item)
  }

  async fn update(&self, item: Item) -> Result<Item, BillingError> {
    let mut state = self.state.write().await;
    let id = item.id;
    if !replace(&mut state.items, |i| i.id == id, item.clone()) {
      return Err(BillingError::ItemNotFound(id));
    }
    state.writes += 1;
    Ok(item)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, BillingError> {
    let state = self.state.read().await;
    Ok(state.items.iter().find(|i| i.id == id).cloned())
  }

  async fn list(&self) -> Result<Vec<Item>, BillingError> {
    let state = self.state.read().await;
    let mut items = state.items.clone();
    items.reverse();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items)
  }

  async fn delete(&self, id: Uuid) -> Result<(), BillingError> {
    let mut state = self.state.write().await;
    state.items.retain(|i| i.id != id);
    state.writes += 1;
    Ok(())
  }

  async fn has_work_lines(&self, id: Uuid) -> Result<bool, BillingError> {
    let state = self.state.read().await;
    Ok(state.work_lines.iter().any(|l| l.item_id == id))
  }
}

#[async_trait]
impl WorkLineRepository for InMemoryBillingStore {
  async fn create(&self, line: WorkLine) -> Result<WorkLine, BillingError> {
    let mut state = self.state.write().await;
    state.work_lines.push(line.clone());
    state.writes += 1;
    Ok(line)
  }

  async fn update(&self, line: WorkLine) -> Result<WorkLine, BillingError> {
    let mut state = self.state.write().await;
    // Claim state is owned by the ledger; only the editable fields are copied
    let stored = state
      .work_lines
      .iter_mut()
      .find(|l| l.id == line.id)
      .ok_or(BillingError::WorkLineNotFound(line.id))?;
    stored.update(line.quantity, line.price, line.work_date, line.notes)?;
    let updated = stored.clone();
    state.writes += 1;
    Ok(updated)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkLine>, BillingError> {
    let state = self.state.read().await;
    Ok(state.work_lines.iter().find(|l| l.id == id).cloned())
  }

  async fn delete(&self, id: Uuid) -> Result<(), BillingError> {
    let mut state = self.state.write().await;
    let position = state
      .work_lines
      .iter()
      .position(|l| l.id == id)
      .ok_or(BillingError::WorkLineNotFound(id))?;
    state.work_lines[position].ensure_unbilled()?;
    state.work_lines.remove(position);
    state.writes += 1;
    Ok(())
  }

  async fn list(&self) -> Result<Vec<WorkLine>, BillingError> {
    Ok(self.state.read().await.sorted_lines(|_| true))
  }

  async fn list_by_invoice(&self, invoice_id: Uuid) -> Result<Vec<WorkLine>, BillingError> {
    Ok(
      self
        .state
        .read()
        .await
        .sorted_lines(|l| l.invoice_id == Some(invoice_id)),
    )
  }

  async fn list_unbilled_by_customer(
    &self,
    customer_id: Uuid,
  ) -> Result<Vec<WorkLine>, BillingError> {
    Ok(
      self
        .state
        .read()
        .await
        .sorted_lines(|l| l.customer_id == customer_id && !l.is_invoiced()),
    )
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryBillingStore {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, BillingError> {
    let state = self.state.read().await;
    Ok(state.invoices.iter().find(|i| i.id == id).cloned())
  }

  async fn list(&self) -> Result<Vec<Invoice>, BillingError> {
    let state = self.state.read().await;
    let mut invoices = state.invoices.clone();
    invoices.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
    Ok(invoices)
  }
}

#[async_trait]
impl InvoiceLedger for InMemoryBillingStore {
  async fn issue(&self, draft: InvoiceDraft) -> Result<Invoice, BillingError> {
    let mut state = self.state.write().await;

    // Validate the whole claim before touching anything
    let mut positions = Vec::with_capacity(draft.line_ids.len());
    for line_id in &draft.line_ids {
      let position = state
        .work_lines
        .iter()
        .position(|l| l.id == *line_id && l.customer_id == draft.customer_id && !l.is_invoiced())
        .ok_or_else(|| {
          BillingError::Consistency(format!(
            "work line {} is no longer pending for customer {}",
            line_id, draft.customer_id
          ))
        })?;
      positions.push(position);
    }

    let claimed_total = compute_total(positions.iter().map(|&p| &state.work_lines[p]));
    if claimed_total != draft.total {
      return Err(BillingError::Consistency(format!(
        "pending lines of customer {} changed: total {} is now {}",
        draft.customer_id, draft.total, claimed_total
      )));
    }

    let number = state.reserve_number(draft.issued_at.year())?;
    let invoice = Invoice::new(number, draft.customer_id, draft.total, draft.issued_at);

    for position in positions {
      state.work_lines[position].invoice_id = Some(invoice.id);
    }
    state.invoices.push(invoice.clone());
    state.writes += 1;

    Ok(invoice)
  }

  async fn reverse(&self, invoice_id: Uuid) -> Result<u64, BillingError> {
    let mut state = self.state.write().await;

    if !state.invoices.iter().any(|i| i.id == invoice_id) {
      return Err(BillingError::InvoiceNotFound(invoice_id));
    }

    let mut released = 0;
    for line in state
      .work_lines
      .iter_mut()
      .filter(|l| l.invoice_id == Some(invoice_id))
    {
      line.release();
      released += 1;
    }
    state.invoices.retain(|i| i.id != invoice_id);
    state.writes += 1;

    Ok(released)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::billing::value_objects::{Price, Quantity};
  use chrono::{NaiveDate, TimeZone, Utc};
  use rust_decimal::Decimal;
  use rust_decimal_macros::dec;

  fn line(customer_id: Uuid) -> WorkLine {
    WorkLine::new(
      customer_id,
      Uuid::new_v4(),
      Quantity::one(),
      Price::new(dec!(2)).unwrap(),
      None,
      NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
    )
  }

  fn draft(customer_id: Uuid, line_ids: Vec<Uuid>) -> InvoiceDraft {
    InvoiceDraft {
      customer_id,
      total: dec!(2) * Decimal::from(line_ids.len()),
      line_ids,
      issued_at: Utc.with_ymd_and_hms(2025, 2, 2, 8, 0, 0).unwrap(),
    }
  }

  #[tokio::test]
  async fn test_stale_claim_rolls_back() {
    let store = InMemoryBillingStore::new();
    let customer_id = Uuid::new_v4();
    let fresh = WorkLineRepository::create(&store, line(customer_id)).await.unwrap();
    let taken = WorkLineRepository::create(&store, line(customer_id)).await.unwrap();

    store
      .issue(draft(customer_id, vec![taken.id]))
      .await
      .unwrap();

    let result = store.issue(draft(customer_id, vec![fresh.id, taken.id])).await;
    assert!(matches!(result, Err(BillingError::Consistency(_))));

    let fresh = WorkLineRepository::find_by_id(&store, fresh.id)
      .await
      .unwrap()
      .unwrap();
    assert!(!fresh.is_invoiced());
    assert_eq!(InvoiceRepository::list(&store).await.unwrap().len(), 1);

    // the failed attempt did not burn a number
    let next = store.issue(draft(customer_id, vec![fresh.id])).await.unwrap();
    assert_eq!(next.number.to_string(), "2025-0002");
  }

  #[tokio::test]
  async fn test_claim_rejects_other_customers_lines() {
    let store = InMemoryBillingStore::new();
    let foreign = WorkLineRepository::create(&store, line(Uuid::new_v4()))
      .await
      .unwrap();

    let result = store.issue(draft(Uuid::new_v4(), vec![foreign.id])).await;
    assert!(matches!(result, Err(BillingError::Consistency(_))));
  }

  #[tokio::test]
  async fn test_lines_listed_in_canonical_order() {
    let store = InMemoryBillingStore::new();
    let customer_id = Uuid::new_v4();
    let mut late = line(customer_id);
    late.work_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let early = line(customer_id);

    WorkLineRepository::create(&store, late.clone()).await.unwrap();
    WorkLineRepository::create(&store, early.clone()).await.unwrap();

    let ids: Vec<Uuid> = WorkLineRepository::list(&store)
      .await
      .unwrap()
      .iter()
      .map(|l| l.id)
      .collect();
    assert_eq!(ids, vec![early.id, late.id]);
  }

  #[tokio::test]
  async fn test_stale_edit_cannot_unbill_claimed_line() {
    let store = InMemoryBillingStore::new();
    let customer_id = Uuid::new_v4();
    let created = WorkLineRepository::create(&store, line(customer_id)).await.unwrap();

    // read before the issuance, written after it
    let mut stale = WorkLineRepository::find_by_id(&store, created.id)
      .await
      .unwrap()
      .unwrap();
    stale.quantity = Quantity::new(dec!(7)).unwrap();

    let invoice = store.issue(draft(customer_id, vec![created.id])).await.unwrap();

    let result = WorkLineRepository::update(&store, stale).await;
    assert!(matches!(
      result,
      Err(BillingError::LineAlreadyInvoiced { invoice_id, .. }) if invoice_id == invoice.id
    ));
    let result = WorkLineRepository::delete(&store, created.id).await;
    assert!(matches!(result, Err(BillingError::LineAlreadyInvoiced { .. })));

    let stored = WorkLineRepository::find_by_id(&store, created.id)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(stored.invoice_id, Some(invoice.id));
    assert_eq!(stored.quantity, Quantity::one());
    assert!(
      store
        .list_unbilled_by_customer(customer_id)
        .await
        .unwrap()
        .is_empty()
    );
  }

  #[tokio::test]
  async fn test_edit_between_read_and_claim_aborts_issue() {
    let store = InMemoryBillingStore::new();
    let customer_id = Uuid::new_v4();
    let created = WorkLineRepository::create(&store, line(customer_id)).await.unwrap();
    let pending = draft(customer_id, vec![created.id]);

    let mut edited = created.clone();
    edited.quantity = Quantity::new(dec!(5)).unwrap();
    WorkLineRepository::update(&store, edited).await.unwrap();
    let writes = store.write_count().await;

    let result = store.issue(pending).await;
    assert!(matches!(result, Err(BillingError::Consistency(_))));
    assert_eq!(store.write_count().await, writes);
    assert!(InvoiceRepository::list(&store).await.unwrap().is_empty());

    // a fresh read bills the edited amount
    let invoice = store
      .issue(InvoiceDraft {
        total: dec!(10),
        ..draft(customer_id, vec![created.id])
      })
      .await
      .unwrap();
    assert_eq!(invoice.total, dec!(10));
    assert_eq!(invoice.number.to_string(), "2025-0001");
  }

  #[tokio::test]
  async fn test_concurrent_edit_and_issue_keep_total_consistent() {
    let store = InMemoryBillingStore::new();
    let customer_id = Uuid::new_v4();
    let created = WorkLineRepository::create(&store, line(customer_id)).await.unwrap();
    let mut edited = created.clone();
    edited.quantity = Quantity::new(dec!(3)).unwrap();

    let (issued, updated) = tokio::join!(
      store.issue(draft(customer_id, vec![created.id])),
      WorkLineRepository::update(&store, edited),
    );

    // exactly one of the two writers wins
    assert_ne!(issued.is_ok(), updated.is_ok());
    if let Ok(invoice) = issued {
      let claimed = store.list_by_invoice(invoice.id).await.unwrap();
      assert_eq!(invoice.total, compute_total(&claimed));
    }
  }
}
