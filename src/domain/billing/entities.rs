use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use super::errors::BillingError;
use super::value_objects::{
  CustomerDetails, CustomerName, InvoiceNumber, ItemName, Price, Quantity, normalize_optional,
};

// Customer - billed party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
  pub id: Uuid,
  pub name: CustomerName,
  pub details: CustomerDetails,
  pub created_at: DateTime<Utc>,
}

impl Customer {
  pub fn new(name: CustomerName, details: CustomerDetails) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      details,
      created_at: Utc::now(),
    }
  }

  pub fn update(&mut self, name: CustomerName, details: CustomerDetails) {
    self.name = name;
    self.details = details;
  }
}

// Item - catalog entry with a default price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
  pub id: Uuid,
  pub name: ItemName,
  pub price: Price,
  pub sku: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Item {
  pub fn new(name: ItemName, price: Price, sku: Option<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      price,
      sku: normalize_optional(sku),
      created_at: Utc::now(),
    }
  }

  pub fn update(&mut self, name: ItemName, price: Price, sku: Option<String>) {
    self.name = name;
    self.price = price;
    self.sku = normalize_optional(sku);
  }
}

/// A unit of delivered work waiting to be billed.
///
/// Billing state is the single `invoice_id` field: a line is invoiced exactly
/// when it is claimed by an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLine {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub item_id: Uuid,
  pub quantity: Quantity,
  pub price: Price,
  pub notes: Option<String>,
  pub work_date: NaiveDate,
  pub invoice_id: Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

impl WorkLine {
  pub fn new(
    customer_id: Uuid,
    item_id: Uuid,
    quantity: Quantity,
    price: Price,
    notes: Option<String>,
    work_date: NaiveDate,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      customer_id,
      item_id,
      quantity,
      price,
      notes: normalize_optional(notes),
      work_date,
      invoice_id: None,
      created_at: Utc::now(),
    }
  }

  pub fn is_invoiced(&self) -> bool {
    self.invoice_id.is_some()
  }

  /// quantity × price at full precision.
  pub fn amount(&self) -> Decimal {
    self.quantity.value() * self.price.value()
  }

  pub fn update(
    &mut self,
    quantity: Quantity,
    price: Price,
    work_date: NaiveDate,
    notes: Option<String>,
  ) -> Result<(), BillingError> {
    self.ensure_unbilled()?;

    self.quantity = quantity;
    self.price = price;
    self.work_date = work_date;
    self.notes = normalize_optional(notes);
    Ok(())
  }

  pub fn ensure_unbilled(&self) -> Result<(), BillingError> {
    match self.invoice_id {
      Some(invoice_id) => Err(BillingError::LineAlreadyInvoiced {
        line_id: self.id,
        invoice_id,
      }),
      None => Ok(()),
    }
  }

  pub fn claim(&mut self, invoice_id: Uuid) -> Result<(), BillingError> {
    self.ensure_unbilled()?;
    self.invoice_id = Some(invoice_id);
    Ok(())
  }

  pub fn release(&mut self) {
    self.invoice_id = None;
  }

  /// Work date ascending, then creation time ascending.
  pub fn canonical_cmp(&self, other: &Self) -> Ordering {
    self
      .work_date
      .cmp(&other.work_date)
      .then_with(|| self.created_at.cmp(&other.created_at))
  }
}

// Invoice - issued document; total is a snapshot taken at issuance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub number: InvoiceNumber,
  pub customer_id: Uuid,
  pub total: Decimal,
  pub issued_at: DateTime<Utc>,
}

impl Invoice {
  pub fn new(
    number: InvoiceNumber,
    customer_id: Uuid,
    total: Decimal,
    issued_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      number,
      customer_id,
      total,
      issued_at,
    }
  }

  pub fn issue_year(&self) -> i32 {
    self.issued_at.year()
  }
}

/// What the issuance engine hands to the ledger to persist atomically.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
  pub customer_id: Uuid,
  pub line_ids: Vec<Uuid>,
  pub total: Decimal,
  pub issued_at: DateTime<Utc>,
}

/// A freshly issued invoice together with the lines it claimed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuedInvoice {
  pub invoice: Invoice,
  pub lines: Vec<WorkLine>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn line(qty: Decimal, price: Decimal, date: (i32, u32, u32)) -> WorkLine {
    WorkLine::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      Quantity::new(qty).unwrap(),
      Price::new(price).unwrap(),
      None,
      NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
    )
  }

  #[test]
  fn test_work_line_amount() {
    let l = line(dec!(2), dec!(10.00), (2025, 3, 1));
    assert_eq!(l.amount(), dec!(20.00));
    let l = line(dec!(1.5), dec!(3.333), (2025, 3, 1));
    assert_eq!(l.amount(), dec!(4.9995));
  }

  #[test]
  fn test_work_line_starts_unbilled() {
    let l = line(dec!(1), dec!(5), (2025, 1, 1));
    assert!(!l.is_invoiced());
    assert!(l.invoice_id.is_none());
  }

  #[test]
  fn test_claim_and_release() {
    let mut l = line(dec!(1), dec!(5), (2025, 1, 1));
    let invoice_id = Uuid::new_v4();

    l.claim(invoice_id).unwrap();
    assert!(l.is_invoiced());
    assert_eq!(l.invoice_id, Some(invoice_id));

    assert!(matches!(
      l.claim(Uuid::new_v4()),
      Err(BillingError::LineAlreadyInvoiced { .. })
    ));

    l.release();
    assert!(!l.is_invoiced());
    assert!(l.invoice_id.is_none());
  }

  #[test]
  fn test_update_only_while_unbilled() {
    let mut l = line(dec!(1), dec!(5), (2025, 1, 1));
    let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();

    assert!(
      l.update(
        Quantity::new(dec!(3)).unwrap(),
        Price::new(dec!(7)).unwrap(),
        date,
        Some("  revisión  ".to_string()),
      )
      .is_ok()
    );
    assert_eq!(l.amount(), dec!(21));
    assert_eq!(l.notes.as_deref(), Some("revisión"));

    l.claim(Uuid::new_v4()).unwrap();
    assert!(
      l.update(Quantity::one(), Price::zero(), date, None)
        .is_err()
    );
    assert_eq!(l.amount(), dec!(21));
  }

  #[test]
  fn test_canonical_order_by_date_then_creation() {
    let later = line(dec!(1), dec!(1), (2025, 5, 2));
    let first = line(dec!(1), dec!(1), (2025, 5, 1));
    let mut second = line(dec!(1), dec!(1), (2025, 5, 1));
    second.created_at = first.created_at + chrono::Duration::seconds(1);

    let mut lines = vec![later.clone(), second.clone(), first.clone()];
    lines.sort_by(WorkLine::canonical_cmp);

    let ids: Vec<Uuid> = lines.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![first.id, second.id, later.id]);
  }

  #[test]
  fn test_item_sku_normalized() {
    let item = Item::new(
      ItemName::new("Tornillería".to_string()).unwrap(),
      Price::new(dec!(1.20)).unwrap(),
      Some(" ".to_string()),
    );
    assert!(item.sku.is_none());
  }
}
