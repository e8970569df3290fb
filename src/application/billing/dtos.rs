use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::billing::{Customer, Invoice, Item, WorkLine};

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDto {
  pub id: Uuid,
  pub name: String,
  pub tax_id: Option<String>,
  pub address: Option<String>,
  pub city: Option<String>,
  pub postal_code: Option<String>,
  pub province: Option<String>,
  pub phone: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerDto {
  fn from(c: Customer) -> Self {
    Self {
      id: c.id,
      name: c.name.into_inner(),
      tax_id: c.details.tax_id,
      address: c.details.address,
      city: c.details.city,
      postal_code: c.details.postal_code,
      province: c.details.province,
      phone: c.details.phone,
      created_at: c.created_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemDto {
  pub id: Uuid,
  pub name: String,
  pub price: Decimal,
  pub sku: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl From<Item> for ItemDto {
  fn from(i: Item) -> Self {
    Self {
      id: i.id,
      name: i.name.into_inner(),
      price: i.price.value(),
      sku: i.sku,
      created_at: i.created_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkLineDto {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub item_id: Uuid,
  pub qty: Decimal,
  pub price: Decimal,
  pub amount: Decimal,
  pub notes: Option<String>,
  pub work_date: NaiveDate,
  pub invoiced: bool,
  pub invoice_id: Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

impl From<WorkLine> for WorkLineDto {
  fn from(l: WorkLine) -> Self {
    Self {
      id: l.id,
      customer_id: l.customer_id,
      item_id: l.item_id,
      qty: l.quantity.value(),
      price: l.price.value(),
      amount: l.amount(),
      invoiced: l.is_invoiced(),
      invoice_id: l.invoice_id,
      notes: l.notes,
      work_date: l.work_date,
      created_at: l.created_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDto {
  pub id: Uuid,
  pub number: String,
  pub customer_id: Uuid,
  pub total: Decimal,
  pub issued_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceDto {
  fn from(i: Invoice) -> Self {
    Self {
      id: i.id,
      number: i.number.to_string(),
      customer_id: i.customer_id,
      total: i.total,
      issued_at: i.issued_at,
    }
  }
}
