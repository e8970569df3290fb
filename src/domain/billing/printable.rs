use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::entities::{Customer, Invoice, Item, WorkLine};
use super::value_objects::format_amount;

/// Read-only projection of an invoice, ready for a print template.
///
/// Amounts are rounded to cents here and nowhere earlier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintableInvoice {
  pub number: String,
  pub issued_at: DateTime<Utc>,
  pub issued_on: String,
  pub customer: PrintableCustomer,
  pub lines: Vec<PrintableLine>,
  pub total: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrintableCustomer {
  pub name: String,
  pub tax_id: Option<String>,
  pub address: Option<String>,
  pub locality: Option<String>,
  pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintableLine {
  pub item_name: String,
  pub notes: Option<String>,
  pub work_date: String,
  pub quantity: String,
  pub price: String,
  pub amount: String,
}

impl PrintableInvoice {
  pub fn project(
    invoice: &Invoice,
    lines: &[WorkLine],
    customers: &HashMap<Uuid, Customer>,
    items: &HashMap<Uuid, Item>,
  ) -> Self {
    let customer = customers
      .get(&invoice.customer_id)
      .map(|c| PrintableCustomer {
        name: c.name.value().to_string(),
        tax_id: c.details.tax_id.clone(),
        address: c.details.address.clone(),
        locality: c.details.locality(),
        phone: c.details.phone.clone(),
      })
      .unwrap_or_default();

    let lines = lines
      .iter()
      .map(|line| PrintableLine {
        item_name: items
          .get(&line.item_id)
          .map(|i| i.name.value().to_string())
          .unwrap_or_default(),
        notes: line.notes.clone(),
        work_date: line.work_date.format("%Y-%m-%d").to_string(),
        quantity: format_amount(line.quantity.value()),
        price: format_amount(line.price.value()),
        amount: format_amount(line.amount()),
      })
      .collect();

    Self {
      number: invoice.number.to_string(),
      issued_at: invoice.issued_at,
      issued_on: invoice.issued_at.format("%d/%m/%Y %H:%M").to_string(),
      customer,
      lines,
      total: format_amount(invoice.total),
    }
  }
}
