use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::billing::{BillingError, Invoice, InvoiceNumber, ports::InvoiceRepository};

#[derive(Debug, FromRow)]
pub(super) struct InvoiceRow {
  pub(super) id: Uuid,
  pub(super) number: String,
  pub(super) customer_id: Uuid,
  pub(super) total: Decimal,
  pub(super) issued_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = BillingError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    Ok(Invoice {
      id: row.id,
      number: row.number.parse::<InvoiceNumber>()?,
      customer_id: row.customer_id,
      total: row.total,
      issued_at: row.issued_at,
    })
  }
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, BillingError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, number, customer_id, total, issued_at
            FROM invoices
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(&self) -> Result<Vec<Invoice>, BillingError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, number, customer_id, total, issued_at
            FROM invoices
            ORDER BY issued_at DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
