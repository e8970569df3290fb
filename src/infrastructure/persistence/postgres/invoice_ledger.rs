use async_trait::async_trait;
use chrono::Datelike;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::invoice_repository::InvoiceRow;
use crate::domain::billing::{
  BillingError, Invoice, InvoiceDraft, InvoiceNumber, numbering::next_invoice_number,
  ports::InvoiceLedger,
};

/// Issues and reverses invoices inside a single database transaction each.
pub struct PostgresInvoiceLedger {
  pool: PgPool,
}

impl PostgresInvoiceLedger {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Hands out the next sequence of `year`. The row lock on
  /// `invoice_sequences` serializes concurrent issuances of the same year
  /// until the surrounding transaction ends.
  async fn reserve_number(
    tx: &mut Transaction<'_, Postgres>,
    year: i32,
  ) -> Result<InvoiceNumber, BillingError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, number, customer_id, total, issued_at
            FROM invoices
            WHERE EXTRACT(YEAR FROM issued_at AT TIME ZONE 'UTC') = $1
            "#,
    )
    .bind(year)
    .fetch_all(&mut **tx)
    .await?;
    let existing = rows
      .into_iter()
      .map(Invoice::try_from)
      .collect::<Result<Vec<_>, _>>()?;
    let floor = next_invoice_number(&existing, year)?;

    let sequence = sqlx::query_scalar::<_, i32>(
      r#"
            INSERT INTO invoice_sequences (year, last_value)
            VALUES ($1, $2)
            ON CONFLICT (year) DO UPDATE
            SET last_value = GREATEST(invoice_sequences.last_value + 1, EXCLUDED.last_value)
            RETURNING last_value
            "#,
    )
    .bind(year)
    .bind(floor.sequence() as i32)
    .fetch_one(&mut **tx)
    .await?;

    let sequence = u32::try_from(sequence)
      .map_err(|_| BillingError::Repository(format!("invalid sequence {}", sequence)))?;
    Ok(InvoiceNumber::new(year, sequence)?)
  }
}

#[async_trait]
impl InvoiceLedger for PostgresInvoiceLedger {
  async fn issue(&self, draft: InvoiceDraft) -> Result<Invoice, BillingError> {
    let mut tx = self.pool.begin().await?;

    // Row locks hold off edits until the claim commits
    let locked = sqlx::query_as::<_, (Decimal, Decimal)>(
      r#"
            SELECT qty, price
            FROM work_lines
            WHERE id = ANY($1) AND customer_id = $2 AND invoiced = FALSE
            FOR UPDATE
            "#,
    )
    .bind(&draft.line_ids)
    .bind(draft.customer_id)
    .fetch_all(&mut *tx)
    .await?;

    let locked_total: Decimal = locked.iter().map(|(qty, price)| qty * price).sum();
    if locked.len() != draft.line_ids.len() || locked_total != draft.total {
      tx.rollback().await?;
      return Err(BillingError::Consistency(format!(
        "pending lines of customer {} changed: {} of {} still pending, total {} is now {}",
        draft.customer_id,
        locked.len(),
        draft.line_ids.len(),
        draft.total,
        locked_total
      )));
    }

    let number = Self::reserve_number(&mut tx, draft.issued_at.year()).await?;
    let invoice = Invoice::new(number, draft.customer_id, draft.total, draft.issued_at);

    sqlx::query(
      r#"
            INSERT INTO invoices (id, number, customer_id, total, issued_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
    )
    .bind(invoice.id)
    .bind(invoice.number.to_string())
    .bind(invoice.customer_id)
    .bind(invoice.total)
    .bind(invoice.issued_at)
    .execute(&mut *tx)
    .await?;

    let claimed = sqlx::query(
      r#"
            UPDATE work_lines
            SET invoiced = TRUE, invoice_id = $1
            WHERE id = ANY($2) AND customer_id = $3 AND invoiced = FALSE
            "#,
    )
    .bind(invoice.id)
    .bind(&draft.line_ids)
    .bind(draft.customer_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed != draft.line_ids.len() as u64 {
      tx.rollback().await?;
      return Err(BillingError::Consistency(format!(
        "claimed {} of {} pending lines for customer {}",
        claimed,
        draft.line_ids.len(),
        draft.customer_id
      )));
    }

    tx.commit().await?;
    Ok(invoice)
  }

  async fn reverse(&self, invoice_id: Uuid) -> Result<u64, BillingError> {
    let mut tx = self.pool.begin().await?;

    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM invoices WHERE id = $1 FOR UPDATE")
      .bind(invoice_id)
      .fetch_optional(&mut *tx)
      .await?;
    if exists.is_none() {
      return Err(BillingError::InvoiceNotFound(invoice_id));
    }

    let released = sqlx::query(
      r#"
            UPDATE work_lines
            SET invoiced = FALSE, invoice_id = NULL
            WHERE invoice_id = $1
            "#,
    )
    .bind(invoice_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query("DELETE FROM invoices WHERE id = $1")
      .bind(invoice_id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;
    Ok(released)
  }
}
