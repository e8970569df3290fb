use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::billing::{
  BillingError, Price, Quantity, WorkLine, ports::WorkLineRepository,
};

#[derive(Debug, FromRow)]
struct WorkLineRow {
  id: Uuid,
  customer_id: Uuid,
  item_id: Uuid,
  qty: Decimal,
  price: Decimal,
  notes: Option<String>,
  work_date: NaiveDate,
  invoiced: bool,
  invoice_id: Option<Uuid>,
  created_at: DateTime<Utc>,
}

impl TryFrom<WorkLineRow> for WorkLine {
  type Error = BillingError;

  fn try_from(row: WorkLineRow) -> Result<Self, Self::Error> {
    if row.invoiced != row.invoice_id.is_some() {
      return Err(BillingError::Repository(format!(
        "work line {} has invoiced = {} but invoice_id = {:?}",
        row.id, row.invoiced, row.invoice_id
      )));
    }

    Ok(WorkLine {
      id: row.id,
      customer_id: row.customer_id,
      item_id: row.item_id,
      quantity: Quantity::new(row.qty)?,
      price: Price::new(row.price)?,
      notes: row.notes,
      work_date: row.work_date,
      invoice_id: row.invoice_id,
      created_at: row.created_at,
    })
  }
}

const SELECT_COLUMNS: &str =
  "id, customer_id, item_id, qty, price, notes, work_date, invoiced, invoice_id, created_at";

pub struct PostgresWorkLineRepository {
  pool: PgPool,
}

impl PostgresWorkLineRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn fetch_ordered(
    &self,
    filter: &str,
    param: Option<Uuid>,
  ) -> Result<Vec<WorkLine>, BillingError> {
    let sql = format!(
      "SELECT {} FROM work_lines {} ORDER BY work_date ASC, created_at ASC",
      SELECT_COLUMNS, filter
    );
    let mut query = sqlx::query_as::<_, WorkLineRow>(&sql);
    if let Some(param) = param {
      query = query.bind(param);
    }

    let rows = query.fetch_all(&self.pool).await?;
    rows.into_iter().map(|r| r.try_into()).collect()
  }

  /// Explains why a guarded write touched no row.
  async fn rejection(&self, id: Uuid) -> BillingError {
    match self.find_by_id(id).await {
      Ok(Some(line)) => match line.ensure_unbilled() {
        Err(e) => e,
        Ok(()) => BillingError::Repository(format!("work line {} was not written", id)),
      },
      Ok(None) => BillingError::WorkLineNotFound(id),
      Err(e) => e,
    }
  }
}

#[async_trait]
impl WorkLineRepository for PostgresWorkLineRepository {
  async fn create(&self, line: WorkLine) -> Result<WorkLine, BillingError> {
    let row = sqlx::query_as::<_, WorkLineRow>(
      r#"
            INSERT INTO work_lines
                (id, customer_id, item_id, qty, price, notes, work_date, invoiced, invoice_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, customer_id, item_id, qty, price, notes, work_date, invoiced, invoice_id, created_at
            "#,
    )
    .bind(line.id)
    .bind(line.customer_id)
    .bind(line.item_id)
    .bind(line.quantity.value())
    .bind(line.price.value())
    .bind(&line.notes)
    .bind(line.work_date)
    .bind(line.is_invoiced())
    .bind(line.invoice_id)
    .bind(line.created_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, line: WorkLine) -> Result<WorkLine, BillingError> {
    // Claim state is owned by the ledger; only unbilled lines are editable
    let row = sqlx::query_as::<_, WorkLineRow>(
      r#"
            UPDATE work_lines
            SET qty = $2, price = $3, notes = $4, work_date = $5
            WHERE id = $1 AND invoiced = FALSE
            RETURNING id, customer_id, item_id, qty, price, notes, work_date, invoiced, invoice_id, created_at
            "#,
    )
    .bind(line.id)
    .bind(line.quantity.value())
    .bind(line.price.value())
    .bind(&line.notes)
    .bind(line.work_date)
    .fetch_optional(&self.pool)
    .await?;

    match row {
      Some(row) => row.try_into(),
      None => Err(self.rejection(line.id).await),
    }
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkLine>, BillingError> {
    let sql = format!("SELECT {} FROM work_lines WHERE id = $1", SELECT_COLUMNS);
    let row = sqlx::query_as::<_, WorkLineRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn delete(&self, id: Uuid) -> Result<(), BillingError> {
    let result = sqlx::query("DELETE FROM work_lines WHERE id = $1 AND invoiced = FALSE")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(self.rejection(id).await);
    }
    Ok(())
  }

  async fn list(&self) -> Result<Vec<WorkLine>, BillingError> {
    self.fetch_ordered("", None).await
  }

  async fn list_by_invoice(&self, invoice_id: Uuid) -> Result<Vec<WorkLine>, BillingError> {
    self
      .fetch_ordered("WHERE invoice_id = $1", Some(invoice_id))
      .await
  }

  async fn list_unbilled_by_customer(
    &self,
    customer_id: Uuid,
  ) -> Result<Vec<WorkLine>, BillingError> {
    self
      .fetch_ordered(
        "WHERE customer_id = $1 AND invoiced = FALSE",
        Some(customer_id),
      )
      .await
  }
}
