use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::billing::{BillingError, Item, ItemName, Price, ports::ItemRepository};

#[derive(Debug, FromRow)]
struct ItemRow {
  id: Uuid,
  name: String,
  price: Decimal,
  sku: Option<String>,
  created_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
  type Error = BillingError;

  fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
    Ok(Item {
      id: row.id,
      name: ItemName::new(row.name)?,
      price: Price::new(row.price)?,
      sku: row.sku,
      created_at: row.created_at,
    })
  }
}

pub struct PostgresItemRepository {
  pool: PgPool,
}

impl PostgresItemRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
  async fn create(&self, item: Item) -> Result<Item, BillingError> {
    let row = sqlx::query_as::<_, ItemRow>(
      r#"
            INSERT INTO items (id, name, price, sku, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, price, sku, created_at
            "#,
    )
    .bind(item.id)
    .bind(item.name.value())
    .bind(item.price.value())
    .bind(&item.sku)
    .bind(item.created_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, item: Item) -> Result<Item, BillingError> {
    let row = sqlx::query_as::<_, ItemRow>(
      r#"
            UPDATE items
            SET name = $2, price = $3, sku = $4
            WHERE id = $1
            RETURNING id, name, price, sku, created_at
            "#,
    )
    .bind(item.id)
    .bind(item.name.value())
    .bind(item.price.value())
    .bind(&item.sku)
    .fetch_optional(&self.pool)
    .await?
    .ok_or(BillingError::ItemNotFound(item.id))?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, BillingError> {
    let row = sqlx::query_as::<_, ItemRow>(
      r#"
            SELECT id, name, price, sku, created_at
            FROM items
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(&self) -> Result<Vec<Item>, BillingError> {
    let rows = sqlx::query_as::<_, ItemRow>(
      r#"
            SELECT id, name, price, sku, created_at
            FROM items
            ORDER BY created_at DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn delete(&self, id: Uuid) -> Result<(), BillingError> {
    sqlx::query("DELETE FROM items WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    Ok(())
  }

  async fn has_work_lines(&self, id: Uuid) -> Result<bool, BillingError> {
    let used = sqlx::query_scalar::<_, bool>(
      "SELECT EXISTS(SELECT 1 FROM work_lines WHERE item_id = $1)",
    )
    .bind(id)
    .fetch_one(&self.pool)
    .await?;

    Ok(used)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_support::setup_test_db;
  use rust_decimal_macros::dec;

  #[tokio::test]
  async fn test_price_keeps_precision() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresItemRepository::new(pool);

    let item = repo
      .create(Item::new(
        ItemName::new("Tornillería".to_string()).unwrap(),
        Price::new(dec!(0.125)).unwrap(),
        Some("TOR-01".to_string()),
      ))
      .await
      .unwrap();

    let found = repo.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(found.price.value(), dec!(0.125));
    assert_eq!(found.sku.as_deref(), Some("TOR-01"));
  }

  #[tokio::test]
  async fn test_update_and_delete() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresItemRepository::new(pool);

    let mut item = repo
      .create(Item::new(
        ItemName::new("Hora de oficial".to_string()).unwrap(),
        Price::new(dec!(28)).unwrap(),
        None,
      ))
      .await
      .unwrap();

    item.update(item.name.clone(), Price::new(dec!(30)).unwrap(), None);
    let updated = repo.update(item.clone()).await.unwrap();
    assert_eq!(updated.price.value(), dec!(30));
    assert!(!repo.has_work_lines(item.id).await.unwrap());

    repo.delete(item.id).await.unwrap();
    assert!(repo.list().await.unwrap().is_empty());
  }
}
