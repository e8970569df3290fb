use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::billing::{
  BillingError, Customer, CustomerDetails, CustomerName, ports::CustomerRepository,
};

#[derive(Debug, FromRow)]
struct CustomerRow {
  id: Uuid,
  name: String,
  tax_id: Option<String>,
  address: Option<String>,
  city: Option<String>,
  postal_code: Option<String>,
  province: Option<String>,
  phone: Option<String>,
  created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
  type Error = BillingError;

  fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
    Ok(Customer {
      id: row.id,
      name: CustomerName::new(row.name)?,
      details: CustomerDetails::new(
        row.tax_id,
        row.address,
        row.city,
        row.postal_code,
        row.province,
        row.phone,
      ),
      created_at: row.created_at,
    })
  }
}

pub struct PostgresCustomerRepository {
  pool: PgPool,
}

impl PostgresCustomerRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
  async fn create(&self, customer: Customer) -> Result<Customer, BillingError> {
    let row = sqlx::query_as::<_, CustomerRow>(
      r#"
            INSERT INTO customers (id, name, tax_id, address, city, postal_code, province, phone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, tax_id, address, city, postal_code, province, phone, created_at
            "#,
    )
    .bind(customer.id)
    .bind(customer.name.value())
    .bind(&customer.details.tax_id)
    .bind(&customer.details.address)
    .bind(&customer.details.city)
    .bind(&customer.details.postal_code)
    .bind(&customer.details.province)
    .bind(&customer.details.phone)
    .bind(customer.created_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, customer: Customer) -> Result<Customer, BillingError> {
    let row = sqlx::query_as::<_, CustomerRow>(
      r#"
            UPDATE customers
            SET name = $2, tax_id = $3, address = $4, city = $5, postal_code = $6,
                province = $7, phone = $8
            WHERE id = $1
            RETURNING id, name, tax_id, address, city, postal_code, province, phone, created_at
            "#,
    )
    .bind(customer.id)
    .bind(customer.name.value())
    .bind(&customer.details.tax_id)
    .bind(&customer.details.address)
    .bind(&customer.details.city)
    .bind(&customer.details.postal_code)
    .bind(&customer.details.province)
    .bind(&customer.details.phone)
    .fetch_optional(&self.pool)
    .await?
    .ok_or(BillingError::CustomerNotFound(customer.id))?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, BillingError> {
    let row = sqlx::query_as::<_, CustomerRow>(
      r#"
            SELECT id, name, tax_id, address, city, postal_code, province, phone, created_at
            FROM customers
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(&self) -> Result<Vec<Customer>, BillingError> {
    let rows = sqlx::query_as::<_, CustomerRow>(
      r#"
            SELECT id, name, tax_id, address, city, postal_code, province, phone, created_at
            FROM customers
            ORDER BY created_at DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn delete(&self, id: Uuid) -> Result<(), BillingError> {
    sqlx::query("DELETE FROM customers WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    Ok(())
  }

  async fn has_references(&self, id: Uuid) -> Result<bool, BillingError> {
    let referenced = sqlx::query_scalar::<_, bool>(
      r#"
            SELECT EXISTS(SELECT 1 FROM work_lines WHERE customer_id = $1)
                OR EXISTS(SELECT 1 FROM invoices WHERE customer_id = $1)
            "#,
    )
    .bind(id)
    .fetch_one(&self.pool)
    .await?;

    Ok(referenced)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_support::setup_test_db;

  #[tokio::test]
  async fn test_create_update_and_list_newest_first() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresCustomerRepository::new(pool);

    let first = repo
      .create(Customer::new(
        CustomerName::new("Talleres Norte".to_string()).unwrap(),
        CustomerDetails::default(),
      ))
      .await
      .unwrap();
    let mut second = repo
      .create(Customer::new(
        CustomerName::new("Bar Central".to_string()).unwrap(),
        CustomerDetails::new(
          Some("B12345678".to_string()),
          None,
          Some("Lugo".to_string()),
          Some("27001".to_string()),
          Some("Lugo".to_string()),
          Some("  ".to_string()),
        ),
      ))
      .await
      .unwrap();

    assert_eq!(second.details.phone, None);

    second.update(
      CustomerName::new("Bar Central SL".to_string()).unwrap(),
      second.details.clone(),
    );
    let updated = repo.update(second.clone()).await.unwrap();
    assert_eq!(updated.name.value(), "Bar Central SL");

    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
  }

  #[tokio::test]
  async fn test_update_missing_customer() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresCustomerRepository::new(pool);

    let ghost = Customer::new(
      CustomerName::new("Nadie".to_string()).unwrap(),
      CustomerDetails::default(),
    );
    let result = repo.update(ghost.clone()).await;
    assert!(matches!(result, Err(BillingError::CustomerNotFound(id)) if id == ghost.id));
  }

  #[tokio::test]
  async fn test_has_references_and_delete() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresCustomerRepository::new(pool.clone());

    let customer = repo
      .create(Customer::new(
        CustomerName::new("Obras Lema".to_string()).unwrap(),
        CustomerDetails::default(),
      ))
      .await
      .unwrap();
    assert!(!repo.has_references(customer.id).await.unwrap());

    let item_id = Uuid::new_v4();
    sqlx::query("INSERT INTO items (id, name, price) VALUES ($1, 'Hora', 30)")
      .bind(item_id)
      .execute(&pool)
      .await
      .unwrap();
    sqlx::query(
      "INSERT INTO work_lines (id, customer_id, item_id, qty, price, work_date) VALUES ($1, $2, $3, 1, 30, '2025-03-01')",
    )
    .bind(Uuid::new_v4())
    .bind(customer.id)
    .bind(item_id)
    .execute(&pool)
    .await
    .unwrap();

    assert!(repo.has_references(customer.id).await.unwrap());

    sqlx::query("DELETE FROM work_lines WHERE customer_id = $1")
      .bind(customer.id)
      .execute(&pool)
      .await
      .unwrap();
    repo.delete(customer.id).await.unwrap();
    assert!(repo.find_by_id(customer.id).await.unwrap().is_none());
  }
}
