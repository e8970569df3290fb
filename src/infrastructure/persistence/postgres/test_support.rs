use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::ImageExt;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};
use uuid::Uuid;

pub(crate) async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
  // Start a PostgreSQL container
  let container = Postgres::default()
    .with_tag("16-alpine")
    .start()
    .await
    .expect("Failed to start postgres container");

  let host = container.get_host().await.expect("Failed to get host");
  let port = container
    .get_host_port_ipv4(5432)
    .await
    .expect("Failed to get port");
  let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

  let pool = PgPoolOptions::new()
    .max_connections(5)
    .connect(&database_url)
    .await
    .expect("Failed to connect to test database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  (pool, container)
}

pub(crate) async fn seed_customer(pool: &PgPool, name: &str) -> Uuid {
  let id = Uuid::new_v4();
  sqlx::query("INSERT INTO customers (id, name) VALUES ($1, $2)")
    .bind(id)
    .bind(name)
    .execute(pool)
    .await
    .expect("Failed to seed customer");
  id
}

pub(crate) async fn seed_item(pool: &PgPool, name: &str) -> Uuid {
  let id = Uuid::new_v4();
  sqlx::query("INSERT INTO items (id, name, price) VALUES ($1, $2, 30)")
    .bind(id)
    .bind(name)
    .execute(pool)
    .await
    .expect("Failed to seed item");
  id
}
