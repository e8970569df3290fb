use actix_web::{App, HttpResponse, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use factuos::{
  adapters::http::{BillingRouteDependencies, RequestIdMiddleware, configure_billing_routes},
  application::mirror::StateMirror,
  domain::billing::{BillingService, BillingServiceDependencies, InvoiceRenderer},
  infrastructure::{
    config::{Config, DatabaseConfig, StorageBackend},
    persistence::{
      InMemoryBillingStore,
      postgres::{
        PostgresCustomerRepository, PostgresInvoiceLedger, PostgresInvoiceRepository,
        PostgresItemRepository, PostgresWorkLineRepository,
      },
    },
    print::HtmlInvoiceRenderer,
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "factuos=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Factuos");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let deps = match config.storage.backend {
    StorageBackend::Postgres => postgres_dependencies(&config.database).await?,
    StorageBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on shutdown");
      let store = Arc::new(InMemoryBillingStore::new());
      BillingServiceDependencies {
        customer_repo: store.clone(),
        item_repo: store.clone(),
        work_line_repo: store.clone(),
        invoice_repo: store.clone(),
        ledger: store,
      }
    }
  };

  let billing_service = Arc::new(BillingService::new(deps));
  let mirror = Arc::new(StateMirror::new(billing_service.clone()));

  let renderer: Arc<dyn InvoiceRenderer> = Arc::new(
    HtmlInvoiceRenderer::new(&config.print.template_dir, config.print.currency_symbol.clone())
      .context("Failed to initialize invoice templates")?,
  );
  tracing::info!("Invoice renderer initialized");

  let routes = BillingRouteDependencies::new(billing_service, mirror, renderer);

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let routes = routes.clone();
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .service(web::scope("/api/v1").configure(|cfg| configure_billing_routes(cfg, routes)))
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))
  .with_context(|| format!("Failed to bind {}:{}", server_host, server_port))?
  .run()
  .await?;

  Ok(())
}

async fn postgres_dependencies(
  database: &DatabaseConfig,
) -> anyhow::Result<BillingServiceDependencies> {
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(database.max_connections)
      .acquire_timeout(Duration::from_secs(database.acquire_timeout_seconds))
      .connect(&database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      database.connect_timeout_seconds
    );
    anyhow::anyhow!(
      "Database connection timed out after {} seconds",
      database.connect_timeout_seconds
    )
  })?
  .context("Could not connect to database. Is PostgreSQL running?")?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  Ok(BillingServiceDependencies {
    customer_repo: Arc::new(PostgresCustomerRepository::new(db_pool.clone())),
    item_repo: Arc::new(PostgresItemRepository::new(db_pool.clone())),
    work_line_repo: Arc::new(PostgresWorkLineRepository::new(db_pool.clone())),
    invoice_repo: Arc::new(PostgresInvoiceRepository::new(db_pool.clone())),
    ledger: Arc::new(PostgresInvoiceLedger::new(db_pool)),
  })
}

/// Health check endpoint
async fn health_check() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
