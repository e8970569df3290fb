use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dtos::WorkLineDto;
use crate::application::mirror::StateMirror;
use crate::domain::billing::aggregation::compute_total;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Serialize)]
pub struct PendingCustomerDto {
  pub customer_id: Uuid,
  pub customer_name: Option<String>,
  pub line_count: usize,
  pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ListPendingResponse {
  pub customers: Vec<PendingCustomerDto>,
  pub next_invoice_number: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerPendingResponse {
  pub customer_id: Uuid,
  pub lines: Vec<WorkLineDto>,
  pub total: Decimal,
  pub next_invoice_number: String,
}

/// Issuance screen data: who has something to bill and how much.
pub struct ListPendingUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl ListPendingUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self) -> Result<ListPendingResponse, BillingError> {
    let summaries = self.billing_service.pending_summaries().await?;
    let snapshot = self.mirror.snapshot().await?;

    let mut customers = summaries
      .into_iter()
      .map(|s| PendingCustomerDto {
        customer_id: s.customer_id,
        customer_name: snapshot.customer_name(s.customer_id).map(str::to_string),
        line_count: s.line_count,
        total: s.total,
      })
      .collect::<Vec<_>>();
    customers.sort_by(|a, b| a.customer_name.cmp(&b.customer_name));

    Ok(ListPendingResponse {
      customers,
      next_invoice_number: self.preview(today()).await?,
    })
  }

  pub async fn for_customer(
    &self,
    customer_id: Uuid,
  ) -> Result<CustomerPendingResponse, BillingError> {
    self.billing_service.get_customer(customer_id).await?;
    let mut pending = self.billing_service.pending_by_customer().await?;
    let lines = pending.remove(&customer_id).unwrap_or_default();
    let total = compute_total(&lines);

    Ok(CustomerPendingResponse {
      customer_id,
      lines: lines.into_iter().map(WorkLineDto::from).collect(),
      total,
      next_invoice_number: self.preview(today()).await?,
    })
  }

  async fn preview(&self, today: NaiveDate) -> Result<String, BillingError> {
    Ok(
      self
        .billing_service
        .preview_next_invoice_number(today)
        .await?
        .to_string(),
    )
  }
}

fn today() -> NaiveDate {
  Utc::now().date_naive()
}
