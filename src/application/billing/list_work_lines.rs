use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::dtos::WorkLineDto;
use crate::domain::billing::aggregation::pending_total;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Default, Deserialize)]
pub struct ListWorkLinesCommand {
  pub customer_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ListWorkLinesResponse {
  pub lines: Vec<WorkLineDto>,
  /// Unbilled amount among the listed lines.
  pub pending_total: Decimal,
}

pub struct ListWorkLinesUseCase {
  billing_service: Arc<BillingService>,
}

impl ListWorkLinesUseCase {
  pub fn new(billing_service: Arc<BillingService>) -> Self {
    Self { billing_service }
  }

  pub async fn execute(
    &self,
    command: ListWorkLinesCommand,
  ) -> Result<ListWorkLinesResponse, BillingError> {
    let lines = self
      .billing_service
      .list_work_lines(command.customer_id)
      .await?;
    let pending_total = pending_total(&lines);

    Ok(ListWorkLinesResponse {
      lines: lines.into_iter().map(WorkLineDto::from).collect(),
      pending_total,
    })
  }
}
