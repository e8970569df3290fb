use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dtos::WorkLineDto;
use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService, Price, Quantity, WorkLineChanges};

#[derive(Debug, Deserialize)]
pub struct UpdateWorkLineCommand {
  pub line_id: Uuid,
  pub qty: Decimal,
  pub price: Decimal,
  pub notes: Option<String>,
  pub work_date: NaiveDate,
}

pub struct UpdateWorkLineUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl UpdateWorkLineUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self, command: UpdateWorkLineCommand) -> Result<WorkLineDto, BillingError> {
    let changes = WorkLineChanges {
      quantity: Quantity::new(command.qty)?,
      price: Price::new(command.price)?,
      work_date: command.work_date,
      notes: command.notes,
    };

    let line = self
      .billing_service
      .update_work_line(command.line_id, changes)
      .await?;
    self.mirror.invalidate().await;

    Ok(line.into())
  }
}
