use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dtos::WorkLineDto;
use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService, NewWorkLine, Price, Quantity};

#[derive(Debug, Deserialize)]
pub struct AddWorkLineCommand {
  pub customer_id: Option<Uuid>,
  pub item_id: Option<Uuid>,
  /// Defaults to one unit.
  pub qty: Option<Decimal>,
  /// Defaults to the item's current price.
  pub price: Option<Decimal>,
  pub notes: Option<String>,
  pub work_date: NaiveDate,
}

pub struct AddWorkLineUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl AddWorkLineUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self, command: AddWorkLineCommand) -> Result<WorkLineDto, BillingError> {
    let quantity = match command.qty {
      Some(qty) => Quantity::new(qty)?,
      None => Quantity::one(),
    };
    let price = command.price.map(Price::new).transpose()?;

    let line = self
      .billing_service
      .add_work_line(NewWorkLine {
        customer_id: command.customer_id,
        item_id: command.item_id,
        quantity,
        price,
        notes: command.notes,
        work_date: command.work_date,
      })
      .await?;
    self.mirror.invalidate().await;

    Ok(line.into())
  }
}
