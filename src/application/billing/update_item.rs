use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dtos::ItemDto;
use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService, ItemName, Price};

#[derive(Debug, Deserialize)]
pub struct UpdateItemCommand {
  pub item_id: Uuid,
  pub name: String,
  pub price: Option<Decimal>,
  pub sku: Option<String>,
}

pub struct UpdateItemUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl UpdateItemUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self, command: UpdateItemCommand) -> Result<ItemDto, BillingError> {
    let name = ItemName::new(command.name)?;
    let price = Price::new(command.price.unwrap_or(Decimal::ZERO))?;

    let item = self
      .billing_service
      .update_item(command.item_id, name, price, command.sku)
      .await?;
    self.mirror.invalidate().await;

    Ok(item.into())
  }
}
