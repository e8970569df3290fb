use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use super::dtos::ItemDto;
use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService, ItemName, Price};

#[derive(Debug, Deserialize)]
pub struct CreateItemCommand {
  pub name: String,
  /// Empty price input means zero.
  pub price: Option<Decimal>,
  pub sku: Option<String>,
}

pub struct CreateItemUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl CreateItemUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self, command: CreateItemCommand) -> Result<ItemDto, BillingError> {
    let name = ItemName::new(command.name)?;
    let price = Price::new(command.price.unwrap_or(Decimal::ZERO))?;

    let item = self
      .billing_service
      .create_item(name, price, command.sku)
      .await?;
    self.mirror.invalidate().await;

    Ok(item.into())
  }
}
