use serde::Serialize;
use std::sync::Arc;

use super::dtos::ItemDto;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
  pub items: Vec<ItemDto>,
}

pub struct ListItemsUseCase {
  billing_service: Arc<BillingService>,
}

impl ListItemsUseCase {
  pub fn new(billing_service: Arc<BillingService>) -> Self {
    Self { billing_service }
  }

  pub async fn execute(&self) -> Result<ListItemsResponse, BillingError> {
    let items = self.billing_service.list_items().await?;

    Ok(ListItemsResponse {
      items: items.into_iter().map(ItemDto::from).collect(),
    })
  }
}
