use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Deserialize)]
pub struct DeleteItemCommand {
  pub item_id: Uuid,
}

pub struct DeleteItemUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl DeleteItemUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self, command: DeleteItemCommand) -> Result<(), BillingError> {
    self.billing_service.delete_item(command.item_id).await?;
    self.mirror.invalidate().await;
    Ok(())
  }
}
