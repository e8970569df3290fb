use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Deserialize)]
pub struct DeleteCustomerCommand {
  pub customer_id: Uuid,
}

pub struct DeleteCustomerUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl DeleteCustomerUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self, command: DeleteCustomerCommand) -> Result<(), BillingError> {
    self
      .billing_service
      .delete_customer(command.customer_id)
      .await?;
    self.mirror.invalidate().await;
    Ok(())
  }
}
