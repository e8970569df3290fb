use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Deserialize)]
pub struct DeleteWorkLineCommand {
  pub line_id: Uuid,
}

pub struct DeleteWorkLineUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl DeleteWorkLineUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self, command: DeleteWorkLineCommand) -> Result<(), BillingError> {
    self
      .billing_service
      .delete_work_line(command.line_id)
      .await?;
    self.mirror.invalidate().await;
    Ok(())
  }
}
