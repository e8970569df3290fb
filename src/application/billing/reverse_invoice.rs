use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::dtos::InvoiceDto;
use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Deserialize)]
pub struct ReverseInvoiceCommand {
  pub invoice_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ReverseInvoiceResponse {
  pub invoice: InvoiceDto,
  pub released_lines: u64,
}

pub struct ReverseInvoiceUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl ReverseInvoiceUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(
    &self,
    command: ReverseInvoiceCommand,
  ) -> Result<ReverseInvoiceResponse, BillingError> {
    let reversed = self
      .billing_service
      .reverse_invoice(command.invoice_id)
      .await?;
    self.mirror.invalidate().await;

    Ok(ReverseInvoiceResponse {
      invoice: reversed.invoice.into(),
      released_lines: reversed.released_lines,
    })
  }
}
