use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::dtos::{InvoiceDto, WorkLineDto};
use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Deserialize)]
pub struct IssueInvoiceCommand {
  pub customer_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct IssueInvoiceResponse {
  pub invoice: InvoiceDto,
  pub lines: Vec<WorkLineDto>,
}

pub struct IssueInvoiceUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl IssueInvoiceUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  /// `Ok(None)` when the customer had nothing pending.
  pub async fn execute(
    &self,
    command: IssueInvoiceCommand,
  ) -> Result<Option<IssueInvoiceResponse>, BillingError> {
    self.billing_service.get_customer(command.customer_id).await?;

    let Some(issued) = self
      .billing_service
      .issue_invoice(command.customer_id)
      .await?
    else {
      return Ok(None);
    };
    self.mirror.invalidate().await;

    Ok(Some(IssueInvoiceResponse {
      invoice: issued.invoice.into(),
      lines: issued.lines.into_iter().map(WorkLineDto::from).collect(),
    }))
  }
}
