use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dtos::InvoiceDto;
use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Serialize)]
pub struct InvoiceListItem {
  #[serde(flatten)]
  pub invoice: InvoiceDto,
  pub customer_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItem>,
}

/// Invoice history, newest first. Customer names come from the state mirror.
pub struct ListInvoicesUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl ListInvoicesUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self) -> Result<ListInvoicesResponse, BillingError> {
    let invoices = self.billing_service.list_invoices().await?;

    let customer_ids: Vec<Uuid> = invoices.iter().map(|inv| inv.customer_id).collect();
    let snapshot = self.mirror.snapshot_covering(&customer_ids, &[]).await?;

    let invoices = invoices
      .into_iter()
      .map(|inv| InvoiceListItem {
        customer_name: snapshot.customer_name(inv.customer_id).map(str::to_string),
        invoice: inv.into(),
      })
      .collect();

    Ok(ListInvoicesResponse { invoices })
  }
}
