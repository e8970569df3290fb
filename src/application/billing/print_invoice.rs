use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService, InvoiceRenderer, PrintableInvoice};

#[derive(Debug, Deserialize)]
pub struct PrintInvoiceCommand {
  pub invoice_id: Uuid,
}

/// Renders the printable HTML document of a stored invoice.
pub struct PrintInvoiceUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
  renderer: Arc<dyn InvoiceRenderer>,
}

impl PrintInvoiceUseCase {
  pub fn new(
    billing_service: Arc<BillingService>,
    mirror: Arc<StateMirror>,
    renderer: Arc<dyn InvoiceRenderer>,
  ) -> Self {
    Self {
      billing_service,
      mirror,
      renderer,
    }
  }

  pub async fn execute(&self, command: PrintInvoiceCommand) -> Result<String, BillingError> {
    let invoice = self.billing_service.get_invoice(command.invoice_id).await?;
    let lines = self.billing_service.invoice_lines(invoice.id).await?;

    let item_ids: Vec<Uuid> = lines.iter().map(|l| l.item_id).collect();
    let snapshot = self
      .mirror
      .snapshot_covering(&[invoice.customer_id], &item_ids)
      .await?;
    let printable =
      PrintableInvoice::project(&invoice, &lines, &snapshot.customers, &snapshot.items);

    self.renderer.render(&printable)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::billing::ListInvoicesUseCase;
  use crate::domain::billing::{
    BillingServiceDependencies, CustomerDetails, CustomerName, ItemName, NewWorkLine, Price,
    Quantity,
  };
  use crate::infrastructure::persistence::memory::InMemoryBillingStore;
  use crate::infrastructure::print::HtmlInvoiceRenderer;
  use chrono::NaiveDate;
  use rust_decimal_macros::dec;

  #[tokio::test]
  async fn test_records_written_behind_warm_mirror_are_printed() {
    let store = Arc::new(InMemoryBillingStore::new());
    let service = Arc::new(BillingService::new(BillingServiceDependencies {
      customer_repo: store.clone(),
      item_repo: store.clone(),
      work_line_repo: store.clone(),
      invoice_repo: store.clone(),
      ledger: store,
    }));
    let mirror = Arc::new(StateMirror::new(service.clone()));
    assert!(mirror.snapshot().await.unwrap().customers.is_empty());

    // another client writes straight to the store
    let customer = service
      .create_customer(
        CustomerName::new("Talleres Ruiz".to_string()).unwrap(),
        CustomerDetails::default(),
      )
      .await
      .unwrap();
    let item = service
      .create_item(
        ItemName::new("Mano de obra".to_string()).unwrap(),
        Price::new(dec!(30)).unwrap(),
        None,
      )
      .await
      .unwrap();
    service
      .add_work_line(NewWorkLine {
        customer_id: Some(customer.id),
        item_id: Some(item.id),
        quantity: Quantity::one(),
        price: None,
        notes: None,
        work_date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
      })
      .await
      .unwrap();
    let issued = service.issue_invoice(customer.id).await.unwrap().unwrap();

    let print = PrintInvoiceUseCase::new(
      service.clone(),
      mirror.clone(),
      Arc::new(HtmlInvoiceRenderer::builtin("€").unwrap()),
    );
    let html = print
      .execute(PrintInvoiceCommand {
        invoice_id: issued.invoice.id,
      })
      .await
      .unwrap();
    assert!(html.contains("Talleres Ruiz"));
    assert!(html.contains("Mano de obra"));

    let listed = ListInvoicesUseCase::new(service, mirror)
      .execute()
      .await
      .unwrap();
    assert_eq!(listed.invoices.len(), 1);
    assert_eq!(
      listed.invoices[0].customer_name.as_deref(),
      Some("Talleres Ruiz")
    );
  }
}
