use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dtos::CustomerDto;
use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingError, BillingService, CustomerDetails, CustomerName};

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerCommand {
  pub customer_id: Uuid,
  pub name: String,
  pub tax_id: Option<String>,
  pub address: Option<String>,
  pub city: Option<String>,
  pub postal_code: Option<String>,
  pub province: Option<String>,
  pub phone: Option<String>,
}

pub struct UpdateCustomerUseCase {
  billing_service: Arc<BillingService>,
  mirror: Arc<StateMirror>,
}

impl UpdateCustomerUseCase {
  pub fn new(billing_service: Arc<BillingService>, mirror: Arc<StateMirror>) -> Self {
    Self {
      billing_service,
      mirror,
    }
  }

  pub async fn execute(&self, command: UpdateCustomerCommand) -> Result<CustomerDto, BillingError> {
    let name = CustomerName::new(command.name)?;
    let details = CustomerDetails::new(
      command.tax_id,
      command.address,
      command.city,
      command.postal_code,
      command.province,
      command.phone,
    );

    let customer = self
      .billing_service
      .update_customer(command.customer_id, name, details)
      .await?;
    self.mirror.invalidate().await;

    Ok(customer.into())
  }
}
