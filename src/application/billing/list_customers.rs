use serde::Serialize;
use std::sync::Arc;

use super::dtos::CustomerDto;
use crate::domain::billing::{BillingError, BillingService};

#[derive(Debug, Serialize)]
pub struct ListCustomersResponse {
  pub customers: Vec<CustomerDto>,
}

pub struct ListCustomersUseCase {
  billing_service: Arc<BillingService>,
}

impl ListCustomersUseCase {
  pub fn new(billing_service: Arc<BillingService>) -> Self {
    Self { billing_service }
  }

  pub async fn execute(&self) -> Result<ListCustomersResponse, BillingError> {
    let customers = self.billing_service.list_customers().await?;

    Ok(ListCustomersResponse {
      customers: customers.into_iter().map(CustomerDto::from).collect(),
    })
  }
}
