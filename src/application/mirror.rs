//! Client-side mirror of server state.
//!
//! Holds the last known customers, items, work lines and invoices keyed by id
//! for rendering lookups. Every mutating use case invalidates it; the next
//! reader reloads everything from the persistence ports. Invariant checks never
//! read from here.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::billing::{BillingError, BillingService, Customer, Invoice, Item, WorkLine};

/// Immutable copy of the mirrored collections.
#[derive(Debug, Clone, Default)]
pub struct MirrorSnapshot {
  pub customers: HashMap<Uuid, Customer>,
  pub items: HashMap<Uuid, Item>,
  /// Canonical order: work date, then creation time.
  pub work_lines: Vec<WorkLine>,
  /// Most recently issued first.
  pub invoices: Vec<Invoice>,
}

impl MirrorSnapshot {
  pub fn customer_name(&self, id: Uuid) -> Option<&str> {
    self.customers.get(&id).map(|c| c.name.value())
  }

  pub fn item_name(&self, id: Uuid) -> Option<&str> {
    self.items.get(&id).map(|i| i.name.value())
  }

  fn covers(&self, customer_ids: &[Uuid], item_ids: &[Uuid]) -> bool {
    customer_ids.iter().all(|id| self.customers.contains_key(id))
      && item_ids.iter().all(|id| self.items.contains_key(id))
  }
}

struct MirrorState {
  snapshot: Arc<MirrorSnapshot>,
  stale: bool,
}

pub struct StateMirror {
  billing_service: Arc<BillingService>,
  state: RwLock<MirrorState>,
}

impl StateMirror {
  pub fn new(billing_service: Arc<BillingService>) -> Self {
    Self {
      billing_service,
      state: RwLock::new(MirrorState {
        snapshot: Arc::new(MirrorSnapshot::default()),
        stale: true,
      }),
    }
  }

  /// Marks the mirror out of date after a write.
  pub async fn invalidate(&self) {
    self.state.write().await.stale = true;
  }

  pub async fn is_stale(&self) -> bool {
    self.state.read().await.stale
  }

  /// Current snapshot, reloading first if a write happened since the last
  /// load.
  pub async fn snapshot(&self) -> Result<Arc<MirrorSnapshot>, BillingError> {
    {
      let state = self.state.read().await;
      if !state.stale {
        return Ok(state.snapshot.clone());
      }
    }
    self.refresh().await
  }

  /// Snapshot that knows every given customer and item. Records written by
  /// another client since the last load trigger one reload.
  pub async fn snapshot_covering(
    &self,
    customer_ids: &[Uuid],
    item_ids: &[Uuid],
  ) -> Result<Arc<MirrorSnapshot>, BillingError> {
    let snapshot = self.snapshot().await?;
    if snapshot.covers(customer_ids, item_ids) {
      return Ok(snapshot);
    }

    tracing::debug!("State mirror is missing referenced records, reloading");
    self.refresh().await
  }

  /// Reloads every collection from the persistence ports.
  pub async fn refresh(&self) -> Result<Arc<MirrorSnapshot>, BillingError> {
    let mut state = self.state.write().await;

    let customers = self.billing_service.list_customers().await?;
    let items = self.billing_service.list_items().await?;
    let work_lines = self.billing_service.list_work_lines(None).await?;
    let invoices = self.billing_service.list_invoices().await?;

    let snapshot = Arc::new(MirrorSnapshot {
      customers: customers.into_iter().map(|c| (c.id, c)).collect(),
      items: items.into_iter().map(|i| (i.id, i)).collect(),
      work_lines,
      invoices,
    });

    tracing::debug!(
      "State mirror refreshed: {} customers, {} items, {} lines, {} invoices",
      snapshot.customers.len(),
      snapshot.items.len(),
      snapshot.work_lines.len(),
      snapshot.invoices.len()
    );

    state.snapshot = snapshot.clone();
    state.stale = false;
    Ok(snapshot)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::billing::{BillingServiceDependencies, CustomerDetails, CustomerName};
  use crate::infrastructure::persistence::memory::InMemoryBillingStore;

  fn service() -> Arc<BillingService> {
    let store = Arc::new(InMemoryBillingStore::new());
    Arc::new(BillingService::new(BillingServiceDependencies {
      customer_repo: store.clone(),
      item_repo: store.clone(),
      work_line_repo: store.clone(),
      invoice_repo: store.clone(),
      ledger: store,
    }))
  }

  #[tokio::test]
  async fn test_snapshot_reloads_after_invalidate() {
    let service = service();
    let mirror = StateMirror::new(service.clone());

    assert!(mirror.snapshot().await.unwrap().customers.is_empty());
    assert!(!mirror.is_stale().await);

    let customer = service
      .create_customer(
        CustomerName::new("Ferretería Sol".to_string()).unwrap(),
        CustomerDetails::default(),
      )
      .await
      .unwrap();

    // not invalidated yet: still the old copy
    assert!(mirror.snapshot().await.unwrap().customers.is_empty());

    mirror.invalidate().await;
    let snapshot = mirror.snapshot().await.unwrap();
    assert_eq!(snapshot.customer_name(customer.id), Some("Ferretería Sol"));
  }
}
