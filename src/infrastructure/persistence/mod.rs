pub mod memory;
pub mod postgres;

pub use memory::InMemoryBillingStore;
