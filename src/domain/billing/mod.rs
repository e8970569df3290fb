pub mod aggregation;
pub mod entities;
pub mod errors;
pub mod numbering;
pub mod ports;
pub mod printable;
pub mod services;
pub mod value_objects;

pub use aggregation::PendingSummary;
pub use entities::{Customer, Invoice, InvoiceDraft, IssuedInvoice, Item, WorkLine};
pub use errors::BillingError;
pub use ports::{
  CustomerRepository, InvoiceLedger, InvoiceRenderer, InvoiceRepository, ItemRepository,
  WorkLineRepository,
};
pub use printable::PrintableInvoice;
pub use services::{
  BillingService, BillingServiceDependencies, NewWorkLine, ReversedInvoice, WorkLineChanges,
};
pub use value_objects::{
  CustomerDetails, CustomerName, InvoiceNumber, ItemName, Price, Quantity, ValueObjectError,
};
