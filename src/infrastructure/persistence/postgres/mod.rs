pub mod customer_repository;
pub mod invoice_ledger;
pub mod invoice_repository;
pub mod item_repository;
pub mod work_line_repository;

#[cfg(test)]
pub(crate) mod test_support;

pub use customer_repository::PostgresCustomerRepository;
pub use invoice_ledger::PostgresInvoiceLedger;
pub use invoice_repository::PostgresInvoiceRepository;
pub use item_repository::PostgresItemRepository;
pub use work_line_repository::PostgresWorkLineRepository;
