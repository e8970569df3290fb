//! Work-line invoicing service.
//!
//! Work lines (quantity × price of a catalog item delivered to a customer)
//! accumulate as pending; issuing an invoice claims every pending line of a
//! customer under a sequential `YYYY-NNNN` number, and reversing it releases
//! them again.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
