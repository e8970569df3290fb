pub mod customers;
pub mod invoices;
pub mod items;
pub mod work_lines;
