pub mod add_work_line;
pub mod create_customer;
pub mod create_item;
pub mod delete_customer;
pub mod delete_item;
pub mod delete_work_line;
pub mod dtos;
pub mod issue_invoice;
pub mod list_customers;
pub mod list_invoices;
pub mod list_items;
pub mod list_pending;
pub mod list_work_lines;
pub mod print_invoice;
pub mod reverse_invoice;
pub mod update_customer;
pub mod update_item;
pub mod update_work_line;

pub use add_work_line::{AddWorkLineCommand, AddWorkLineUseCase};
pub use create_customer::{CreateCustomerCommand, CreateCustomerUseCase};
pub use create_item::{CreateItemCommand, CreateItemUseCase};
pub use delete_customer::{DeleteCustomerCommand, DeleteCustomerUseCase};
pub use delete_item::{DeleteItemCommand, DeleteItemUseCase};
pub use delete_work_line::{DeleteWorkLineCommand, DeleteWorkLineUseCase};
pub use dtos::{CustomerDto, InvoiceDto, ItemDto, WorkLineDto};
pub use issue_invoice::{IssueInvoiceCommand, IssueInvoiceResponse, IssueInvoiceUseCase};
pub use list_customers::{ListCustomersResponse, ListCustomersUseCase};
pub use list_invoices::{ListInvoicesResponse, ListInvoicesUseCase};
pub use list_items::{ListItemsResponse, ListItemsUseCase};
pub use list_pending::{CustomerPendingResponse, ListPendingResponse, ListPendingUseCase};
pub use list_work_lines::{ListWorkLinesCommand, ListWorkLinesResponse, ListWorkLinesUseCase};
pub use print_invoice::{PrintInvoiceCommand, PrintInvoiceUseCase};
pub use reverse_invoice::{ReverseInvoiceCommand, ReverseInvoiceResponse, ReverseInvoiceUseCase};
pub use update_customer::{UpdateCustomerCommand, UpdateCustomerUseCase};
pub use update_item::{UpdateItemCommand, UpdateItemUseCase};
pub use update_work_line::{UpdateWorkLineCommand, UpdateWorkLineUseCase};
