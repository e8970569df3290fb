pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::ErrorResponse;
pub use errors::{ApiError, ConflictKind};
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{BillingRouteDependencies, configure_billing_routes};
