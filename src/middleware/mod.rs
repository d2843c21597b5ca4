pub mod auth;
pub mod response;

pub use auth::{require_admin, AdminGate, GateDecision, ADMIN_TOKEN_HEADER};
pub use response::{ApiResponse, ApiResult};
