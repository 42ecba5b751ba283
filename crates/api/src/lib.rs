pub mod router;
pub mod state;
pub mod error;
pub mod auth_handlers;
pub mod cart_handlers;
pub mod payment_handlers;
pub mod middleware;

pub use error::{ApiError, ApiResponse, ErrorResponse};
pub use state::AppState;
