//! Shopping carts of authenticated users
//!
//! Every operation is scoped to the owning user; carts of other users are
//! reported as not found.

pub mod model;
pub mod service;

pub use model::{AddCart, Cart, UpdateQty};
pub use service::CartService;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cart not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, CartError>;
