pub mod config;
pub mod database;
pub mod migrations;

pub use config::{AppConfig, AuthConfig, DatabaseConfig, PaymentConfig, ServerConfig};
pub use database::{connect, Database};
