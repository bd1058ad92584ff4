pub mod api;
pub mod api_response;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use api::{AppState, router};
pub use config::Config;
pub use error::ApiError;
