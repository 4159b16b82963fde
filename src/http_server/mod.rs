//! # Storefront HTTP Server Module
//!
//! Axum server exposing the catalog query engine and the shopping chat.
//!
//! # Endpoints
//!
//! - `/` - Liveness text
//! - `/health` - Health check
//! - `/api/products` - Product search and filtering
//! - `/api/chat_with_gemini` - Chat pass-through to the completion provider

pub mod chat_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod product_routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{build_router, HttpServer};
pub use state::AppState;
