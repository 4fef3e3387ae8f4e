//! HTTP API: server, routing, guards and request/response mapping.

pub mod app;
pub mod config;
pub mod guard;
pub mod middleware;

pub use config::ApiConfig;
