// Arena - wallet-authenticated social backend

// Configuration and process wiring
pub mod app_state;
pub mod config;

// Persistence - SQLx/PostgreSQL pool and per-entity queries
pub mod database;

// Domain types and services
pub mod models;
pub mod services;

// Request validation and the HTTP surface
pub mod routes;
pub mod validation;

// Common utilities
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
