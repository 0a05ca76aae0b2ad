//! Startup Requests Library
//!
//! This crate provides the service-request and contact-message data layer for
//! the internship startup-services platform: SQLite-backed storage for
//! requests raised by users, the single message each request may carry, and
//! the pending-time predicates evaluated against them.

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod utils;

pub use config::AppConfig;
pub use db::{init_pool, DbPool};
pub use models::{Message, NewMessage, NewRequest, PendingFor, Request, UpdateMessage};
pub use utils::error::{AppError, AppResult};
