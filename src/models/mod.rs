//! Data models

pub mod message;
pub mod request;

pub use message::{Message, NewMessage, UpdateMessage};
pub use request::{NewRequest, PendingFor, Request};
