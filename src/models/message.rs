//! Contact message model
//!
//! Each service request can carry at most one message from the requesting
//! party. The exclusive link is enforced by the storage layer; this module
//! owns the field constraints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A message attached to a service request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub subject: String,
    pub content: String,
    /// The request this message belongs to. At most one message per request.
    pub related_request_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a message.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMessage {
    #[validate(length(min = 1, max = 32, message = "first name must be 1 to 32 characters"))]
    pub first_name: String,
    #[validate(length(max = 32, message = "last name must be at most 32 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email address is not valid"))]
    pub email: String,
    #[validate(length(min = 1, max = 512, message = "subject must be 1 to 512 characters"))]
    pub subject: String,
    #[validate(length(min = 1, max = 4096, message = "content must be 1 to 4096 characters"))]
    pub content: String,
    pub related_request_id: Uuid,
}

/// Payload for updating a message. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMessage {
    #[validate(length(min = 1, max = 32, message = "first name must be 1 to 32 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 32, message = "last name must be at most 32 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email address is not valid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 512, message = "subject must be 1 to 512 characters"))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 4096, message = "content must be 1 to 4096 characters"))]
    pub content: Option<String>,
}
