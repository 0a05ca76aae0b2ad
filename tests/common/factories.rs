//! Test factories for generating test data
//!
//! Factories create randomized test data, useful when a test needs unique
//! rows without caring about the exact values.

use std::sync::atomic::{AtomicU64, Ordering};

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use uuid::Uuid;

use startup_requests::models::NewMessage;

use crate::common::fixtures::TestUser;

/// Factory for creating unique platform users
pub struct UserFactory {
    counter: AtomicU64,
}

impl Default for UserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserFactory {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Create a unique test user
    pub fn create(&self) -> TestUser {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        TestUser {
            id: Uuid::new_v4(),
            username: format!("testuser_{}", n),
            email: format!("testuser_{}@example.com", n),
        }
    }
}

/// Factory for creating message payloads
pub struct MessageFactory {
    counter: AtomicU64,
}

impl Default for MessageFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageFactory {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Create a payload builder for a message attached to the given request
    pub fn create(&self, request_id: Uuid) -> MessageBuilder {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        MessageBuilder {
            first_name: FirstName().fake(),
            last_name: Some(LastName().fake()),
            email: SafeEmail().fake(),
            subject: format!("Inquiry {}", n),
            content: format!("Generated message body {}", n),
            related_request_id: request_id,
        }
    }
}

/// Builder for message payloads
pub struct MessageBuilder {
    first_name: String,
    last_name: Option<String>,
    email: String,
    subject: String,
    content: String,
    related_request_id: Uuid,
}

impl MessageBuilder {
    pub fn with_first_name(mut self, first_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn without_last_name(mut self) -> Self {
        self.last_name = None;
        self
    }

    pub fn build(self) -> NewMessage {
        NewMessage {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            subject: self.subject,
            content: self.content,
            related_request_id: self.related_request_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_user_factory_creates_unique_users() {
        let factory = UserFactory::new();
        let user1 = factory.create();
        let user2 = factory.create();

        assert_ne!(user1.id, user2.id);
        assert_ne!(user1.username, user2.username);
    }

    #[test]
    fn test_message_factory_builds_valid_payloads() {
        let factory = MessageFactory::new();
        let payload = factory.create(Uuid::new_v4()).build();

        assert!(payload.validate().is_ok());
    }
}
