//! Contact message repository

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Message, NewMessage, UpdateMessage};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: String,
    first_name: String,
    last_name: Option<String>,
    email: String,
    subject: String,
    content: String,
    related_request: String,
    created_at: String,
}

pub struct MessageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MessageRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a message for a request.
    ///
    /// Fails with a conflict when the request already has a message; the
    /// one-to-one link is enforced by a unique index on `related_request`.
    pub async fn create(&self, req: &NewMessage) -> AppResult<Message> {
        req.validate()?;

        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO startup_message
                (id, first_name, last_name, email, subject, content, related_request, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.email)
        .bind(&req.subject)
        .bind(&req.content)
        .bind(req.related_request_id.to_string())
        .bind(&now)
        .execute(self.pool)
        .await?;

        debug!("Created message {} for request {}", id, req.related_request_id);

        self.get_by_id(id).await?.ok_or_else(|| {
            AppError::Internal("failed to reload message after insert".to_string())
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Message>> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, first_name, last_name, email, subject, content, related_request, created_at
            FROM startup_message
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(row_to_message))
    }

    pub async fn get_by_request(&self, request_id: Uuid) -> AppResult<Option<Message>> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, first_name, last_name, email, subject, content, related_request, created_at
            FROM startup_message
            WHERE related_request = ?
            "#,
        )
        .bind(request_id.to_string())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(row_to_message))
    }

    /// Fetch a message by an id string of unknown provenance.
    ///
    /// Malformed ids are treated the same as absent ones: the caller gets
    /// `None`, never an error. Intended for ids arriving from URLs or other
    /// untrusted input.
    pub async fn lookup(&self, id: &str) -> AppResult<Option<Message>> {
        match Uuid::parse_str(id) {
            Ok(parsed) => self.get_by_id(parsed).await,
            Err(_) => {
                debug!("Ignoring malformed message id {:?}", id);
                Ok(None)
            }
        }
    }

    /// All messages, most recently stamped first.
    pub async fn list(&self) -> AppResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, first_name, last_name, email, subject, content, related_request, created_at
            FROM startup_message
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_message).collect())
    }

    /// Update a message in place. Saving refreshes `created_at`.
    pub async fn update(&self, id: Uuid, req: &UpdateMessage) -> AppResult<Option<Message>> {
        req.validate()?;

        let existing = self.get_by_id(id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let first_name = req.first_name.clone().unwrap_or(existing.first_name);
        let last_name = req.last_name.clone().or(existing.last_name);
        let email = req.email.clone().unwrap_or(existing.email);
        let subject = req.subject.clone().unwrap_or(existing.subject);
        let content = req.content.clone().unwrap_or(existing.content);
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            UPDATE startup_message
            SET first_name = ?, last_name = ?, email = ?, subject = ?, content = ?, created_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&subject)
        .bind(&content)
        .bind(&now)
        .bind(id.to_string())
        .execute(self.pool)
        .await?;

        debug!("Updated message {}", id);

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM startup_message WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!("Deleted message {}", id);
        }
        Ok(deleted)
    }
}

fn parse_db_timestamp(ts: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S") {
        return DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc);
    }
    Utc::now()
}

fn row_to_message(row: MessageRow) -> Message {
    Message {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        subject: row.subject,
        content: row.content,
        related_request_id: Uuid::parse_str(&row.related_request).unwrap_or_else(|_| Uuid::nil()),
        created_at: parse_db_timestamp(&row.created_at),
    }
}
