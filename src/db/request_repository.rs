//! Service request repository

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::db::message_repository::MessageRepository;
use crate::models::{Message, NewRequest, Request};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    id: String,
    user: String,
    organization: Option<String>,
    service: String,
    created_at: String,
}

pub struct RequestRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RequestRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: &NewRequest) -> AppResult<Request> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO statup_request (id, user, organization, service, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(req.user_id.to_string())
        .bind(req.organization_id.map(|o| o.to_string()))
        .bind(req.service_id.to_string())
        .bind(&now)
        .execute(self.pool)
        .await?;

        debug!("Created request {} for user {}", id, req.user_id);

        self.get_by_id(id).await?.ok_or_else(|| {
            AppError::Internal("failed to reload request after insert".to_string())
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Request>> {
        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, user, organization, service, created_at
            FROM statup_request
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(row_to_request))
    }

    /// All requests, most recently stamped first.
    pub async fn list(&self) -> AppResult<Vec<Request>> {
        let rows = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, user, organization, service, created_at
            FROM statup_request
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_request).collect())
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Request>> {
        let rows = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, user, organization, service, created_at
            FROM statup_request
            WHERE user = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_request).collect())
    }

    /// Attach the request to an organization, or detach it with `None`.
    ///
    /// Saving refreshes `created_at`: the column doubles as a last-modified
    /// stamp, so the pending clock restarts on every write.
    pub async fn assign_organization(
        &self,
        id: Uuid,
        organization_id: Option<Uuid>,
    ) -> AppResult<Option<Request>> {
        let existing = self.get_by_id(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            UPDATE statup_request
            SET organization = ?, created_at = ?
            WHERE id = ?
            "#,
        )
        .bind(organization_id.map(|o| o.to_string()))
        .bind(&now)
        .bind(id.to_string())
        .execute(self.pool)
        .await?;

        debug!("Assigned request {} to organization {:?}", id, organization_id);

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM statup_request WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!("Deleted request {}", id);
        }
        Ok(deleted)
    }

    /// The message attached to this request, if one exists.
    pub async fn get_message(&self, id: Uuid) -> AppResult<Option<Message>> {
        MessageRepository::new(self.pool).get_by_request(id).await
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

fn row_to_request(row: RequestRow) -> Request {
    Request {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        user_id: Uuid::parse_str(&row.user).unwrap_or_else(|_| Uuid::nil()),
        organization_id: row
            .organization
            .as_deref()
            .and_then(|s| Uuid::parse_str(s).ok()),
        service_id: Uuid::parse_str(&row.service).unwrap_or_else(|_| Uuid::nil()),
        created_at: parse_db_timestamp(&row.created_at),
    }
}
