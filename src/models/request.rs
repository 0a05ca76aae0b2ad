//! Service request model
//!
//! A request is raised by a user for one of the platform's services and may
//! optionally be tied to an organization. Its only behavior is temporal: a
//! request "pends" from the moment it is stamped, and callers ask whether it
//! has been pending longer than some window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::{AppError, AppResult};

/// Unit names accepted by [`PendingFor`], quoted in the invalid-span error.
const RECOGNIZED_UNITS: &str = "seconds, minutes, hours, days, weeks, months, years";

/// A service request raised by a user.
///
/// `created_at` is refreshed on every save, not just on insert, so it
/// behaves as a last-modified stamp. The name is kept for compatibility
/// with the persisted schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub service_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    pub user_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub service_id: Uuid,
}

/// A pending window expressed as per-unit magnitudes.
///
/// `None` means the unit was not supplied; `Some(0)` means it was supplied
/// with magnitude zero. The distinction matters: a span with no units at
/// all is an error, a span of all zeros is simply a zero-length window.
/// Unknown fields are ignored when deserializing, so foreign keys in a
/// payload are dropped silently rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingFor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<i64>,
}

impl PendingFor {
    /// Span of whole days.
    pub fn days(days: i64) -> Self {
        Self {
            days: Some(days),
            ..Self::default()
        }
    }

    /// True when no unit was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.seconds.is_none()
            && self.minutes.is_none()
            && self.hours.is_none()
            && self.days.is_none()
            && self.weeks.is_none()
            && self.months.is_none()
            && self.years.is_none()
    }

    /// Compose the span into a concrete [`Duration`].
    ///
    /// `years` and `months` are not calendar-aware: a year counts as a flat
    /// 365 days and a month as a flat 30, folded into the `days` component
    /// before composition. Leap years and real month lengths are ignored on
    /// purpose; downstream windows are calibrated against this arithmetic.
    ///
    /// Magnitudes that overflow `i64` or exceed what a [`Duration`] can hold
    /// are reported as [`AppError::InvalidArgument`], never a panic; spans
    /// may arrive from untrusted payloads via serde.
    pub fn as_duration(&self) -> AppResult<Duration> {
        if self.is_empty() {
            return Err(AppError::InvalidArgument(format!(
                "no valid time keys provided, allowed keys: {}",
                RECOGNIZED_UNITS
            )));
        }

        let overflow =
            || AppError::InvalidArgument("time span exceeds the representable range".to_string());

        let folded_days = self
            .years
            .unwrap_or(0)
            .checked_mul(365)
            .zip(self.months.unwrap_or(0).checked_mul(30))
            .and_then(|(years, months)| years.checked_add(months))
            .and_then(|folded| folded.checked_add(self.days.unwrap_or(0)))
            .ok_or_else(overflow)?;

        let parts = [
            Duration::try_weeks(self.weeks.unwrap_or(0)),
            Duration::try_days(folded_days),
            Duration::try_hours(self.hours.unwrap_or(0)),
            Duration::try_minutes(self.minutes.unwrap_or(0)),
            Duration::try_seconds(self.seconds.unwrap_or(0)),
        ];

        parts
            .into_iter()
            .try_fold(Duration::zero(), |total, part| {
                part.and_then(|part| total.checked_add(&part))
            })
            .ok_or_else(overflow)
    }
}

impl Request {
    /// Whether this request has been pending longer than the given window.
    ///
    /// Compares elapsed wall-clock time since `created_at` against the
    /// composed window; strictly greater means pending. Read-only.
    pub fn is_pending_for(&self, window: PendingFor) -> AppResult<bool> {
        Ok(Utc::now() - self.created_at > window.as_duration()?)
    }

    /// True while the request has been pending for less than a day and
    /// change.
    ///
    /// The window mixes every unit of [`PendingFor`] on purpose; it is as
    /// much a showcase of the span type as a business rule.
    pub fn is_newly_requested(&self) -> AppResult<bool> {
        let window = PendingFor {
            seconds: Some(1),
            minutes: Some(1),
            hours: Some(1),
            days: Some(1),
            weeks: Some(0),
            months: Some(0),
            years: Some(0),
        };
        Ok(!self.is_pending_for(window)?)
    }

    /// True once the request has been pending for more than 30 days.
    pub fn is_pending_too_long(&self) -> AppResult<bool> {
        self.is_pending_for(PendingFor::days(30))
    }
}
