//! Session domain model.
//!
//! # Responsibility
//! - Define the coaching appointment record consumed by calendar views.
//! - Provide lifecycle helpers for status transitions.
//!
//! # Invariants
//! - `duration_minutes` is strictly positive for persisted sessions.
//! - `date_time` is a local wall-clock instant.
//! - New sessions start as `SessionStatus::Scheduled`.

use super::client::ClientId;
use super::ValidationError;
use crate::calendar::placement::TimedEntity;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SessionId = Uuid;

/// Appointment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub const ALL: [Self; 3] = [Self::Scheduled, Self::Completed, Self::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(Self::Scheduled),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// One coaching appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub client_id: ClientId,
    /// Opaque reference to a coaching program, if any.
    pub program_id: Option<String>,
    pub date_time: NaiveDateTime,
    pub duration_minutes: u32,
    pub status: SessionStatus,
    /// Free-form meeting place ("Zoom", "In-person", ...).
    pub location: String,
}

impl Session {
    /// Creates a scheduled session with a generated ID.
    pub fn new(
        client_id: ClientId,
        date_time: NaiveDateTime,
        duration_minutes: u32,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            program_id: None,
            date_time,
            duration_minutes,
            status: SessionStatus::Scheduled,
            location: location.into(),
        }
    }

    /// Creates a scheduled session with a caller-provided ID.
    ///
    /// Used by seeding/import paths where identity already exists.
    pub fn with_id(
        id: SessionId,
        client_id: ClientId,
        date_time: NaiveDateTime,
        duration_minutes: u32,
        location: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if id.is_nil() {
            return Err(ValidationError::NilId("session.id"));
        }
        let mut session = Self::new(client_id, date_time, duration_minutes, location);
        session.id = id;
        Ok(session)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("session.id"));
        }
        if self.client_id.is_nil() {
            return Err(ValidationError::NilId("session.client_id"));
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::BlankLocation);
        }
        Ok(())
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.date_time + Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == SessionStatus::Scheduled
    }

    pub fn complete(&mut self) {
        self.status = SessionStatus::Completed;
    }

    pub fn cancel(&mut self) {
        self.status = SessionStatus::Cancelled;
    }
}

impl TimedEntity for Session {
    fn starts_at(&self) -> NaiveDateTime {
        self.date_time
    }

    fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}
