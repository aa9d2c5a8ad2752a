//! Client domain model.
//!
//! # Invariants
//! - `name` is never blank.
//! - `email`, when present, has the `local@domain.tld` shape.
//! - Tags are trimmed and non-empty.

use super::ValidationError;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub type ClientId = Uuid;

/// Coaching relationship state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    Paused,
    Completed,
    /// Prospect not yet enrolled.
    Lead,
}

impl ClientStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Paused, Self::Completed, Self::Lead];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Lead => "lead",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "completed" => Some(Self::Completed),
            "lead" => Some(Self::Lead),
            _ => None,
        }
    }
}

/// Individual being coached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tags: Vec<String>,
    pub status: ClientStatus,
    pub created_at: NaiveDateTime,
}

impl Client {
    /// Creates an active client with a generated ID and no contact details.
    pub fn new(name: impl Into<String>, created_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: None,
            phone: None,
            tags: Vec::new(),
            status: ClientStatus::Active,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("client.id"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if let Some(email) = self.email.as_deref() {
            if !EMAIL_RE.is_match(email) {
                return Err(ValidationError::InvalidEmail(email.to_string()));
            }
        }
        if self.tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(ValidationError::BlankTag);
        }
        Ok(())
    }

    /// Up to two uppercase initials ("Sarah Chen" -> "SC").
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}
