//! Coaching-practice domain model.
//!
//! # Responsibility
//! - Define canonical records for clients and their sessions.
//! - Own field-level validation shared by every persistence path.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - Status values are closed enums; unknown strings never reach core.

pub mod client;
pub mod session;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure for domain records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NilId(&'static str),
    ZeroDuration,
    BlankLocation,
    BlankName,
    InvalidEmail(String),
    BlankTag,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId(field) => write!(f, "{field} must not be the nil uuid"),
            Self::ZeroDuration => write!(f, "duration_minutes must be > 0"),
            Self::BlankLocation => write!(f, "location must not be blank"),
            Self::BlankName => write!(f, "name must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::BlankTag => write!(f, "tags must not be blank"),
        }
    }
}

impl Error for ValidationError {}
