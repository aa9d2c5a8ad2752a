//! Injectable wall-clock source.
//!
//! # Responsibility
//! - Provide the "current instant" to services that answer relative
//!   questions (today, upcoming, past).
//! - Keep calendar math pure by passing `now` explicitly.
//!
//! # Invariants
//! - All instants are local wall-clock values; no time-zone conversion
//!   happens anywhere in core.
//! - Only outermost call sites should construct `SystemClock`.

use chrono::{Local, NaiveDateTime};

/// Source of the current local wall-clock instant.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host clock in the viewer's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a caller-provided instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
