//! Calendar math for week/month views.
//!
//! # Responsibility
//! - Period boundaries and day enumeration (`range`).
//! - Grid cell derivation (`grid`).
//! - Visible-range filtering and column geometry (`placement`).
//! - Display formatting (`format`).
//!
//! # Invariants
//! - Pure functions only; no I/O and no implicit clock reads.
//! - Local wall-clock semantics (`chrono::NaiveDateTime`), no zone math.

pub mod format;
pub mod grid;
pub mod placement;
pub mod range;
