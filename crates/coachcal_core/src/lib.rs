//! Core domain logic for CoachCal.
//! This crate is the single source of truth for calendar math, session
//! scheduling rules and client records.

pub mod calendar;
pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::grid::DayCell;
pub use calendar::placement::{HourBand, Placement, PlacementError, SlotPosition, TimedEntity};
pub use calendar::range::{DateRange, Period};
pub use clock::{Clock, FixedClock, SystemClock};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::client::{Client, ClientId, ClientStatus};
pub use model::session::{Session, SessionId, SessionStatus};
pub use model::ValidationError;
pub use repo::client_repo::{ClientListQuery, ClientRepository, SqliteClientRepository};
pub use repo::session_repo::{SessionListQuery, SessionRepository, SqliteSessionRepository};
pub use repo::{RepoError, RepoResult};
pub use service::calendar_service::{
    CalendarService, CalendarServiceError, DayView, MonthView, WeekView,
};
pub use service::client_service::{ClientDraft, ClientService};
pub use service::demo::{reset_to_demo_data, DemoSeedSummary};
pub use service::export::export_sessions_csv;
pub use service::session_service::{
    DateRangeFilter, ScheduleSessionRequest, SessionService, SessionServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
