//! Demo data reset.
//!
//! # Responsibility
//! - Wipe all clients/sessions and reseed a small demo practice.
//!
//! # Invariants
//! - Reset is atomic: either every table is reseeded or nothing changes.
//! - Seeded instants are relative to the caller-provided `now`, so the
//!   demo always has sessions today, this week, and in the past.

use crate::model::client::{Client, ClientStatus};
use crate::model::session::{Session, SessionStatus};
use crate::repo::client_repo::{ClientRepository, SqliteClientRepository};
use crate::repo::session_repo::{SessionRepository, SqliteSessionRepository};
use crate::repo::RepoResult;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use log::info;
use rusqlite::Connection;

/// Row counts written by `reset_to_demo_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSeedSummary {
    pub clients: usize,
    pub sessions: usize,
}

struct DemoClient {
    name: &'static str,
    email: &'static str,
    tags: &'static [&'static str],
    status: ClientStatus,
}

const DEMO_CLIENTS: [DemoClient; 5] = [
    DemoClient {
        name: "Sarah Chen",
        email: "sarah.chen@example.com",
        tags: &["leadership", "executive"],
        status: ClientStatus::Active,
    },
    DemoClient {
        name: "Michael Rodriguez",
        email: "michael.r@example.com",
        tags: &["career"],
        status: ClientStatus::Active,
    },
    DemoClient {
        name: "Emily Watson",
        email: "emily.watson@example.com",
        tags: &["wellness"],
        status: ClientStatus::Paused,
    },
    DemoClient {
        name: "David Kim",
        email: "david.kim@example.com",
        tags: &["leadership"],
        status: ClientStatus::Active,
    },
    DemoClient {
        name: "Jessica Taylor",
        email: "jessica.t@example.com",
        tags: &[],
        status: ClientStatus::Lead,
    },
];

/// (client index, day offset, hour, minute, duration, status, location)
type DemoSession = (usize, i64, u32, u32, u32, SessionStatus, &'static str);

const DEMO_SESSIONS: [DemoSession; 7] = [
    (0, 0, 10, 0, 60, SessionStatus::Scheduled, "Zoom"),
    (1, 0, 14, 0, 45, SessionStatus::Scheduled, "Google Meet"),
    (0, 7, 14, 0, 60, SessionStatus::Scheduled, "Zoom"),
    (3, 3, 14, 0, 90, SessionStatus::Scheduled, "In-person"),
    (0, -7, 14, 0, 60, SessionStatus::Completed, "Zoom"),
    (1, -14, 14, 0, 45, SessionStatus::Completed, "Google Meet"),
    (4, -30, 14, 0, 60, SessionStatus::Cancelled, "Zoom"),
];

/// Replaces every client and session with the demo practice.
///
/// # Errors
/// - Propagates SQL and validation failures; the transaction is rolled back.
pub fn reset_to_demo_data(conn: &Connection, now: NaiveDateTime) -> RepoResult<DemoSeedSummary> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "DELETE FROM sessions;
         DELETE FROM client_tags;
         DELETE FROM clients;",
    )?;

    let clients = SqliteClientRepository::try_new(&tx)?;
    let sessions = SqliteSessionRepository::try_new(&tx)?;

    let mut client_ids = Vec::with_capacity(DEMO_CLIENTS.len());
    for (offset, demo) in (1_i64..).zip(DEMO_CLIENTS.iter()) {
        let mut client = Client::new(demo.name, now - Duration::days(30 * offset));
        client.email = Some(demo.email.to_string());
        client.tags = demo.tags.iter().map(|tag| tag.to_string()).collect();
        client.status = demo.status;
        client_ids.push(clients.create_client(&client)?);
    }

    for &(client_index, days, hour, minute, duration, status, location) in &DEMO_SESSIONS {
        let day = now.date() + Duration::days(days);
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
        let mut session = Session::new(
            client_ids[client_index],
            day.and_time(time),
            duration,
            location,
        );
        session.status = status;
        sessions.create_session(&session)?;
    }

    tx.commit()?;

    let summary = DemoSeedSummary {
        clients: DEMO_CLIENTS.len(),
        sessions: DEMO_SESSIONS.len(),
    };
    info!(
        "event=demo_reset module=service status=ok clients={} sessions={}",
        summary.clients, summary.sessions
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::{DEMO_CLIENTS, DEMO_SESSIONS};

    #[test]
    fn demo_sessions_reference_known_clients() {
        assert!(DEMO_SESSIONS
            .iter()
            .all(|session| session.0 < DEMO_CLIENTS.len()));
    }

    #[test]
    fn demo_sessions_have_positive_durations() {
        assert!(DEMO_SESSIONS.iter().all(|session| session.4 > 0));
    }
}
