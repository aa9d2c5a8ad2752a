//! CSV export of session lists.

use crate::model::client::ClientId;
use crate::model::session::Session;
use std::collections::HashMap;

const CSV_HEADER: &str = "date,time,client,duration_minutes,status,location,program_id";
const UNKNOWN_CLIENT: &str = "Unknown Client";

/// Renders `sessions` as CSV, one row per session in input order.
///
/// Fields containing commas, quotes or line breaks are quoted with doubled
/// inner quotes. Clients missing from `client_names` export as
/// `Unknown Client`.
pub fn export_sessions_csv(sessions: &[Session], client_names: &HashMap<ClientId, String>) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for session in sessions {
        let client = client_names
            .get(&session.client_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CLIENT);
        let row = [
            session.date_time.format("%Y-%m-%d").to_string(),
            session.date_time.format("%H:%M").to_string(),
            csv_quote(client),
            session.duration_minutes.to_string(),
            session.status.as_str().to_string(),
            csv_quote(&session.location),
            csv_quote(session.program_id.as_deref().unwrap_or("")),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
