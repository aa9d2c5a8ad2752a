//! Command-line front end for the coachcal core.
//!
//! # Responsibility
//! - Open a database (file via `--db`/`COACHCAL_DB`, otherwise in-memory demo).
//! - Print day/week/month calendar views, upcoming sessions or a CSV export.
//! - Keep output deterministic for a given database and reference date.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use coachcal_core::calendar::format::{
    format_date_time, format_day_of_week, format_duration, format_hour, format_time,
};
use coachcal_core::db::Connection;
use coachcal_core::{
    default_log_level, export_sessions_csv, init_logging, open_db, open_db_in_memory,
    reset_to_demo_data, CalendarService, Client, ClientId, ClientListQuery, ClientRepository,
    Clock, Session, SessionService, SqliteClientRepository, SqliteSessionRepository, SystemClock,
};
use log::info;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "coachcal")]
#[command(version, about = "Coaching calendar views over a SQLite session store", long_about = None)]
struct Cli {
    /// SQLite database file; omitted means an in-memory demo database
    #[arg(long, global = true, env = "COACHCAL_DB")]
    db: Option<PathBuf>,

    /// Directory for rotating log files; omitted disables file logging
    #[arg(long, global = true, env = "COACHCAL_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Agenda for one day in the hour band
    Day {
        /// Day to show (YYYY-MM-DD); defaults to today
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Sunday..Saturday week containing the date
    Week {
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Month grid containing the date
    Month {
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Scheduled sessions from now on
    Upcoming,
    /// All sessions as CSV on stdout
    Export,
    /// Replace the database contents with demo data
    Reset,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("coachcal: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(default_log_level(), &log_dir.to_string_lossy())?;
    }

    let now = SystemClock.now();
    let conn = open_connection(cli.db.as_deref(), now)?;
    info!("event=cli_run module=cli status=start");

    match cli.command.unwrap_or(Command::Week { date: None }) {
        Command::Day { date } => print_day(&conn, date.unwrap_or_else(|| now.date()))?,
        Command::Week { date } => print_week(&conn, reference(date, now))?,
        Command::Month { date } => print_month(&conn, reference(date, now))?,
        Command::Upcoming => print_upcoming(&conn)?,
        Command::Export => {
            let sessions = SqliteSessionRepository::try_new(&conn)?;
            let service = SessionService::new(sessions, SystemClock);
            let all = service.list_sessions(&Default::default())?;
            print!("{}", export_sessions_csv(&all, &client_names(&conn)?));
        }
        Command::Reset => {
            let summary = reset_to_demo_data(&conn, now)?;
            println!(
                "reset demo data: {} clients, {} sessions",
                summary.clients, summary.sessions
            );
        }
    }

    Ok(())
}

fn open_connection(db: Option<&Path>, now: NaiveDateTime) -> Result<Connection, Box<dyn Error>> {
    match db.filter(|path| !path.as_os_str().is_empty()) {
        Some(path) => Ok(open_db(path)?),
        None => {
            let conn = open_db_in_memory()?;
            reset_to_demo_data(&conn, now)?;
            Ok(conn)
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date `{value}` (expected YYYY-MM-DD): {err}"))
}

/// Noon on `date`, or now when no date was given.
fn reference(date: Option<NaiveDate>, now: NaiveDateTime) -> NaiveDateTime {
    match date {
        Some(date) => date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)),
        None => now,
    }
}

fn client_names(conn: &Connection) -> Result<HashMap<ClientId, String>, Box<dyn Error>> {
    let repo = SqliteClientRepository::try_new(conn)?;
    Ok(repo
        .list_clients(&ClientListQuery::default())?
        .into_iter()
        .map(|client: Client| (client.id, client.name))
        .collect())
}

fn describe(session: &Session, names: &HashMap<ClientId, String>) -> String {
    let name = names
        .get(&session.client_id)
        .map(String::as_str)
        .unwrap_or("Unknown Client");
    format!(
        "{:>8}  {:>6}  {} ({}, {})",
        format_time(session.date_time),
        format_duration(session.duration_minutes),
        name,
        session.location,
        session.status.as_str()
    )
}

fn print_day(conn: &Connection, date: NaiveDate) -> Result<(), Box<dyn Error>> {
    let names = client_names(conn)?;
    let service = CalendarService::new(SqliteSessionRepository::try_new(conn)?, SystemClock);
    let view = service.day_view(date)?;

    let marker = if view.column.cell.is_today { "*" } else { " " };
    println!(
        "{marker}{} (hours {} to {})",
        view.title,
        format_hour(view.band.start_hour),
        format_hour(view.band.end_hour)
    );
    if view.column.blocks.is_empty()
        && view.column.outside_band.is_empty()
        && view.column.rejected.is_empty()
    {
        println!("  no sessions");
    }
    for block in &view.column.blocks {
        println!("  {}", describe(&block.session, &names));
    }
    for session in &view.column.outside_band {
        println!("  {}  [outside hours]", describe(session, &names));
    }
    for session in &view.column.rejected {
        println!("  {}  [invalid duration]", describe(session, &names));
    }
    Ok(())
}

fn print_week(conn: &Connection, reference: NaiveDateTime) -> Result<(), Box<dyn Error>> {
    let names = client_names(conn)?;
    let service = CalendarService::new(SqliteSessionRepository::try_new(conn)?, SystemClock);
    let view = service.week_view(reference)?;

    println!(
        "{} (hours {} to {})",
        view.title,
        format_hour(view.band.start_hour),
        format_hour(view.band.end_hour)
    );
    for column in &view.columns {
        let marker = if column.cell.is_today { "*" } else { " " };
        println!(
            "{marker}{} {}",
            format_day_of_week(column.cell.date),
            column.cell.date.format("%b %-d")
        );
        for block in &column.blocks {
            println!("  {}", describe(&block.session, &names));
        }
        for session in &column.outside_band {
            println!("  {}  [outside hours]", describe(session, &names));
        }
        for session in &column.rejected {
            println!("  {}  [invalid duration]", describe(session, &names));
        }
    }
    Ok(())
}

fn print_month(conn: &Connection, reference: NaiveDateTime) -> Result<(), Box<dyn Error>> {
    let names = client_names(conn)?;
    let service = CalendarService::new(SqliteSessionRepository::try_new(conn)?, SystemClock);
    let view = service.month_view(reference)?;

    println!("{}", view.title);
    for cell in view.cells.iter().filter(|cell| !cell.sessions.is_empty()) {
        let marker = if cell.cell.is_today { "*" } else { " " };
        let padding = if cell.cell.in_current_period { "" } else { " (adjacent month)" };
        println!("{marker}{}{padding}", cell.cell.date.format("%a %b %-d"));
        for session in &cell.sessions {
            println!("  {}", describe(session, &names));
        }
        if cell.hidden_count > 0 {
            println!("  +{} more", cell.hidden_count);
        }
    }
    Ok(())
}

fn print_upcoming(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let names = client_names(conn)?;
    let service = SessionService::new(SqliteSessionRepository::try_new(conn)?, SystemClock);
    for session in service.upcoming_sessions(None)? {
        let name = names
            .get(&session.client_id)
            .map(String::as_str)
            .unwrap_or("Unknown Client");
        println!(
            "{}  {}  {}",
            format_date_time(session.date_time),
            format_duration(session.duration_minutes),
            name
        );
    }
    Ok(())
}
