use chrono::{NaiveDate, NaiveDateTime};
use coachcal_core::calendar::range::Period;
use coachcal_core::db::open_db_in_memory;
use coachcal_core::{
    CalendarService, Client, ClientRepository, FixedClock, HourBand, Session, SessionRepository,
    SqliteClientRepository, SqliteSessionRepository,
};
use rusqlite::Connection;

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn seed(conn: &Connection, starts: &[(NaiveDateTime, u32)]) {
    let clients = SqliteClientRepository::try_new(conn).unwrap();
    let client = Client::new("Sarah Chen", at(11, 1, 9, 0));
    clients.create_client(&client).unwrap();

    let sessions = SqliteSessionRepository::try_new(conn).unwrap();
    for &(date_time, minutes) in starts {
        sessions
            .create_session(&Session::new(client.id, date_time, minutes, "Zoom"))
            .unwrap();
    }
}

#[test]
fn visible_sessions_use_inclusive_week_bounds() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[
            (at(12, 14, 23, 0), 60),
            (at(12, 15, 0, 0), 60),
            (at(12, 7, 23, 59), 30),
        ],
    );
    let service = CalendarService::new(
        SqliteSessionRepository::try_new(&conn).unwrap(),
        FixedClock(at(12, 11, 8, 0)),
    );

    let visible = service
        .visible_sessions(Period::Week, at(12, 11, 12, 0))
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].date_time, at(12, 14, 23, 0));
}

#[test]
fn week_view_places_sessions_and_keeps_out_of_band_ones() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[
            (at(12, 11, 9, 30), 45),
            (at(12, 11, 6, 0), 30),
            (at(12, 13, 19, 45), 10),
            (at(12, 13, 20, 0), 60),
        ],
    );
    let service = CalendarService::new(
        SqliteSessionRepository::try_new(&conn).unwrap(),
        FixedClock(at(12, 11, 8, 0)),
    );

    let view = service.week_view(at(12, 11, 12, 0)).unwrap();
    assert_eq!(view.range, Period::Week.bounds(at(12, 11, 12, 0)));
    assert_eq!(view.columns[0].cell.date, at(12, 8, 0, 0).date());

    let wednesday = &view.columns[3];
    assert!(wednesday.cell.is_today);
    assert_eq!(wednesday.blocks.len(), 1);
    assert_eq!(wednesday.blocks[0].slot.top_px, 120.0);
    assert_eq!(wednesday.blocks[0].slot.height_px, 36.0);
    assert_eq!(wednesday.outside_band.len(), 1);
    assert_eq!(wednesday.outside_band[0].date_time, at(12, 11, 6, 0));

    let friday = &view.columns[5];
    assert_eq!(friday.blocks.len(), 1);
    assert_eq!(friday.blocks[0].slot.top_px, 12.0 * 48.0 + 36.0);
    assert_eq!(friday.blocks[0].slot.height_px, 24.0);
    assert_eq!(friday.outside_band.len(), 1);
}

#[test]
fn custom_band_changes_geometry() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, &[(at(12, 11, 9, 30), 45)]);
    let band = HourBand {
        start_hour: 9,
        end_hour: 17,
        px_per_hour: 60.0,
        min_height_px: 20.0,
    };
    let service = CalendarService::with_band(
        SqliteSessionRepository::try_new(&conn).unwrap(),
        FixedClock(at(12, 11, 8, 0)),
        band,
    )
    .unwrap();

    let view = service.week_view(at(12, 11, 12, 0)).unwrap();
    let slot = view.columns[3].blocks[0].slot;
    assert_eq!(slot.top_px, 30.0);
    assert_eq!(slot.height_px, 45.0);
}

#[test]
fn month_view_covers_whole_weeks_and_padding_sessions() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[
            (at(11, 30, 10, 0), 60),
            (at(12, 31, 10, 0), 60),
            (at(12, 10, 8, 0), 30),
            (at(12, 10, 9, 0), 30),
            (at(12, 10, 10, 0), 30),
            (at(12, 10, 11, 0), 30),
        ],
    );
    let service = CalendarService::new(
        SqliteSessionRepository::try_new(&conn).unwrap(),
        FixedClock(at(12, 11, 8, 0)),
    );

    let view = service.month_view(at(12, 1, 12, 0)).unwrap();
    assert_eq!(view.title, "December 2024");
    assert_eq!(view.cells.len(), 35);
    assert_eq!(view.cells[0].cell.date, at(12, 1, 0, 0).date());
    assert_eq!(
        view.cells.last().unwrap().cell.date,
        NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()
    );

    let busy = view
        .cells
        .iter()
        .find(|cell| cell.cell.date == at(12, 10, 0, 0).date())
        .unwrap();
    assert_eq!(busy.sessions.len(), 3);
    assert_eq!(busy.hidden_count, 1);

    let nov_30 = view
        .cells
        .iter()
        .any(|cell| cell.cell.date == at(11, 30, 0, 0).date());
    assert!(!nov_30, "December 2024 starts on a Sunday; no leading padding");

    let new_years_eve = view
        .cells
        .iter()
        .find(|cell| cell.cell.date == at(12, 31, 0, 0).date())
        .unwrap();
    assert!(new_years_eve.cell.in_current_period);
    assert_eq!(new_years_eve.sessions.len(), 1);
}
