//! Client repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `clients` and `client_tags` storage.
//! - Keep tag ordering and replacement inside one savepoint, so writes
//!   also compose with an outer transaction (demo reset).
//!
//! # Invariants
//! - Write paths call `Client::validate()` before SQL mutations.
//! - Deleting a client cascades to its sessions and tags.
//! - Lists are ordered by `name` (case-insensitive), then `id`.

use super::{ensure_tables, parse_uuid, with_savepoint, RepoError, RepoResult};
use crate::db::{instant_to_db, parse_db_instant};
use crate::model::client::{Client, ClientId, ClientStatus};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone,
    status,
    created_at
FROM clients";

/// Query options for listing clients.
#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub status: Option<ClientStatus>,
    /// Case-insensitive (Unicode) substring match on `name`; blank matches all.
    pub name_contains: Option<String>,
}

/// Repository interface for client CRUD operations.
pub trait ClientRepository {
    fn create_client(&self, client: &Client) -> RepoResult<ClientId>;
    fn update_client(&self, client: &Client) -> RepoResult<()>;
    fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>>;
    fn list_clients(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>>;
    fn delete_client(&self, id: ClientId) -> RepoResult<()>;
}

/// SQLite-backed client repository.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["clients", "client_tags"])?;
        Ok(Self { conn })
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn create_client(&self, client: &Client) -> RepoResult<ClientId> {
        client.validate()?;

        with_savepoint(self.conn, "client_create", |conn| {
            conn.execute(
                "INSERT INTO clients (id, name, email, phone, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    client.id.to_string(),
                    client.name.trim(),
                    client.email.as_deref(),
                    client.phone.as_deref(),
                    client.status.as_str(),
                    instant_to_db(client.created_at),
                ],
            )?;
            write_tags(conn, client)
        })?;

        Ok(client.id)
    }

    fn update_client(&self, client: &Client) -> RepoResult<()> {
        client.validate()?;

        with_savepoint(self.conn, "client_update", |conn| {
            let changed = conn.execute(
                "UPDATE clients
                 SET
                    name = ?1,
                    email = ?2,
                    phone = ?3,
                    status = ?4,
                    created_at = ?5
                 WHERE id = ?6;",
                params![
                    client.name.trim(),
                    client.email.as_deref(),
                    client.phone.as_deref(),
                    client.status.as_str(),
                    instant_to_db(client.created_at),
                    client.id.to_string(),
                ],
            )?;

            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "client",
                    id: client.id,
                });
            }

            conn.execute(
                "DELETE FROM client_tags WHERE client_id = ?1;",
                [client.id.to_string()],
            )?;
            write_tags(conn, client)
        })?;

        Ok(())
    }

    fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_client_row(self.conn, row)?));
        }

        Ok(None)
    }

    fn list_clients(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        let mut sql = format!("{CLIENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        sql.push_str(" ORDER BY name COLLATE NOCASE ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut clients = Vec::new();

        let needle = query
            .name_contains
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_lowercase);

        while let Some(row) = rows.next()? {
            let client = parse_client_row(self.conn, row)?;
            if needle
                .as_deref()
                .map_or(true, |needle| name_matches(&client.name, needle))
            {
                clients.push(client);
            }
        }

        Ok(clients)
    }

    fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "client",
                id,
            });
        }

        Ok(())
    }
}

fn write_tags(conn: &Connection, client: &Client) -> RepoResult<()> {
    let id_text = client.id.to_string();
    for (position, tag) in client.tags.iter().enumerate() {
        conn.execute(
            "INSERT INTO client_tags (client_id, position, tag) VALUES (?1, ?2, ?3);",
            params![id_text.as_str(), position as i64, tag.trim()],
        )?;
    }
    Ok(())
}

fn load_tags(conn: &Connection, id_text: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM client_tags
         WHERE client_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([id_text])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn parse_client_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Client> {
    let id_text: String = row.get("id")?;

    let status_text: String = row.get("status")?;
    let status = ClientStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid client status `{status_text}` in clients.status"
        ))
    })?;

    let created_text: String = row.get("created_at")?;
    let created_at = parse_db_instant(&created_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid instant `{created_text}` in clients.created_at"
        ))
    })?;

    let client = Client {
        id: parse_uuid(&id_text, "clients.id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        tags: load_tags(conn, &id_text)?,
        status,
        created_at,
    };
    client.validate()?;
    Ok(client)
}

/// Unicode-aware containment; `needle` is already lowercased.
fn name_matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}
