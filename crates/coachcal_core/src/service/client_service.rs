//! Client use-case service.
//!
//! # Responsibility
//! - Normalize add/update client form input before persistence.
//! - Provide roster search and status tallies.
//!
//! # Invariants
//! - Blank optional contact fields are stored as `None`.
//! - Tags are trimmed, empty entries dropped, duplicates removed
//!   keeping first occurrence.
//! - `status_counts` always lists every status in `ClientStatus::ALL` order.

use crate::clock::Clock;
use crate::model::client::{Client, ClientId, ClientStatus};
use crate::repo::client_repo::{ClientListQuery, ClientRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;

/// Form input for creating or editing a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tags: Vec<String>,
    pub status: ClientStatus,
}

impl ClientDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            tags: Vec::new(),
            status: ClientStatus::Active,
        }
    }

    fn apply_to(&self, client: &mut Client) {
        client.name = self.name.trim().to_string();
        client.email = normalize_optional(self.email.as_deref());
        client.phone = normalize_optional(self.phone.as_deref());
        client.tags = normalize_tags(&self.tags);
        client.status = self.status;
    }
}

/// Client service facade over repository implementations.
pub struct ClientService<R: ClientRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: ClientRepository, C: Clock> ClientService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates a client stamped with the clock's current instant.
    pub fn add_client(&self, draft: &ClientDraft) -> RepoResult<Client> {
        let mut client = Client::new(String::new(), self.clock.now());
        draft.apply_to(&mut client);
        self.repo.create_client(&client)?;
        info!(
            "event=client_add module=service status=ok client_status={} tags={}",
            client.status.as_str(),
            client.tags.len()
        );
        Ok(client)
    }

    /// Replaces editable fields; `id` and `created_at` are preserved.
    pub fn update_client(&self, id: ClientId, draft: &ClientDraft) -> RepoResult<Client> {
        let mut client = self.get_client(id)?;
        draft.apply_to(&mut client);
        self.repo.update_client(&client)?;
        Ok(client)
    }

    pub fn get_client(&self, id: ClientId) -> RepoResult<Client> {
        self.repo.get_client(id)?.ok_or(RepoError::NotFound {
            entity: "client",
            id,
        })
    }

    /// Case-insensitive name search with an optional status filter.
    pub fn search_clients(
        &self,
        name_contains: &str,
        status: Option<ClientStatus>,
    ) -> RepoResult<Vec<Client>> {
        self.repo.list_clients(&ClientListQuery {
            status,
            name_contains: Some(name_contains.to_string()),
        })
    }

    /// Number of clients per status, zero entries included.
    pub fn status_counts(&self) -> RepoResult<Vec<(ClientStatus, usize)>> {
        let clients = self.repo.list_clients(&ClientListQuery::default())?;
        Ok(ClientStatus::ALL
            .into_iter()
            .map(|status| {
                let count = clients
                    .iter()
                    .filter(|client| client.status == status)
                    .count();
                (status, count)
            })
            .collect())
    }

    pub fn active_count(&self) -> RepoResult<usize> {
        Ok(self
            .repo
            .list_clients(&ClientListQuery {
                status: Some(ClientStatus::Active),
                name_contains: None,
            })?
            .len())
    }

    /// Deletes a client together with its sessions.
    pub fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        self.repo.delete_client(id)?;
        info!("event=client_delete module=service status=ok");
        Ok(())
    }
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().map(|tag| tag.trim()).filter(|tag| !tag.is_empty()) {
        if !normalized.iter().any(|existing| existing == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}
