//! Process-wide and task-scoped clients

use super::Client;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use std::future::Future;
use tracing::info;

tokio::task_local! {
    static SCOPED_CLIENT: Client;
}

/// A slot that accepts exactly one client
///
/// The process-wide client lives in a static `ClientSlot`; the type is
/// public so applications can keep their own once-only slots.
#[derive(Debug, Default)]
pub struct ClientSlot {
    cell: OnceCell<Client>,
}

impl ClientSlot {
    /// Create an empty slot
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Store the client; fails if the slot is already filled
    ///
    /// The first client stays in place when this fails.
    pub fn configure(&self, client: Client) -> Result<&Client> {
        let new_url = client.base_url().to_string();
        match self.cell.try_insert(client) {
            Ok(stored) => Ok(stored),
            Err((existing, _rejected)) => Err(Error::ClientAlreadyConfigured {
                old_url: existing.base_url().to_string(),
                new_url,
            }),
        }
    }

    /// The stored client
    pub fn get(&self) -> Option<&Client> {
        self.cell.get()
    }

    /// Check whether a client was stored
    pub fn is_configured(&self) -> bool {
        self.cell.get().is_some()
    }
}

static GLOBAL_CLIENT: ClientSlot = ClientSlot::new();

/// Configure the process-wide client from a configuration
///
/// Can only succeed once per process.
pub fn configure_global(config: &ClientConfig) -> Result<Client> {
    let client = Client::new(config)?;
    configure_global_client(client)
}

/// Install an existing client as the process-wide client
pub fn configure_global_client(client: Client) -> Result<Client> {
    let stored = GLOBAL_CLIENT.configure(client)?;
    info!("Configured process-wide Baserow client for {}", stored.base_url());
    Ok(stored.clone())
}

/// The process-wide client, if configured
pub fn global() -> Option<Client> {
    GLOBAL_CLIENT.get().cloned()
}

/// The client of the current task scope, falling back to the process-wide one
///
/// `table` names the table asking, for the error message.
pub fn current(table: &str) -> Result<Client> {
    SCOPED_CLIENT
        .try_with(Client::clone)
        .ok()
        .or_else(global)
        .ok_or_else(|| Error::no_client(table))
}

impl Client {
    /// Run a future with this client as the task's default client
    pub async fn scope<F: Future>(&self, fut: F) -> F::Output {
        SCOPED_CLIENT.scope(self.clone(), fut).await
    }
}
