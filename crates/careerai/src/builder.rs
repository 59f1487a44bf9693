use std::sync::Arc;

use anyhow::{anyhow, Result};
use careerai_coach::{KeywordResponder, Responder};
use careerai_persist::{PersistClientBuilder, PersistenceClient, StoreBackend};
use careerai_session::SessionManager;
use careerai_types::{CoachConfig, CoachEvent};
use tokio::sync::mpsc;

/// Assembles a [`SessionManager`] for one user
///
/// Defaults to the in-memory store and the keyword responder.
pub struct CoachBuilder {
    user_id: Option<String>,
    persist: PersistClientBuilder,
    client: Option<Arc<dyn PersistenceClient>>,
    responder: Option<Arc<dyn Responder>>,
    config: CoachConfig,
}

impl CoachBuilder {
    pub fn new() -> Self {
        Self {
            user_id: None,
            persist: PersistClientBuilder::new(),
            client: None,
            responder: None,
            config: CoachConfig::default(),
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn mongodb(mut self, uri: impl Into<String>, database: impl Into<String>) -> Self {
        self.persist = self
            .persist
            .backend(StoreBackend::Mongodb)
            .mongodb_uri(uri)
            .database(database);
        self
    }

    /// Use an existing store client instead of building one
    pub fn store(mut self, client: Arc<dyn PersistenceClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn responder(mut self, responder: Arc<dyn Responder>) -> Self {
        self.responder = Some(responder);
        self
    }

    pub fn config(mut self, config: CoachConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(self) -> Result<(SessionManager, mpsc::Receiver<CoachEvent>)> {
        let user_id = self
            .user_id
            .ok_or_else(|| anyhow!("user_id is required"))?;

        let client = match self.client {
            Some(client) => client,
            None => self.persist.build().await?,
        };
        let responder = self
            .responder
            .unwrap_or_else(|| Arc::new(KeywordResponder::new()));

        Ok(SessionManager::new(user_id, client, responder, self.config))
    }
}

impl Default for CoachBuilder {
    fn default() -> Self {
        Self::new()
    }
}
