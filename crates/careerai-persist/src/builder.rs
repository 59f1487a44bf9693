use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PersistError, Result};
use crate::memory::InMemoryPersistenceClient;
use crate::trait_client::PersistenceClient;

/// Which record store backs the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Mongodb,
}

impl FromStr for StoreBackend {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "mongodb" | "mongo" => Ok(StoreBackend::Mongodb),
            other => Err(PersistError::InvalidInput(format!(
                "unknown store backend: {other}"
            ))),
        }
    }
}

pub struct PersistClientBuilder {
    backend: StoreBackend,
    mongodb_uri: Option<String>,
    database: Option<String>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            backend: StoreBackend::Memory,
            mongodb_uri: None,
            database: None,
        }
    }

    pub fn backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub async fn build(self) -> Result<Arc<dyn PersistenceClient>> {
        match self.backend {
            StoreBackend::Memory => {
                info!("Using in-memory record store");
                Ok(Arc::new(InMemoryPersistenceClient::new()))
            }
            StoreBackend::Mongodb => self.build_mongo().await,
        }
    }

    #[cfg(feature = "mongodb")]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        let mongodb_uri = self
            .mongodb_uri
            .ok_or_else(|| PersistError::Internal("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .ok_or_else(|| PersistError::Internal("database is required".to_string()))?;

        let client =
            crate::dbs::mongo::MongoPersistenceClient::connect(&mongodb_uri, &database).await?;
        info!(database = %database, "Connected to MongoDB");
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        Err(PersistError::Internal(
            "built without the `mongodb` feature".to_string(),
        ))
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
