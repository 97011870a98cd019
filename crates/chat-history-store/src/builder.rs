use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Result, StoreError};
use crate::memory::InMemoryChatStore;
use crate::trait_client::ChatStore;

/// Which backend holds the chat records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Dynamodb,
    Mongodb,
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreBackend::Dynamodb => "dynamodb",
            StoreBackend::Mongodb => "mongodb",
            StoreBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

pub struct ChatStoreBuilder {
    backend: StoreBackend,
    table_name: Option<String>,
    region: Option<String>,
    endpoint_url: Option<String>,
    mongodb_uri: Option<String>,
    database: Option<String>,
    collection: String,
    seed_file: Option<PathBuf>,
}

impl ChatStoreBuilder {
    pub fn new() -> Self {
        Self {
            backend: StoreBackend::default(),
            table_name: None,
            region: None,
            endpoint_url: None,
            mongodb_uri: None,
            database: None,
            collection: "chats".to_string(),
            seed_file: None,
        }
    }

    pub fn backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    pub fn endpoint_url(mut self, endpoint_url: Option<String>) -> Self {
        self.endpoint_url = endpoint_url;
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

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn seed_file(mut self, path: Option<PathBuf>) -> Self {
        self.seed_file = path;
        self
    }

    pub async fn build(self) -> Result<Arc<dyn ChatStore>> {
        tracing::info!("Building {} chat store", self.backend);

        match self.backend {
            StoreBackend::Memory => {
                let store = match self.seed_file {
                    Some(path) => InMemoryChatStore::from_seed_file(path).await?,
                    None => InMemoryChatStore::new(),
                };
                Ok(Arc::new(store))
            }
            StoreBackend::Dynamodb => self.build_dynamodb().await,
            StoreBackend::Mongodb => self.build_mongodb().await,
        }
    }

    #[cfg(feature = "dynamodb")]
    async fn build_dynamodb(self) -> Result<Arc<dyn ChatStore>> {
        let table_name = self
            .table_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| StoreError::Config("table_name is required for dynamodb".to_string()))?;

        let store =
            crate::dbs::dynamo::DynamoChatStore::connect(table_name, self.region, self.endpoint_url)
                .await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "dynamodb"))]
    async fn build_dynamodb(self) -> Result<Arc<dyn ChatStore>> {
        Err(StoreError::Config(
            "dynamodb backend requires the `dynamodb` feature".to_string(),
        ))
    }

    #[cfg(feature = "mongodb")]
    async fn build_mongodb(self) -> Result<Arc<dyn ChatStore>> {
        let mongodb_uri = self
            .mongodb_uri
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| StoreError::Config("mongodb_uri is required for mongodb".to_string()))?;
        let database = self
            .database
            .ok_or_else(|| StoreError::Config("database is required for mongodb".to_string()))?;

        let store =
            crate::dbs::mongo::MongoChatStore::connect(&mongodb_uri, &database, &self.collection)
                .await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn build_mongodb(self) -> Result<Arc<dyn ChatStore>> {
        Err(StoreError::Config(
            "mongodb backend requires the `mongodb` feature".to_string(),
        ))
    }
}

impl Default for ChatStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
