use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, IndexOptions, Tls, TlsOptions},
    Client, Collection, IndexModel,
};
use tracing::{debug, info, instrument};

use super::{StoreConfig, StoreError};

pub const TEXT_INDEX_NAME: &str = "docagent_text";
const APP_NAME: &str = "docagent";

/// Pooled handle to the configured MongoDB database.
///
/// Cloning is cheap, all clones share the driver's connection pool.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    config: StoreConfig,
}

impl MongoStore {
    /// Build a client from `config` and verify the server answers a ping.
    #[instrument(level = "debug", skip(config), fields(database = %config.database))]
    pub async fn connect(config: StoreConfig) -> Result<Self, StoreError> {
        let store = Self::lazy(config).await?;
        store.ping().await?;
        info!(database = %store.config.database, "connected to MongoDB");
        Ok(store)
    }

    /// Build a client without contacting the server.
    ///
    /// The driver connects on first use, so failures surface on the first operation.
    pub async fn lazy(config: StoreConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.connection_string)
            .await
            .map_err(|e| StoreError::Config(e.to_string()))?;

        options.app_name = Some(APP_NAME.into());
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.connect_timeout = Some(config.connect_timeout);
        if config.wants_tls() {
            let tls = TlsOptions::builder()
                .allow_invalid_certificates(config.tls_allow_invalid_certificates)
                .build();
            options.tls = Some(Tls::Enabled(tls));
        }

        let client =
            Client::with_options(options).map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn database_name(&self) -> &str {
        &self.config.database
    }

    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.client
            .database(&self.config.database)
            .collection::<Document>(name)
    }

    /// Make sure `collection` carries a wildcard text index.
    ///
    /// A collection holds at most one text index; if a different one already
    /// exists the create call fails and `$text` keeps using the existing index.
    pub async fn ensure_text_index(&self, collection: &Collection<Document>) {
        let model = IndexModel::builder()
            .keys(doc! { "$**": "text" })
            .options(
                IndexOptions::builder()
                    .name(TEXT_INDEX_NAME.to_string())
                    .build(),
            )
            .build();

        if let Err(e) = collection.create_index(model).await {
            debug!(collection = collection.name(), error = %e, "text index not created");
        }
    }
}
