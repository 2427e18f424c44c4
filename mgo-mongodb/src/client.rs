//! MongoDB client wrapper bound to one database.

use std::future::Future;
use std::sync::Arc;

use bson::{Document, doc};
use mongodb::{Client, Database};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::collection::Collection;
use crate::config::MgoConfig;
use crate::entity_collection::EntityCollection;
use crate::error::{MongoError, MongoResult};

/// A connected MongoDB client.
///
/// The driver pools connections internally; clones share the pool. Call
/// [`MongoClient::shutdown`] when done, or use [`with_client`] to scope a
/// client to a block of work.
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    database: Database,
    config: Arc<MgoConfig>,
}

impl MongoClient {
    /// Connect and verify the deployment is reachable.
    ///
    /// The initial ping must complete within the configured timeout.
    pub async fn connect(config: MgoConfig) -> MongoResult<Self> {
        let options = config.to_client_options()?;

        let client = Client::with_options(options)
            .map_err(|e| MongoError::connection(format!("failed to create client: {}", e)))?;

        let admin = client.database("admin");
        let ping = admin.run_command(doc! { "ping": 1 }, None);
        match timeout(config.timeout, ping).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(MongoError::connection(format!("ping failed: {}", e)));
            }
            Err(_) => return Err(MongoError::timeout(config.timeout)),
        }

        let database = client.database(&config.name);

        info!(
            addrs = ?config.addrs,
            database = %config.name,
            "MongoDB client connected"
        );

        Ok(Self {
            client,
            database,
            config: Arc::new(config),
        })
    }

    /// Load configuration from `MGO_*` environment variables and connect.
    pub async fn from_env() -> MongoResult<Self> {
        Self::connect(MgoConfig::from_env()?).await
    }

    /// A typed collection in the configured database.
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        Collection::from_driver(self.database.collection::<Document>(name))
    }

    /// A typed collection of enveloped records in the configured database.
    pub fn entity_collection<T>(&self, name: &str) -> EntityCollection<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        EntityCollection::from_driver(self.database.collection::<Document>(name))
    }

    /// The configured database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// The underlying driver client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &MgoConfig {
        &self.config
    }

    /// Check if the deployment still answers a ping.
    pub async fn is_healthy(&self) -> bool {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .is_ok()
    }

    /// Drop a collection.
    pub async fn drop_collection(&self, name: &str) -> MongoResult<()> {
        debug!(collection = %name, "Dropping collection");
        self.database
            .collection::<Document>(name)
            .drop(None)
            .await?;
        Ok(())
    }

    /// Close the client, waiting at most the configured timeout.
    ///
    /// Other clones of this client stop working once shutdown completes.
    pub async fn shutdown(self) -> MongoResult<()> {
        let after = self.config.timeout;
        timeout(after, self.client.shutdown())
            .await
            .map_err(|_| MongoError::timeout(after))?;
        info!("MongoDB client shut down");
        Ok(())
    }
}

impl std::fmt::Debug for MongoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoClient")
            .field("database", &self.config.name)
            .field("addrs", &self.config.addrs)
            .finish()
    }
}

/// Connect, run `f` with the client, then shut the client down.
///
/// The result of `f` is returned as-is. A failed shutdown is logged and
/// does not replace that result. Connection failures are returned before
/// `f` runs.
///
/// ```rust,ignore
/// let total = with_client(MgoConfig::from_env()?, |client| async move {
///     client.collection::<Item>("items").count([]).await
/// })
/// .await??;
/// ```
pub async fn with_client<F, Fut, R>(config: MgoConfig, f: F) -> MongoResult<R>
where
    F: FnOnce(MongoClient) -> Fut,
    Fut: Future<Output = R>,
{
    let client = MongoClient::connect(config).await?;
    let result = f(client.clone()).await;

    if let Err(e) = client.shutdown().await {
        warn!(error = %e, "MongoDB client shutdown failed");
    }

    Ok(result)
}
