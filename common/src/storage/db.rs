use crate::error::AppError;

use super::types::{system_settings::SystemSettings, StoredObject};
use axum_session::{SessionConfig, SessionError, SessionStore};
use axum_session_surreal::SessionSurrealPool;
use std::ops::Deref;
use surrealdb::{
    engine::any::{connect, Any},
    opt::auth::Root,
    Error, Surreal,
};
use tracing::{debug, info};

/// Idempotent schema definition, safe to run on every start-up.
const SCHEMA: &str = include_str!("schema.surql");

/// Engines that run inside the process and have no root user to sign in as.
const EMBEDDED_ENGINES: [&str; 2] = ["mem://", "surrealkv://"];

#[derive(Clone)]
pub struct SurrealDbClient {
    pub client: Surreal<Any>,
}

impl SurrealDbClient {
    /// # Initialize a new database client
    ///
    /// # Arguments
    /// * `address` - Engine address, e.g. `surrealkv://data/db` or `ws://127.0.0.1:8000`
    /// * `username`, `password` - Root credentials, ignored for embedded engines
    /// * `namespace`, `database` - Target namespace and database
    ///
    /// # Returns
    /// * `SurrealDbClient` initialized
    pub async fn new(
        address: &str,
        username: &str,
        password: &str,
        namespace: &str,
        database: &str,
    ) -> Result<Self, Error> {
        let db = connect(address).await?;

        if EMBEDDED_ENGINES
            .iter()
            .any(|prefix| address.starts_with(prefix))
        {
            debug!(address, "Embedded engine, skipping root sign in");
        } else {
            db.signin(Root { username, password }).await?;
        }

        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }

    pub async fn create_session_store(
        &self,
    ) -> Result<SessionStore<SessionSurrealPool<Any>>, SessionError> {
        SessionStore::new(
            Some(self.client.clone().into()),
            SessionConfig::default()
                .with_table_name("sessions")
                .with_secure(true),
        )
        .await
    }

    /// Creates tables and indexes if they are absent and seeds the default
    /// system settings. Running it repeatedly leaves the schema unchanged.
    pub async fn apply_migrations(&self) -> Result<(), AppError> {
        self.client.query(SCHEMA).await?.check()?;
        SystemSettings::ensure_initialized(self).await?;
        info!("Database schema is up to date");

        Ok(())
    }

    /// Operation to store a object in SurrealDB, requires the struct to implement StoredObject
    ///
    /// # Arguments
    /// * `item` - The item to be stored
    ///
    /// # Returns
    /// * `Result` - Item or Error
    pub async fn store_item<T>(&self, item: T) -> Result<Option<T>, Error>
    where
        T: StoredObject + Send + Sync + 'static,
    {
        self.client
            .create((T::table_name(), item.get_id()))
            .content(item)
            .await
    }

    /// Operation to retrieve a single object by its ID, requires the struct to implement StoredObject
    pub async fn get_item<T>(&self, id: &str) -> Result<Option<T>, Error>
    where
        T: for<'de> StoredObject,
    {
        self.client.select((T::table_name(), id)).await
    }
}

impl Deref for SurrealDbClient {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl SurrealDbClient {
    /// Create an in-memory SurrealDB client for testing.
    pub async fn memory(namespace: &str, database: &str) -> Result<Self, Error> {
        let db = connect("mem://").await?;

        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }
}
