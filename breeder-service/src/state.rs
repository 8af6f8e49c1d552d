//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    links::LinkBuilder,
    repository::BreederStore,
    tasks::{DelayedCreationWorker, TaskTracker},
};

/// Application state shared across handlers
///
/// Every field is cheap to clone; clones share the same store, task
/// tracker and configuration.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: BreederStore,
    worker: DelayedCreationWorker,
    links: LinkBuilder,
}

impl AppState {
    /// Assemble state from a configuration and an already-open store.
    ///
    /// No background tasks are started; use [`AppStateBuilder`] for that.
    pub fn new(config: Config, store: BreederStore) -> Self {
        let worker = DelayedCreationWorker::new(
            TaskTracker::new(),
            store.clone(),
            config.tasks.completion_delay(),
        );
        let links = LinkBuilder::new(config.links.base_url.clone());

        Self {
            config: Arc::new(config),
            store,
            worker,
            links,
        }
    }

    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &BreederStore {
        &self.store
    }

    pub fn worker(&self) -> &DelayedCreationWorker {
        &self.worker
    }

    pub fn tasks(&self) -> &TaskTracker {
        self.worker.tracker()
    }

    pub fn links(&self) -> &LinkBuilder {
        &self.links
    }

    /// Drain delayed creations, then release the store.
    ///
    /// Call after the HTTP server has stopped accepting requests.
    pub async fn shutdown(&self) {
        self.worker
            .shutdown(self.config.tasks.shutdown_timeout())
            .await;
        self.store.close().await;
        tracing::info!(backend = self.store.backend(), "Record store closed");
    }
}

/// Builder for [`AppState`]
///
/// Without an explicit store, `build` connects to PostgreSQL when a
/// `[database]` section is configured and falls back to the in-memory store
/// otherwise.
#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    store: Option<BreederStore>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this store instead of opening one from the configuration
    pub fn store(mut self, store: impl Into<BreederStore>) -> Self {
        self.store = Some(store.into());
        self
    }

    /// Open the store and start the task status sweeper
    pub async fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();

        let store = match self.store {
            Some(store) => store,
            None => open_store(&config).await?,
        };
        tracing::info!(backend = store.backend(), "Record store ready");

        let state = AppState::new(config, store);
        state.worker.spawn_sweeper(
            state.config.tasks.retention(),
            state.config.tasks.sweep_interval(),
        );

        Ok(state)
    }
}

#[cfg(feature = "database")]
async fn open_store(config: &Config) -> Result<BreederStore> {
    use crate::repository::PgBreederRepository;

    match &config.database {
        Some(db_config) => {
            let pool = crate::database::create_pool(db_config).await?;
            crate::database::ensure_schema(&pool).await?;
            Ok(PgBreederRepository::new(pool).into())
        }
        None => {
            tracing::warn!("No [database] configured; breeders are kept in memory and lost on restart");
            Ok(BreederStore::in_memory())
        }
    }
}

#[cfg(not(feature = "database"))]
async fn open_store(config: &Config) -> Result<BreederStore> {
    if config.database.is_some() {
        tracing::warn!("Built without the `database` feature; ignoring [database] configuration");
    }
    tracing::warn!("Breeders are kept in memory and lost on restart");
    Ok(BreederStore::in_memory())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_builder_defaults_to_memory_store() {
        let state = AppState::builder().build().await.unwrap();
        assert_eq!(state.store().backend(), "memory");
        assert_eq!(state.links().base_url(), "http://localhost:8080/api/v1");
        assert_eq!(state.worker().delay(), Duration::from_secs(30));
        // The sweeper is running
        assert_eq!(state.worker().in_flight(), 1);

        state.shutdown().await;
        assert_eq!(state.worker().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_task_tracker() {
        let state = AppState::new(Config::default(), BreederStore::in_memory());
        let clone = state.clone();

        let id = crate::ids::BreederId::new();
        state.tasks().register(&id);
        assert!(clone.tasks().get(&id).is_some());
    }
}
