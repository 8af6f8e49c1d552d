//! Breeder record store
//!
//! - [`BreederRepository`]: async CRUD contract for breeder records
//! - [`PgBreederRepository`]: PostgreSQL implementation (`database` feature)
//! - [`InMemoryBreederRepository`]: in-process implementation
//! - [`BreederStore`]: the store the service runs with, dispatching to one of the above
//!
//! # Example
//!
//! ```rust
//! use breeder_service::ids::BreederId;
//! use breeder_service::models::{NewBreeder, PriceLevel};
//! use breeder_service::repository::{BreederRepository, BreederStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = BreederStore::in_memory();
//! let id = BreederId::new();
//! let data = NewBreeder {
//!     name: "Acme".into(),
//!     breeder_city: "Oslo".into(),
//!     breeder_country: "Norway".into(),
//!     price_level: PriceLevel::try_from(2).unwrap(),
//!     breeder_address: "Main street 1".into(),
//! };
//! store.create(&id, data).await.unwrap();
//! assert!(store.find_by_id(&id).await.unwrap().is_some());
//! # }
//! ```

mod error;
mod memory;
mod pagination;
#[cfg(feature = "database")]
mod postgres;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryBreederRepository;
pub use pagination::{BreederFilter, Pagination};
#[cfg(feature = "database")]
pub use postgres::PgBreederRepository;
pub use traits::{BreederRepository, RepositoryResult};

use crate::ids::BreederId;
use crate::models::{Breeder, BreederUpdate, NewBreeder};

/// The record store backing the service
#[derive(Debug, Clone)]
pub enum BreederStore {
    #[cfg(feature = "database")]
    Postgres(PgBreederRepository),
    Memory(InMemoryBreederRepository),
}

impl BreederStore {
    /// A fresh, empty in-memory store
    pub fn in_memory() -> Self {
        Self::Memory(InMemoryBreederRepository::new())
    }

    /// Backend name for logs and health output
    pub fn backend(&self) -> &'static str {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Release backend resources; the PostgreSQL pool is closed gracefully.
    pub async fn close(&self) {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(repo) => repo.pool().close().await,
            Self::Memory(_) => {}
        }
    }
}

impl From<InMemoryBreederRepository> for BreederStore {
    fn from(repo: InMemoryBreederRepository) -> Self {
        Self::Memory(repo)
    }
}

#[cfg(feature = "database")]
impl From<PgBreederRepository> for BreederStore {
    fn from(repo: PgBreederRepository) -> Self {
        Self::Postgres(repo)
    }
}

impl BreederRepository for BreederStore {
    async fn create(&self, id: &BreederId, data: NewBreeder) -> RepositoryResult<Breeder> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(repo) => repo.create(id, data).await,
            Self::Memory(repo) => repo.create(id, data).await,
        }
    }

    async fn find_by_id(&self, id: &BreederId) -> RepositoryResult<Option<Breeder>> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(repo) => repo.find_by_id(id).await,
            Self::Memory(repo) => repo.find_by_id(id).await,
        }
    }

    async fn find_all(
        &self,
        filter: &BreederFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<Breeder>> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(repo) => repo.find_all(filter, pagination).await,
            Self::Memory(repo) => repo.find_all(filter, pagination).await,
        }
    }

    async fn update(&self, id: &BreederId, changes: BreederUpdate) -> RepositoryResult<Breeder> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(repo) => repo.update(id, changes).await,
            Self::Memory(repo) => repo.update(id, changes).await,
        }
    }

    async fn delete(&self, id: &BreederId) -> RepositoryResult<()> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(repo) => repo.delete(id).await,
            Self::Memory(repo) => repo.delete(id).await,
        }
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(repo) => repo.delete_all().await,
            Self::Memory(repo) => repo.delete_all().await,
        }
    }

    async fn ping(&self) -> RepositoryResult<()> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(repo) => repo.ping().await,
            Self::Memory(repo) => repo.ping().await,
        }
    }
}
