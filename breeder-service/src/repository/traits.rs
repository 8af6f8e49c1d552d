//! Record store trait
//!
//! Uses RPITIT (Return Position Impl Trait In Traits), available since Rust
//! 1.75, so implementations can be written with plain `async fn`.
//!
//! ```rust,ignore
//! impl BreederRepository for PgBreederRepository {
//!     async fn find_by_id(&self, id: &BreederId) -> RepositoryResult<Option<Breeder>> {
//!         sqlx::query_as::<_, BreederRow>("SELECT ... FROM breeders WHERE id = $1")
//!             .bind(id.as_str())
//!             .fetch_optional(&self.pool)
//!             .await
//!             // ...
//!     }
//!     // ... other methods
//! }
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::{BreederFilter, Pagination};
use crate::ids::BreederId;
use crate::models::{Breeder, BreederUpdate, NewBreeder};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Persistence of breeder records
///
/// Single-record operations are all-or-nothing. Listings are ordered by
/// insertion.
pub trait BreederRepository: Send + Sync {
    /// Persist a new record under `id`.
    ///
    /// Fails with `AlreadyExists` when the id is taken.
    fn create(
        &self,
        id: &BreederId,
        data: NewBreeder,
    ) -> impl Future<Output = RepositoryResult<Breeder>> + Send;

    /// Fetch one record; absence is `Ok(None)`, not an error.
    fn find_by_id(
        &self,
        id: &BreederId,
    ) -> impl Future<Output = RepositoryResult<Option<Breeder>>> + Send;

    /// One page of records matching `filter`.
    fn find_all(
        &self,
        filter: &BreederFilter,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<Vec<Breeder>>> + Send;

    /// Merge the supplied fields into an existing record and return the result.
    ///
    /// Fails with `NotFound` when the id does not exist.
    fn update(
        &self,
        id: &BreederId,
        changes: BreederUpdate,
    ) -> impl Future<Output = RepositoryResult<Breeder>> + Send;

    /// Remove one record; `NotFound` when absent.
    fn delete(&self, id: &BreederId) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Remove every record, returning how many were removed.
    fn delete_all(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Cheap connectivity check used by readiness probes.
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;
}
