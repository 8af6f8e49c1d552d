//! In-process record store
//!
//! Used when no database is configured and by the test suite. Records are
//! kept in insertion order so listings page the same way the PostgreSQL
//! store does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{BreederFilter, Pagination};
use super::traits::{BreederRepository, RepositoryResult};
use crate::ids::BreederId;
use crate::models::{Breeder, BreederUpdate, NewBreeder};

const ENTITY: &str = "Breeder";

/// Breeder records held in memory, shared between clones
#[derive(Debug, Clone, Default)]
pub struct InMemoryBreederRepository {
    records: Arc<RwLock<Vec<Breeder>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryBreederRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every operation fails with `ConnectionFailed` while set.
    #[cfg(test)]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self, operation: RepositoryOperation) -> RepositoryResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(
                RepositoryError::connection_failed("record store unavailable")
                    .with_operation(operation),
            );
        }
        Ok(())
    }
}

impl BreederRepository for InMemoryBreederRepository {
    async fn create(&self, id: &BreederId, data: NewBreeder) -> RepositoryResult<Breeder> {
        self.check_available(RepositoryOperation::Create)?;
        let mut records = self.records.write().await;
        if records.iter().any(|b| &b.id == id) {
            return Err(RepositoryError::already_exists(ENTITY, id.as_str()));
        }
        let breeder = Breeder::from_new(id.clone(), data);
        records.push(breeder.clone());
        Ok(breeder)
    }

    async fn find_by_id(&self, id: &BreederId) -> RepositoryResult<Option<Breeder>> {
        self.check_available(RepositoryOperation::FindById)?;
        let records = self.records.read().await;
        Ok(records.iter().find(|b| &b.id == id).cloned())
    }

    async fn find_all(
        &self,
        filter: &BreederFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<Breeder>> {
        self.check_available(RepositoryOperation::FindAll)?;
        let records = self.records.read().await;
        let matching = records
            .iter()
            .filter(|b| filter.matches_city(&b.breeder_city));
        Ok(pagination.apply(matching).cloned().collect())
    }

    async fn update(&self, id: &BreederId, changes: BreederUpdate) -> RepositoryResult<Breeder> {
        self.check_available(RepositoryOperation::Update)?;
        let mut records = self.records.write().await;
        let breeder = records.iter_mut().find(|b| &b.id == id).ok_or_else(|| {
            RepositoryError::not_found(ENTITY, id.as_str())
                .with_operation(RepositoryOperation::Update)
        })?;
        breeder.apply(changes);
        Ok(breeder.clone())
    }

    async fn delete(&self, id: &BreederId) -> RepositoryResult<()> {
        self.check_available(RepositoryOperation::Delete)?;
        let mut records = self.records.write().await;
        let position = records.iter().position(|b| &b.id == id).ok_or_else(|| {
            RepositoryError::not_found(ENTITY, id.as_str())
                .with_operation(RepositoryOperation::Delete)
        })?;
        records.remove(position);
        Ok(())
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        self.check_available(RepositoryOperation::DeleteAll)?;
        let mut records = self.records.write().await;
        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.check_available(RepositoryOperation::Ping)
    }
}
