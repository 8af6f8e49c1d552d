//! PostgreSQL record store
//!
//! Partial updates run as one `UPDATE ... COALESCE ... RETURNING` statement,
//! so two concurrent updates touching different fields both survive.

use sqlx::{FromRow, PgPool};

use super::error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use super::pagination::{BreederFilter, Pagination};
use super::traits::{BreederRepository, RepositoryResult};
use crate::error::{DatabaseError, DatabaseOperation};
use crate::ids::BreederId;
use crate::models::{Breeder, BreederUpdate, NewBreeder, PriceLevel};

const ENTITY: &str = "Breeder";

const COLUMNS: &str = "id, name, breeder_city, breeder_country, price_level, breeder_address";

#[derive(Debug, FromRow)]
struct BreederRow {
    id: String,
    name: String,
    breeder_city: String,
    breeder_country: String,
    price_level: i16,
    breeder_address: String,
}

impl TryFrom<BreederRow> for Breeder {
    type Error = DatabaseError;

    fn try_from(row: BreederRow) -> Result<Self, Self::Error> {
        let price_level = PriceLevel::try_from(i64::from(row.price_level))
            .map_err(|e| DatabaseError::type_conversion(e.to_string()).add_context(&row.id))?;
        Ok(Self {
            id: BreederId::from(row.id),
            name: row.name,
            breeder_city: row.breeder_city,
            breeder_country: row.breeder_country,
            price_level,
            breeder_address: row.breeder_address,
        })
    }
}

fn into_breeder(row: BreederRow, operation: RepositoryOperation) -> RepositoryResult<Breeder> {
    Breeder::try_from(row).map_err(|e| RepositoryError::from(e).with_operation(operation))
}

fn db_error(err: sqlx::Error, db_op: DatabaseOperation, op: RepositoryOperation) -> RepositoryError {
    RepositoryError::from(DatabaseError::from(err).during(db_op)).with_operation(op)
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Breeder records in the `breeders` table
#[derive(Debug, Clone)]
pub struct PgBreederRepository {
    pool: PgPool,
}

impl PgBreederRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl BreederRepository for PgBreederRepository {
    async fn create(&self, id: &BreederId, data: NewBreeder) -> RepositoryResult<Breeder> {
        let sql = format!(
            "INSERT INTO breeders ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BreederRow>(&sql)
            .bind(id.as_str())
            .bind(&data.name)
            .bind(&data.breeder_city)
            .bind(&data.breeder_country)
            .bind(i16::from(data.price_level))
            .bind(&data.breeder_address)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let err = db_error(e, DatabaseOperation::Insert, RepositoryOperation::Create);
                if err.kind == RepositoryErrorKind::ConstraintViolation {
                    RepositoryError::already_exists(ENTITY, id.as_str())
                } else {
                    err
                }
            })?;
        into_breeder(row, RepositoryOperation::Create)
    }

    async fn find_by_id(&self, id: &BreederId) -> RepositoryResult<Option<Breeder>> {
        let sql = format!("SELECT {COLUMNS} FROM breeders WHERE id = $1");
        let row = sqlx::query_as::<_, BreederRow>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DatabaseOperation::Query, RepositoryOperation::FindById))?;
        row.map(|r| into_breeder(r, RepositoryOperation::FindById))
            .transpose()
    }

    async fn find_all(
        &self,
        filter: &BreederFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<Breeder>> {
        // A NULL limit means no limit in PostgreSQL.
        let sql = format!(
            "SELECT {COLUMNS} FROM breeders \
             WHERE ($1::TEXT IS NULL OR breeder_city = $1) \
             ORDER BY created_at, id \
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, BreederRow>(&sql)
            .bind(filter.breeder_city.as_deref())
            .bind(pagination.limit.map(to_i64))
            .bind(to_i64(pagination.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(e, DatabaseOperation::Query, RepositoryOperation::FindAll))?;
        rows.into_iter()
            .map(|r| into_breeder(r, RepositoryOperation::FindAll))
            .collect()
    }

    async fn update(&self, id: &BreederId, changes: BreederUpdate) -> RepositoryResult<Breeder> {
        let sql = format!(
            "UPDATE breeders SET \
                 name = COALESCE($2, name), \
                 breeder_city = COALESCE($3, breeder_city), \
                 breeder_country = COALESCE($4, breeder_country), \
                 price_level = COALESCE($5, price_level), \
                 breeder_address = COALESCE($6, breeder_address) \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BreederRow>(&sql)
            .bind(id.as_str())
            .bind(changes.name)
            .bind(changes.breeder_city)
            .bind(changes.breeder_country)
            .bind(changes.price_level.map(i16::from))
            .bind(changes.breeder_address)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, DatabaseOperation::Update, RepositoryOperation::Update))?
            .ok_or_else(|| {
                RepositoryError::not_found(ENTITY, id.as_str())
                    .with_operation(RepositoryOperation::Update)
            })?;
        into_breeder(row, RepositoryOperation::Update)
    }

    async fn delete(&self, id: &BreederId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM breeders WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, DatabaseOperation::Delete, RepositoryOperation::Delete))?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(ENTITY, id.as_str())
                .with_operation(RepositoryOperation::Delete));
        }
        Ok(())
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM breeders")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, DatabaseOperation::Delete, RepositoryOperation::DeleteAll))?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, DatabaseOperation::Query, RepositoryOperation::Ping))?;
        Ok(())
    }
}

/// Run with `BREEDER_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::{create_pool, ensure_schema};

    async fn repository() -> PgBreederRepository {
        let url = std::env::var("BREEDER_TEST_DATABASE_URL")
            .expect("BREEDER_TEST_DATABASE_URL must be set for PostgreSQL tests");
        let config = DatabaseConfig {
            url,
            max_retries: 0,
            ..Default::default()
        };
        let pool = create_pool(&config).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        PgBreederRepository::new(pool)
    }

    fn payload(city: &str) -> NewBreeder {
        NewBreeder {
            name: "Acme".into(),
            breeder_city: city.into(),
            breeder_country: "Norway".into(),
            price_level: PriceLevel::try_from(4).unwrap(),
            breeder_address: "Main street 1".into(),
        }
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_crud_roundtrip() {
        let repo = repository().await;
        let id = BreederId::new();

        let created = repo.create(&id, payload("Oslo")).await.unwrap();
        assert_eq!(repo.find_by_id(&id).await.unwrap(), Some(created));

        let dup = repo.create(&id, payload("Oslo")).await.unwrap_err();
        assert_eq!(dup.kind, RepositoryErrorKind::AlreadyExists);

        let updated = repo
            .update(
                &id,
                BreederUpdate {
                    name: Some("X".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "X");
        assert_eq!(updated.breeder_city, "Oslo");

        repo.delete(&id).await.unwrap();
        let err = repo.delete(&id).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_city_filter_and_paging() {
        let repo = repository().await;
        let city = format!("city-{}", BreederId::new());
        for _ in 0..3 {
            repo.create(&BreederId::new(), payload(&city)).await.unwrap();
        }

        let page = repo
            .find_all(&BreederFilter::by_city(city.clone()), Pagination::new(1, Some(5)))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|b| b.breeder_city == city));
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_ping() {
        assert!(repository().await.ping().await.is_ok());
    }
}
