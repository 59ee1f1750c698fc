//! Providers Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::providers::{
    data::{NewProvider, ProviderUpdate},
    records::{ProviderRecord, ProviderUuid},
};

const LIST_PROVIDERS_SQL: &str = include_str!("sql/list_providers.sql");
const GET_PROVIDER_SQL: &str = include_str!("sql/get_provider.sql");
const CREATE_PROVIDER_SQL: &str = include_str!("sql/create_provider.sql");
const UPDATE_PROVIDER_SQL: &str = include_str!("sql/update_provider.sql");
const COUNT_PROVIDER_PACKAGES_SQL: &str = include_str!("sql/count_provider_packages.sql");
const DELETE_PROVIDER_SQL: &str = include_str!("sql/delete_provider.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProvidersRepository;

impl PgProvidersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_providers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ProviderRecord>, sqlx::Error> {
        query_as::<Postgres, ProviderRecord>(LIST_PROVIDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_provider(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        provider: ProviderUuid,
    ) -> Result<ProviderRecord, sqlx::Error> {
        query_as::<Postgres, ProviderRecord>(GET_PROVIDER_SQL)
            .bind(provider.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_provider(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        provider: NewProvider,
    ) -> Result<ProviderRecord, sqlx::Error> {
        query_as::<Postgres, ProviderRecord>(CREATE_PROVIDER_SQL)
            .bind(provider.uuid.into_uuid())
            .bind(provider.name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_provider(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        provider: ProviderUuid,
        update: ProviderUpdate,
    ) -> Result<ProviderRecord, sqlx::Error> {
        query_as::<Postgres, ProviderRecord>(UPDATE_PROVIDER_SQL)
            .bind(provider.into_uuid())
            .bind(update.name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_packages(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        provider: ProviderUuid,
    ) -> Result<i64, sqlx::Error> {
        query_scalar::<Postgres, i64>(COUNT_PROVIDER_PACKAGES_SQL)
            .bind(provider.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_provider(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        provider: ProviderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PROVIDER_SQL)
            .bind(provider.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProviderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProviderUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
