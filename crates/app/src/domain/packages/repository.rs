//! Packages Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    packages::{
        data::{NewPackage, PackageUpdate, PackageVisibility},
        records::{PackageRecord, PackageUuid},
    },
    providers::records::ProviderUuid,
};

const LIST_PACKAGES_SQL: &str = include_str!("sql/list_packages.sql");
const GET_PACKAGE_SQL: &str = include_str!("sql/get_package.sql");
const CREATE_PACKAGE_SQL: &str = include_str!("sql/create_package.sql");
const UPDATE_PACKAGE_SQL: &str = include_str!("sql/update_package.sql");
const DELETE_PACKAGE_SQL: &str = include_str!("sql/delete_package.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPackagesRepository;

impl PgPackagesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_packages(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        visibility: PackageVisibility,
    ) -> Result<Vec<PackageRecord>, sqlx::Error> {
        query_as::<Postgres, PackageRecord>(LIST_PACKAGES_SQL)
            .bind(visibility == PackageVisibility::Active)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_package(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        package: PackageUuid,
    ) -> Result<PackageRecord, sqlx::Error> {
        query_as::<Postgres, PackageRecord>(GET_PACKAGE_SQL)
            .bind(package.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Like [`Self::get_package`], but a missing package is `None` rather than an error.
    pub(crate) async fn find_package(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        package: PackageUuid,
    ) -> Result<Option<PackageRecord>, sqlx::Error> {
        query_as::<Postgres, PackageRecord>(GET_PACKAGE_SQL)
            .bind(package.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_package(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        package: NewPackage,
    ) -> Result<PackageRecord, sqlx::Error> {
        query_as::<Postgres, PackageRecord>(CREATE_PACKAGE_SQL)
            .bind(package.uuid.into_uuid())
            .bind(package.provider_uuid.into_uuid())
            .bind(package.name)
            .bind(package.description)
            .bind(speed_to_i32("download_mbps", package.download_mbps)?)
            .bind(speed_to_i32("upload_mbps", package.upload_mbps)?)
            .bind(package.current_price)
            .bind(package.active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_package(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        package: PackageUuid,
        update: PackageUpdate,
    ) -> Result<PackageRecord, sqlx::Error> {
        query_as::<Postgres, PackageRecord>(UPDATE_PACKAGE_SQL)
            .bind(package.into_uuid())
            .bind(update.provider_uuid.into_uuid())
            .bind(update.name)
            .bind(update.description)
            .bind(speed_to_i32("download_mbps", update.download_mbps)?)
            .bind(speed_to_i32("upload_mbps", update.upload_mbps)?)
            .bind(update.current_price)
            .bind(update.active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_package(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        package: PackageUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PACKAGE_SQL)
            .bind(package.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn speed_to_i32(column: &str, speed: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(speed).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn speed_from_row(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    let speed: i32 = row.try_get(column)?;

    u32::try_from(speed).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for PackageRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PackageUuid::from_uuid(row.try_get("uuid")?),
            provider_uuid: ProviderUuid::from_uuid(row.try_get::<Uuid, _>("provider_uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            download_mbps: speed_from_row(row, "download_mbps")?,
            upload_mbps: speed_from_row(row, "upload_mbps")?,
            current_price: row.try_get::<Decimal, _>("current_price")?,
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
