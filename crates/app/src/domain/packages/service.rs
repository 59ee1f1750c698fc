//! Packages service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::packages::{
        data::{NewPackage, PackageUpdate, PackageVisibility},
        errors::PackagesServiceError,
        records::{PackageRecord, PackageUuid},
        repository::PgPackagesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPackagesService {
    db: Db,
    repository: PgPackagesRepository,
}

impl PgPackagesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPackagesRepository::new(),
        }
    }
}

/// Reject speeds the `INTEGER` columns cannot hold before touching the database.
fn check_speeds(download_mbps: u32, upload_mbps: u32) -> Result<(), PackagesServiceError> {
    i32::try_from(download_mbps)?;
    i32::try_from(upload_mbps)?;

    Ok(())
}

#[async_trait]
impl PackagesService for PgPackagesService {
    async fn list_packages(
        &self,
        visibility: PackageVisibility,
    ) -> Result<Vec<PackageRecord>, PackagesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let packages = self.repository.list_packages(&mut tx, visibility).await?;

        tx.commit().await?;

        Ok(packages)
    }

    async fn get_package(&self, package: PackageUuid) -> Result<PackageRecord, PackagesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let package = self.repository.get_package(&mut tx, package).await?;

        tx.commit().await?;

        Ok(package)
    }

    #[tracing::instrument(
        name = "packages.service.create_package",
        skip(self, package),
        fields(package_uuid = %package.uuid, provider_uuid = %package.provider_uuid),
        err
    )]
    async fn create_package(
        &self,
        package: NewPackage,
    ) -> Result<PackageRecord, PackagesServiceError> {
        check_speeds(package.download_mbps, package.upload_mbps)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_package(&mut tx, package).await?;

        tx.commit().await?;

        info!(package_uuid = %created.uuid, price = %created.current_price, "created package");

        Ok(created)
    }

    #[tracing::instrument(
        name = "packages.service.update_package",
        skip(self, update),
        fields(package_uuid = %package),
        err
    )]
    async fn update_package(
        &self,
        package: PackageUuid,
        update: PackageUpdate,
    ) -> Result<PackageRecord, PackagesServiceError> {
        check_speeds(update.download_mbps, update.upload_mbps)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_package(&mut tx, package, update)
            .await?;

        tx.commit().await?;

        info!(package_uuid = %updated.uuid, price = %updated.current_price, "updated package");

        Ok(updated)
    }

    async fn delete_package(&self, package: PackageUuid) -> Result<(), PackagesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_package(&mut tx, package).await?;

        if rows_affected == 0 {
            return Err(PackagesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait PackagesService: Send + Sync {
    /// Retrieves packages, optionally restricted to those on sale.
    async fn list_packages(
        &self,
        visibility: PackageVisibility,
    ) -> Result<Vec<PackageRecord>, PackagesServiceError>;

    /// Retrieve a single package.
    async fn get_package(&self, package: PackageUuid) -> Result<PackageRecord, PackagesServiceError>;

    /// Creates a new package under an existing provider.
    async fn create_package(
        &self,
        package: NewPackage,
    ) -> Result<PackageRecord, PackagesServiceError>;

    /// Replaces the mutable fields of a package.
    async fn update_package(
        &self,
        package: PackageUuid,
        update: PackageUpdate,
    ) -> Result<PackageRecord, PackagesServiceError>;

    /// Soft-deletes a package with the given UUID.
    async fn delete_package(&self, package: PackageUuid) -> Result<(), PackagesServiceError>;
}
