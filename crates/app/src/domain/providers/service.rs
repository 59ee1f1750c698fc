//! Providers service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::providers::{
        errors::ProvidersServiceError,
        data::{NewProvider, ProviderUpdate},
        records::{ProviderRecord, ProviderUuid},
        repository::PgProvidersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProvidersService {
    db: Db,
    repository: PgProvidersRepository,
}

impl PgProvidersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProvidersRepository::new(),
        }
    }
}

#[async_trait]
impl ProvidersService for PgProvidersService {
    async fn list_providers(&self) -> Result<Vec<ProviderRecord>, ProvidersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let providers = self.repository.list_providers(&mut tx).await?;

        tx.commit().await?;

        Ok(providers)
    }

    async fn get_provider(
        &self,
        provider: ProviderUuid,
    ) -> Result<ProviderRecord, ProvidersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let provider = self.repository.get_provider(&mut tx, provider).await?;

        tx.commit().await?;

        Ok(provider)
    }

    #[tracing::instrument(
        name = "providers.service.create_provider",
        skip(self, provider),
        fields(provider_uuid = %provider.uuid),
        err
    )]
    async fn create_provider(
        &self,
        provider: NewProvider,
    ) -> Result<ProviderRecord, ProvidersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_provider(&mut tx, provider).await?;

        tx.commit().await?;

        info!(provider_uuid = %created.uuid, "created provider");

        Ok(created)
    }

    async fn update_provider(
        &self,
        provider: ProviderUuid,
        update: ProviderUpdate,
    ) -> Result<ProviderRecord, ProvidersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_provider(&mut tx, provider, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "providers.service.delete_provider",
        skip(self),
        fields(provider_uuid = %provider),
        err
    )]
    async fn delete_provider(&self, provider: ProviderUuid) -> Result<(), ProvidersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        if self.repository.count_packages(&mut tx, provider).await? > 0 {
            return Err(ProvidersServiceError::InUse);
        }

        let rows_affected = self.repository.delete_provider(&mut tx, provider).await?;

        if rows_affected == 0 {
            return Err(ProvidersServiceError::NotFound);
        }

        tx.commit().await?;

        info!(provider_uuid = %provider, "deleted provider");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProvidersService: Send + Sync {
    /// Retrieves all providers that have not been deleted.
    async fn list_providers(&self) -> Result<Vec<ProviderRecord>, ProvidersServiceError>;

    /// Retrieve a single provider.
    async fn get_provider(
        &self,
        provider: ProviderUuid,
    ) -> Result<ProviderRecord, ProvidersServiceError>;

    async fn create_provider(
        &self,
        provider: NewProvider,
    ) -> Result<ProviderRecord, ProvidersServiceError>;

    async fn update_provider(
        &self,
        provider: ProviderUuid,
        update: ProviderUpdate,
    ) -> Result<ProviderRecord, ProvidersServiceError>;

    /// Soft-deletes a provider. Providers with live packages cannot be deleted.
    async fn delete_provider(&self, provider: ProviderUuid) -> Result<(), ProvidersServiceError>;
}
