//! Test context for service-level integration tests.

use rust_decimal::Decimal;
use zeroize::Zeroizing;

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        packages::{
            PackagesService, PackagesServiceError, PgPackagesService,
            data::{NewPackage, PackageUpdate},
            records::PackageUuid,
        },
        payments::{
            PgPaymentsService,
            ozow::{OZOW_POST_URL, OzowConfig},
        },
        promotions::{
            PgPromotionsService, PromotionsService, PromotionsServiceError,
            data::{NewPromotion, PromotionDetails},
            records::{PromotionRecord, PromotionUuid},
        },
        providers::{
            PgProvidersService, ProvidersService, ProvidersServiceError, data::NewProvider,
            records::ProviderUuid,
        },
    },
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub ozow: OzowConfig,
    pub providers: PgProvidersService,
    pub packages: PgPackagesService,
    pub promotions: PgPromotionsService,
    pub payments: PgPaymentsService,
    pub auth: PgAuthService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());
        let ozow = test_ozow_config();

        Self {
            providers: PgProvidersService::new(db.clone()),
            packages: PgPackagesService::new(db.clone()),
            promotions: PgPromotionsService::new(db.clone()),
            payments: PgPaymentsService::new(db.clone(), ozow.clone()),
            auth: PgAuthService::new(db),
            ozow,
            db: test_db,
        }
    }

    pub(crate) async fn create_provider(
        &self,
        name: &str,
    ) -> Result<ProviderUuid, ProvidersServiceError> {
        let provider = self
            .providers
            .create_provider(NewProvider {
                uuid: ProviderUuid::new(),
                name: name.to_string(),
            })
            .await?;

        Ok(provider.uuid)
    }

    /// Create an active 100/100 package priced at `price`.
    pub(crate) async fn create_package(
        &self,
        provider: ProviderUuid,
        price: Decimal,
    ) -> Result<PackageUuid, PackagesServiceError> {
        let package = self
            .packages
            .create_package(NewPackage {
                uuid: PackageUuid::new(),
                provider_uuid: provider,
                name: format!("Fibre 100 @ {price}"),
                description: None,
                download_mbps: 100,
                upload_mbps: 100,
                current_price: price,
                active: true,
            })
            .await?;

        Ok(package.uuid)
    }

    pub(crate) async fn deactivate_package(
        &self,
        package: PackageUuid,
    ) -> Result<(), PackagesServiceError> {
        let current = self.packages.get_package(package).await?;

        self.packages
            .update_package(
                package,
                PackageUpdate {
                    provider_uuid: current.provider_uuid,
                    name: current.name,
                    description: current.description,
                    download_mbps: current.download_mbps,
                    upload_mbps: current.upload_mbps,
                    current_price: current.current_price,
                    active: false,
                },
            )
            .await?;

        Ok(())
    }

    pub(crate) async fn create_promotion(
        &self,
        details: PromotionDetails,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        self.promotions
            .create_promotion(NewPromotion {
                uuid: PromotionUuid::new(),
                details,
            })
            .await
    }
}

fn test_ozow_config() -> OzowConfig {
    OzowConfig {
        site_code: "TSTSTE0001".to_string(),
        country_code: "ZA".to_string(),
        currency_code: "ZAR".to_string(),
        private_key: Zeroizing::new("test-private-key".to_string()),
        is_test: true,
        post_url: OZOW_POST_URL.to_string(),
        cancel_url: "https://beacon.test/payments/cancel".to_string(),
        error_url: "https://beacon.test/payments/error".to_string(),
        success_url: "https://beacon.test/payments/success".to_string(),
        notify_url: "https://beacon.test/payments/notify".to_string(),
    }
}
