//! Test helpers.

use std::{str::FromStr, sync::Arc, time::Duration};

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use beacon_app::{
    auth::{AdminUuid, MockAuthService},
    context::AppContext,
    domain::{
        packages::{
            MockPackagesService,
            records::{PackageRecord, PackageUuid},
        },
        payments::MockPaymentsService,
        promotions::{
            MockPromotionsService,
            data::discounts::Discount,
            records::{PromotionRecord, PromotionUuid},
        },
        providers::{
            MockProvidersService,
            records::{ProviderRecord, ProviderUuid},
        },
    },
};

use crate::{
    extensions::*,
    rate_limit::{InMemoryRateLimitStore, RateLimit},
    state::State,
};

pub(crate) const TEST_ADMIN_UUID: AdminUuid = AdminUuid::from_uuid(Uuid::nil());

/// Builds handler state from mocks. Unconfigured mocks fail on any call.
pub(crate) struct StateBuilder {
    providers: MockProvidersService,
    packages: MockPackagesService,
    promotions: MockPromotionsService,
    payments: MockPaymentsService,
    auth: MockAuthService,
    rate_limit: RateLimit,
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self {
            providers: MockProvidersService::new(),
            packages: MockPackagesService::new(),
            promotions: MockPromotionsService::new(),
            payments: MockPaymentsService::new(),
            auth: MockAuthService::new(),
            rate_limit: RateLimit {
                max_requests: 1_000,
                window: Duration::from_secs(60),
            },
        }
    }
}

impl StateBuilder {
    pub(crate) fn providers(mut self, providers: MockProvidersService) -> Self {
        self.providers = providers;
        self
    }

    pub(crate) fn packages(mut self, packages: MockPackagesService) -> Self {
        self.packages = packages;
        self
    }

    pub(crate) fn promotions(mut self, promotions: MockPromotionsService) -> Self {
        self.promotions = promotions;
        self
    }

    pub(crate) fn payments(mut self, payments: MockPaymentsService) -> Self {
        self.payments = payments;
        self
    }

    pub(crate) fn auth(mut self, auth: MockAuthService) -> Self {
        self.auth = auth;
        self
    }

    pub(crate) fn rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub(crate) fn build(self) -> Arc<State> {
        let app = AppContext {
            providers: Arc::new(self.providers),
            packages: Arc::new(self.packages),
            promotions: Arc::new(self.promotions),
            payments: Arc::new(self.payments),
            auth: Arc::new(self.auth),
        };

        Arc::new(State::new(
            app,
            Arc::new(InMemoryRateLimitStore::new(self.rate_limit)),
        ))
    }

    /// Serve `route` without authentication.
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.build())).push(route))
    }

    /// Serve `route` as if the auth middleware had accepted [`TEST_ADMIN_UUID`].
    pub(crate) fn admin_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.build()))
                .hoop(inject_admin)
                .push(route),
        )
    }
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_admin_uuid(TEST_ADMIN_UUID);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_default()
}

pub(crate) fn make_provider(uuid: ProviderUuid) -> ProviderRecord {
    ProviderRecord {
        uuid,
        name: "Openserve".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_package(uuid: PackageUuid) -> PackageRecord {
    PackageRecord {
        uuid,
        provider_uuid: ProviderUuid::from_uuid(Uuid::nil()),
        name: "Fibre 50/25".to_string(),
        description: Some("Uncapped fibre".to_string()),
        download_mbps: 50,
        upload_mbps: 25,
        current_price: decimal("599.00"),
        active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_promotion(uuid: PromotionUuid) -> PromotionRecord {
    PromotionRecord {
        uuid,
        code: "WELCOME10".to_string(),
        name: "Welcome".to_string(),
        description: None,
        discount: Discount::Percentage {
            percentage: decimal("10"),
        },
        starts_at: Timestamp::UNIX_EPOCH,
        ends_at: Timestamp::MAX,
        usage_limit: 0,
        times_used: 0,
        package_uuid: None,
        eligible_users: Vec::new(),
        active: true,
        stackable: false,
        auto_apply: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}
