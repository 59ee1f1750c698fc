//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        packages::{PackagesService, PgPackagesService},
        payments::{PaymentsService, PgPaymentsService, ozow::OzowConfig},
        promotions::{PgPromotionsService, PromotionsService},
        providers::{PgProvidersService, ProvidersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Database settings used to build an [`AppContext`].
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub url: String,
    pub max_connections: u32,

    /// Apply pending migrations before serving.
    pub migrate: bool,
}

#[derive(Clone)]
pub struct AppContext {
    pub providers: Arc<dyn ProvidersService>,
    pub packages: Arc<dyn PackagesService>,
    pub promotions: Arc<dyn PromotionsService>,
    pub payments: Arc<dyn PaymentsService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from database settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn connect(options: &DatabaseOptions, ozow: OzowConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&options.url, options.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        if options.migrate {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        Ok(Self::from_db(&Db::new(pool), ozow))
    }

    #[must_use]
    pub fn from_db(db: &Db, ozow: OzowConfig) -> Self {
        Self {
            providers: Arc::new(PgProvidersService::new(db.clone())),
            packages: Arc::new(PgPackagesService::new(db.clone())),
            promotions: Arc::new(PgPromotionsService::new(db.clone())),
            payments: Arc::new(PgPaymentsService::new(db.clone(), ozow)),
            auth: Arc::new(PgAuthService::new(db.clone())),
        }
    }
}
