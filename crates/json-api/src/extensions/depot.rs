//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use beacon_app::auth::AdminUuid;

const ADMIN_UUID_DEPOT_KEY: &str = "admin_uuid";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_admin_uuid(&mut self, admin: AdminUuid);

    /// The authenticated admin, or 401 when the auth middleware did not run.
    fn admin_uuid_or_401(&self) -> Result<AdminUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_admin_uuid(&mut self, admin: AdminUuid) {
        self.insert(ADMIN_UUID_DEPOT_KEY, admin);
    }

    fn admin_uuid_or_401(&self) -> Result<AdminUuid, StatusError> {
        self.get::<AdminUuid>(ADMIN_UUID_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
