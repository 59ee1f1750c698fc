//! Package Requests

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beacon_app::domain::packages::{
    data::{NewPackage, PackageUpdate},
    records::PackageUuid,
};

use crate::money::from_amount;

const fn default_active() -> bool {
    true
}

/// Package fields an admin can set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PackageRequest {
    pub provider_uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub download_mbps: u32,
    pub upload_mbps: u32,

    /// Un-discounted monthly price.
    pub current_price: f64,

    #[serde(default = "default_active")]
    pub active: bool,
}

/// Create Package Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct CreatePackageRequest {
    /// Client-chosen identifier; generated when omitted.
    pub uuid: Option<Uuid>,

    #[serde(flatten)]
    pub package: PackageRequest,
}

impl TryFrom<PackageRequest> for PackageUpdate {
    type Error = StatusError;

    fn try_from(request: PackageRequest) -> Result<Self, Self::Error> {
        Ok(PackageUpdate {
            provider_uuid: request.provider_uuid.into(),
            name: request.name,
            description: request.description,
            download_mbps: request.download_mbps,
            upload_mbps: request.upload_mbps,
            current_price: from_amount(request.current_price, "currentPrice")?,
            active: request.active,
        })
    }
}

impl TryFrom<CreatePackageRequest> for NewPackage {
    type Error = StatusError;

    fn try_from(request: CreatePackageRequest) -> Result<Self, Self::Error> {
        let uuid = request.uuid.map_or_else(PackageUuid::new, Into::into);
        let details = PackageUpdate::try_from(request.package)?;

        Ok(NewPackage {
            uuid,
            provider_uuid: details.provider_uuid,
            name: details.name,
            description: details.description,
            download_mbps: details.download_mbps,
            upload_mbps: details.upload_mbps,
            current_price: details.current_price,
            active: details.active,
        })
    }
}
