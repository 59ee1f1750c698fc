//! Package Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{domain::providers::records::ProviderUuid, uuids::TypedUuid};

/// Package UUID
pub type PackageUuid = TypedUuid<PackageRecord>;

/// Package Record
#[derive(Debug, Clone)]
pub struct PackageRecord {
    pub uuid: PackageUuid,
    pub provider_uuid: ProviderUuid,
    pub name: String,
    pub description: Option<String>,
    pub download_mbps: u32,
    pub upload_mbps: u32,

    /// Un-discounted price, the base for promotion pricing.
    pub current_price: Decimal,

    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
