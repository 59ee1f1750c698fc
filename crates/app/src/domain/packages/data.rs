//! Packages Data

use rust_decimal::Decimal;

use crate::domain::{packages::records::PackageUuid, providers::records::ProviderUuid};

/// New Package Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPackage {
    pub uuid: PackageUuid,
    pub provider_uuid: ProviderUuid,
    pub name: String,
    pub description: Option<String>,
    pub download_mbps: u32,
    pub upload_mbps: u32,
    pub current_price: Decimal,
    pub active: bool,
}

/// Package Update Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUpdate {
    pub provider_uuid: ProviderUuid,
    pub name: String,
    pub description: Option<String>,
    pub download_mbps: u32,
    pub upload_mbps: u32,
    pub current_price: Decimal,
    pub active: bool,
}

/// Which packages a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageVisibility {
    /// Only packages on sale to customers.
    Active,

    /// Every package that has not been deleted.
    All,
}
