//! Providers Data

use crate::domain::providers::records::ProviderUuid;

/// New Provider Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProvider {
    pub uuid: ProviderUuid,
    pub name: String,
}

/// Provider Update Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUpdate {
    pub name: String,
}
