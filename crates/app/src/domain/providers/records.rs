//! Provider Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Provider UUID
pub type ProviderUuid = TypedUuid<ProviderRecord>;

/// Provider Record
///
/// A network operator whose packages are resold through the catalog.
#[derive(Debug, Clone)]
pub struct ProviderRecord {
    pub uuid: ProviderUuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
