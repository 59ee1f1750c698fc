//! Payments Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{packages::records::PackageUuid, promotions::records::PromotionUuid},
    uuids::TypedUuid,
};

/// Payment UUID
pub type PaymentUuid = TypedUuid<PaymentRecord>;

/// Lifecycle state of a payment, as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Complete,
    Cancelled,
    Error,
    Abandoned,
    PendingInvestigation,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
            Self::Cancelled => "cancelled",
            Self::Error => "error",
            Self::Abandoned => "abandoned",
            Self::PendingInvestigation => "pending_investigation",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised payment status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment status `{0}`")]
pub struct UnknownPaymentStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    /// Accepts both the stored snake case form and the gateway's pascal case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.replace('_', "").to_ascii_lowercase();

        match normalised.as_str() {
            "pending" => Ok(Self::Pending),
            "complete" => Ok(Self::Complete),
            "cancelled" => Ok(Self::Cancelled),
            "error" => Ok(Self::Error),
            "abandoned" => Ok(Self::Abandoned),
            "pendinginvestigation" => Ok(Self::PendingInvestigation),
            _ => Err(UnknownPaymentStatus(value.to_string())),
        }
    }
}

/// Payment Record
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub uuid: PaymentUuid,

    /// Merchant reference sent to the gateway and echoed back in notifications.
    pub transaction_reference: String,

    pub package_uuid: PackageUuid,
    pub promotion_uuid: Option<PromotionUuid>,
    pub user_id: Option<String>,

    /// Amount charged, after any promotion.
    pub amount: Decimal,

    pub status: PaymentStatus,
    pub ozow_transaction_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
