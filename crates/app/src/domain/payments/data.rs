//! Payments Data

use rust_decimal::Decimal;

use crate::domain::{
    packages::records::PackageUuid,
    payments::{
        ozow::OzowPaymentRequest,
        records::{PaymentRecord, PaymentUuid},
    },
    promotions::{evaluation::Pricing, records::PromotionUuid},
};

/// A customer's request to pay for a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub uuid: PaymentUuid,
    pub package_uuid: PackageUuid,
    pub promotion_code: Option<String>,
    pub user_id: Option<String>,
}

/// Row data for a freshly initiated payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingPayment {
    pub uuid: PaymentUuid,
    pub transaction_reference: String,
    pub package_uuid: PackageUuid,
    pub promotion_uuid: Option<PromotionUuid>,
    pub user_id: Option<String>,
    pub amount: Decimal,
}

/// A stored pending payment together with the form the customer posts to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInitiation {
    pub payment: PaymentRecord,

    /// Present when a promotion was redeemed for this payment.
    pub pricing: Option<Pricing>,

    pub ozow: OzowPaymentRequest,
}
