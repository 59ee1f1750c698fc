//! Payments service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        packages::repository::PgPackagesRepository,
        payments::{
            data::{NewPayment, PaymentInitiation, PendingPayment},
            errors::PaymentsServiceError,
            ozow::{OzowConfig, OzowNotification, OzowPaymentRequest},
            records::{PaymentRecord, PaymentStatus, PaymentUuid},
            repository::PgPaymentsRepository,
        },
        promotions::{data::EvaluationRequest, evaluation::Evaluation, evaluator::PromotionEvaluator},
    },
};

#[derive(Debug, Clone)]
pub struct PgPaymentsService {
    db: Db,
    ozow: OzowConfig,
    repository: PgPaymentsRepository,
    packages: PgPackagesRepository,
    promotions: PromotionEvaluator,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(db: Db, ozow: OzowConfig) -> Self {
        Self {
            db,
            ozow,
            repository: PgPaymentsRepository::new(),
            packages: PgPackagesRepository::new(),
            promotions: PromotionEvaluator::new(),
        }
    }
}

/// Merchant and bank references derived from the payment id.
///
/// Ozow caps bank references at 20 characters, so only the random tail of
/// the identifier is used there.
fn references(payment: PaymentUuid) -> (String, String) {
    let simple = payment.into_uuid().simple().to_string().to_ascii_uppercase();
    let tail: String = simple.chars().skip(20).collect();

    (format!("BCN-{simple}"), format!("BEACON {tail}"))
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    #[tracing::instrument(
        name = "payments.service.initiate_payment",
        skip(self, payment),
        fields(payment_uuid = %payment.uuid, package_uuid = %payment.package_uuid),
        err
    )]
    async fn initiate_payment(
        &self,
        payment: NewPayment,
        at: Timestamp,
    ) -> Result<PaymentInitiation, PaymentsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let package = self
            .packages
            .find_package(&mut tx, payment.package_uuid)
            .await?
            .ok_or(PaymentsServiceError::PackageNotFound)?;

        if !package.active {
            return Err(PaymentsServiceError::PackageUnavailable);
        }

        let (amount, promotion_uuid, pricing) = match payment.promotion_code {
            Some(code) => {
                let request = EvaluationRequest {
                    code,
                    package_uuid: Some(package.uuid),
                    user_id: payment.user_id.clone(),
                };

                match self.promotions.redeem(&mut tx, &request, at).await? {
                    Evaluation::Valid { promotion, pricing } => {
                        let amount = pricing.map_or(package.current_price, |p| p.final_price);

                        (amount, Some(promotion.uuid), pricing)
                    }
                    Evaluation::Invalid(rejection) => {
                        return Err(PaymentsServiceError::PromotionRejected(rejection));
                    }
                }
            }
            None => (package.current_price, None, None),
        };

        let amount = amount.max(Decimal::ZERO);
        let (transaction_reference, bank_reference) = references(payment.uuid);

        let ozow = OzowPaymentRequest::new(
            &self.ozow,
            payment.uuid,
            amount,
            &transaction_reference,
            &bank_reference,
        );

        let created = self
            .repository
            .create_payment(
                &mut tx,
                PendingPayment {
                    uuid: payment.uuid,
                    transaction_reference,
                    package_uuid: package.uuid,
                    promotion_uuid,
                    user_id: payment.user_id,
                    amount,
                },
            )
            .await?;

        tx.commit().await?;

        info!(
            payment_uuid = %created.uuid,
            amount = %created.amount,
            promotion_uuid = ?created.promotion_uuid,
            "initiated payment"
        );

        Ok(PaymentInitiation {
            payment: created,
            pricing,
            ozow,
        })
    }

    #[tracing::instrument(
        name = "payments.service.record_notification",
        skip(self, notification),
        fields(
            transaction_reference = %notification.transaction_reference,
            status = %notification.status
        ),
        err
    )]
    async fn record_notification(
        &self,
        notification: OzowNotification,
    ) -> Result<PaymentRecord, PaymentsServiceError> {
        if !notification.verify(&self.ozow.private_key) {
            warn!("rejected notification with invalid signature");

            return Err(PaymentsServiceError::InvalidSignature);
        }

        let status: PaymentStatus = notification
            .status
            .parse()
            .map_err(|_err| PaymentsServiceError::InvalidData)?;

        let amount: Decimal = notification
            .amount
            .parse()
            .map_err(|_err| PaymentsServiceError::InvalidData)?;

        let mut tx = self.db.begin_transaction().await?;

        let payment = self
            .repository
            .find_payment_by_reference(&mut tx, &notification.transaction_reference)
            .await?
            .ok_or(PaymentsServiceError::NotFound)?;

        if amount != payment.amount {
            warn!(
                payment_uuid = %payment.uuid,
                expected = %payment.amount,
                received = %amount,
                "notification amount mismatch"
            );

            return Err(PaymentsServiceError::AmountMismatch);
        }

        let updated = self
            .repository
            .update_payment_status(&mut tx, payment.uuid, status, &notification.transaction_id)
            .await?;

        tx.commit().await?;

        info!(payment_uuid = %updated.uuid, status = %updated.status, "recorded payment notification");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Start a payment for an active package, redeeming a promotion code if given.
    ///
    /// The payment is stored as pending and the signed gateway form is returned.
    async fn initiate_payment(
        &self,
        payment: NewPayment,
        at: Timestamp,
    ) -> Result<PaymentInitiation, PaymentsServiceError>;

    /// Apply a signed gateway notification to its payment.
    async fn record_notification(
        &self,
        notification: OzowNotification,
    ) -> Result<PaymentRecord, PaymentsServiceError>;
}
