//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    packages::records::PackageUuid,
    payments::{
        data::PendingPayment,
        records::{PaymentRecord, PaymentStatus, PaymentUuid},
    },
    promotions::records::PromotionUuid,
};

const CREATE_PAYMENT_SQL: &str = include_str!("sql/create_payment.sql");
const FIND_PAYMENT_BY_REFERENCE_SQL: &str = include_str!("sql/find_payment_by_reference.sql");
const UPDATE_PAYMENT_STATUS_SQL: &str = include_str!("sql/update_payment_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PendingPayment,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(CREATE_PAYMENT_SQL)
            .bind(payment.uuid.into_uuid())
            .bind(payment.transaction_reference)
            .bind(payment.package_uuid.into_uuid())
            .bind(payment.promotion_uuid.map(PromotionUuid::into_uuid))
            .bind(payment.user_id)
            .bind(payment.amount)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch and lock the payment with the given merchant reference.
    pub(crate) async fn find_payment_by_reference(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transaction_reference: &str,
    ) -> Result<Option<PaymentRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(FIND_PAYMENT_BY_REFERENCE_SQL)
            .bind(transaction_reference)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        status: PaymentStatus,
        ozow_transaction_id: &str,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(UPDATE_PAYMENT_STATUS_SQL)
            .bind(payment.into_uuid())
            .bind(status.as_str())
            .bind(ozow_transaction_id)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: PaymentUuid::from_uuid(row.try_get("uuid")?),
            transaction_reference: row.try_get("transaction_reference")?,
            package_uuid: PackageUuid::from_uuid(row.try_get::<Uuid, _>("package_uuid")?),
            promotion_uuid: row
                .try_get::<Option<Uuid>, _>("promotion_uuid")?
                .map(PromotionUuid::from_uuid),
            user_id: row.try_get("user_id")?,
            amount: row.try_get("amount")?,
            status: status.parse::<PaymentStatus>().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            ozow_transaction_id: row.try_get("ozow_transaction_id")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
