//! Promotions Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{
    FromRow, Postgres, Row, Transaction,
    postgres::{PgArguments, PgRow},
    query,
    query::QueryAs,
    query_as,
};
use uuid::Uuid;

use crate::domain::{
    packages::records::PackageUuid,
    promotions::{
        data::{NewPromotion, PromotionDetails, PromotionUpdate, discounts::Discount},
        records::{PromotionRecord, PromotionUuid},
    },
};

const LIST_PROMOTIONS_SQL: &str = include_str!("sql/list_promotions.sql");
const GET_PROMOTION_SQL: &str = include_str!("sql/get_promotion.sql");
const FIND_PROMOTION_BY_CODE_SQL: &str = include_str!("sql/find_promotion_by_code.sql");
const CREATE_PROMOTION_SQL: &str = include_str!("sql/create_promotion.sql");
const UPDATE_PROMOTION_SQL: &str = include_str!("sql/update_promotion.sql");
const DELETE_PROMOTION_SQL: &str = include_str!("sql/delete_promotion.sql");
const REDEEM_PROMOTION_SQL: &str = include_str!("sql/redeem_promotion.sql");

type PromotionQuery<'q> = QueryAs<'q, Postgres, PromotionRecord, PgArguments>;

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromotionsRepository;

impl PgPromotionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PromotionRecord>, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(LIST_PROMOTIONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(GET_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Look up a live promotion by its exact, case-sensitive code.
    pub(crate) async fn find_promotion_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<PromotionRecord>, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(FIND_PROMOTION_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: NewPromotion,
    ) -> Result<PromotionRecord, sqlx::Error> {
        let query = query_as::<Postgres, PromotionRecord>(CREATE_PROMOTION_SQL)
            .bind(promotion.uuid.into_uuid());

        bind_details(query, promotion.details)?
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
        update: PromotionUpdate,
    ) -> Result<PromotionRecord, sqlx::Error> {
        let query =
            query_as::<Postgres, PromotionRecord>(UPDATE_PROMOTION_SQL).bind(promotion.into_uuid());

        bind_details(query, update.details)?
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Count one redemption, provided the usage limit still allows it.
    ///
    /// Returns `None` when the promotion is exhausted (or gone), leaving it
    /// untouched.
    pub(crate) async fn redeem_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<Option<PromotionRecord>, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(REDEEM_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

/// Bind `$2..$14`, shared by the create and update statements.
fn bind_details(
    query: PromotionQuery<'_>,
    details: PromotionDetails,
) -> Result<PromotionQuery<'_>, sqlx::Error> {
    let usage_limit = i32::try_from(details.usage_limit).map_err(|e| sqlx::Error::ColumnDecode {
        index: "usage_limit".to_string(),
        source: Box::new(e),
    })?;

    Ok(query
        .bind(details.code)
        .bind(details.name)
        .bind(details.description)
        .bind(details.discount.to_str())
        .bind(details.discount.value())
        .bind(SqlxTimestamp::from(details.starts_at))
        .bind(SqlxTimestamp::from(details.ends_at))
        .bind(usage_limit)
        .bind(details.package_uuid.map(PackageUuid::into_uuid))
        .bind(details.eligible_users)
        .bind(details.active)
        .bind(details.stackable)
        .bind(details.auto_apply))
}

fn counter_from_row(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: i32 = row.try_get(column)?;

    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for PromotionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_type: String = row.try_get("discount_type")?;
        let discount_value: Decimal = row.try_get("discount_value")?;

        let discount = Discount::from_parts(&discount_type, discount_value).ok_or_else(|| {
            sqlx::Error::ColumnDecode {
                index: "discount_type".to_string(),
                source: format!("unknown discount type `{discount_type}`").into(),
            }
        })?;

        Ok(Self {
            uuid: PromotionUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            discount,
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            usage_limit: counter_from_row(row, "usage_limit")?,
            times_used: counter_from_row(row, "times_used")?,
            package_uuid: row
                .try_get::<Option<Uuid>, _>("package_uuid")?
                .map(PackageUuid::from_uuid),
            eligible_users: row.try_get("eligible_users")?,
            active: row.try_get("active")?,
            stackable: row.try_get("stackable")?,
            auto_apply: row.try_get("auto_apply")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
