use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::voucher::{DeliveryType, PaymentMethod, Voucher, VoucherStatus};
use crate::services::visibility::VoucherScope;
use crate::utils::errors::{not_found_error, AppResult};

/// Column values for a voucher insert. The code and notes are minted
/// by the controller before the insert.
pub struct NewVoucher<'a> {
    pub code: &'a str,
    pub sender_name: &'a str,
    pub sender_phone: &'a str,
    pub sender_address: &'a str,
    pub receiver_name: &'a str,
    pub receiver_phone: &'a str,
    pub receiver_address: &'a str,
    pub weight_kg: Decimal,
    pub currency: &'a str,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    pub notes: &'a str,
    pub origin_region_id: i64,
    pub destination_region_id: i64,
    pub driver_id: Option<i64>,
    pub created_by: i64,
}

pub struct VoucherRepository {
    pool: PgPool,
}

impl VoucherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new voucher inside the caller's transaction, so the
    /// sequence allocation rolls back with it on failure.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        new: &NewVoucher<'_>,
    ) -> AppResult<Voucher> {
        let voucher = sqlx::query_as::<_, Voucher>(
            r#"
            INSERT INTO vouchers (
                code, sender_name, sender_phone, sender_address,
                receiver_name, receiver_phone, receiver_address,
                weight_kg, currency, total_amount, payment_method,
                delivery_type, status, notes, origin_region_id,
                destination_region_id, driver_id, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    'pending', $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(new.code)
        .bind(new.sender_name)
        .bind(new.sender_phone)
        .bind(new.sender_address)
        .bind(new.receiver_name)
        .bind(new.receiver_phone)
        .bind(new.receiver_address)
        .bind(new.weight_kg)
        .bind(new.currency)
        .bind(new.total_amount)
        .bind(new.payment_method)
        .bind(new.delivery_type)
        .bind(new.notes)
        .bind(new.origin_region_id)
        .bind(new.destination_region_id)
        .bind(new.driver_id)
        .bind(new.created_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(voucher)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Voucher>> {
        let voucher = sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(voucher)
    }

    /// Fetch a voucher inside an open transaction, locking the row
    /// for the duration of the status update.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> AppResult<Option<Voucher>> {
        let voucher =
            sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(voucher)
    }

    /// List vouchers restricted to the actor's visibility scope,
    /// newest first, optionally filtered by status.
    pub async fn list(
        &self,
        scope: &VoucherScope,
        status: Option<VoucherStatus>,
    ) -> AppResult<Vec<Voucher>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut bind_count = 0;

        // The scope clause always references $1, so it must be the
        // first bind when present.
        if let Some(clause) = scope.sql_clause() {
            bind_count += 1;
            clauses.push(clause.to_string());
        }
        if status.is_some() {
            clauses.push(format!("status = ${}", bind_count + 1));
        }

        let mut sql = String::from("SELECT * FROM vouchers");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Voucher>(&sql);
        if let Some(value) = scope.bind_value() {
            query = query.bind(value);
        }
        if let Some(status) = status {
            query = query.bind(status);
        }

        let vouchers = query.fetch_all(&self.pool).await?;

        Ok(vouchers)
    }

    pub async fn list_by_consignment(&self, consignment_id: i64) -> AppResult<Vec<Voucher>> {
        let vouchers = sqlx::query_as::<_, Voucher>(
            "SELECT * FROM vouchers WHERE consignment_id = $1 ORDER BY code",
        )
        .bind(consignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vouchers)
    }

    /// Write the new status together with the regenerated notes
    /// projection. The proof-of-delivery path is only overwritten when
    /// a new one is recorded.
    pub async fn update_status(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        status: VoucherStatus,
        notes: &str,
        pod_image_path: Option<&str>,
    ) -> AppResult<Voucher> {
        let voucher = sqlx::query_as::<_, Voucher>(
            r#"
            UPDATE vouchers
            SET status = $2, notes = $3,
                pod_image_path = COALESCE($4, pod_image_path),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(notes)
        .bind(pod_image_path)
        .fetch_one(&mut **tx)
        .await?;

        Ok(voucher)
    }

    /// Fetch the vouchers matching the given ids, in no particular order
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Voucher>> {
        let vouchers = sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(vouchers)
    }

    /// Attach a voucher to a consignment, or detach it with `None`.
    /// Runs inside the caller's transaction so a multi-voucher attach
    /// either lands completely or not at all.
    pub async fn set_consignment(
        tx: &mut Transaction<'_, Postgres>,
        voucher_id: i64,
        consignment_id: Option<i64>,
    ) -> AppResult<Voucher> {
        let voucher = sqlx::query_as::<_, Voucher>(
            r#"
            UPDATE vouchers
            SET consignment_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(voucher_id)
        .bind(consignment_id)
        .fetch_optional(&mut **tx)
        .await?;

        voucher.ok_or_else(|| not_found_error("Voucher", voucher_id))
    }
}
