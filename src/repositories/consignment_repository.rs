use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::consignment::{Consignment, ConsignmentStatus};
use crate::services::visibility::ConsignmentScope;
use crate::utils::errors::AppResult;

/// Column values for a consignment insert
pub struct NewConsignment<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub driver_id: Option<i64>,
    pub route: Option<&'a str>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub notes: &'a str,
    pub created_by: i64,
}

pub struct ConsignmentRepository {
    pool: PgPool,
}

impl ConsignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Next per-day consignment sequence. The upsert is atomic, so
    /// concurrent creations on the same day never share a number.
    pub async fn next_day_sequence(
        tx: &mut Transaction<'_, Postgres>,
        day: NaiveDate,
    ) -> AppResult<i64> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO consignment_counters (day, value)
            VALUES ($1, 1)
            ON CONFLICT (day) DO UPDATE SET value = consignment_counters.value + 1
            RETURNING value
            "#,
        )
        .bind(day)
        .fetch_one(&mut **tx)
        .await?;

        Ok(value)
    }

    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        new: &NewConsignment<'_>,
    ) -> AppResult<Consignment> {
        let consignment = sqlx::query_as::<_, Consignment>(
            r#"
            INSERT INTO consignments (
                code, name, driver_id, route, expected_delivery_date,
                status, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.code)
        .bind(new.name)
        .bind(new.driver_id)
        .bind(new.route)
        .bind(new.expected_delivery_date)
        .bind(new.notes)
        .bind(new.created_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(consignment)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Consignment>> {
        let consignment =
            sqlx::query_as::<_, Consignment>("SELECT * FROM consignments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(consignment)
    }

    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> AppResult<Option<Consignment>> {
        let consignment =
            sqlx::query_as::<_, Consignment>("SELECT * FROM consignments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(consignment)
    }

    pub async fn list(&self, scope: &ConsignmentScope) -> AppResult<Vec<Consignment>> {
        let mut sql = String::from("SELECT * FROM consignments");
        if let Some(clause) = scope.sql_clause() {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Consignment>(&sql);
        if let Some(value) = scope.bind_value() {
            query = query.bind(value);
        }

        let consignments = query.fetch_all(&self.pool).await?;

        Ok(consignments)
    }

    pub async fn update_status(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        status: ConsignmentStatus,
        notes: &str,
    ) -> AppResult<Consignment> {
        let consignment = sqlx::query_as::<_, Consignment>(
            r#"
            UPDATE consignments
            SET status = $2, notes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(notes)
        .fetch_one(&mut **tx)
        .await?;

        Ok(consignment)
    }
}
