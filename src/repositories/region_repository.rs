use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::region::Region;
use crate::utils::errors::{not_found_error, AppResult};

pub struct RegionRepository {
    pool: PgPool,
}

impl RegionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        code_prefix: &str,
        price_per_kg: Decimal,
    ) -> AppResult<Region> {
        let region = sqlx::query_as::<_, Region>(
            r#"
            INSERT INTO regions (name, code_prefix, last_sequence, price_per_kg, active)
            VALUES ($1, $2, 0, $3, TRUE)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(code_prefix)
        .bind(price_per_kg)
        .fetch_one(&self.pool)
        .await?;

        Ok(region)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Region>> {
        let region = sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(region)
    }

    pub async fn prefix_exists(&self, code_prefix: &str) -> AppResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM regions WHERE code_prefix = $1)")
                .bind(code_prefix)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    pub async fn list_active(&self) -> AppResult<Vec<Region>> {
        let regions =
            sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE active ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(regions)
    }

    /// Allocate the next voucher sequence for a region.
    ///
    /// Runs inside the caller's transaction so a failed voucher insert
    /// rolls the counter back as well. The single-statement
    /// `UPDATE ... RETURNING` takes a row lock, which serializes
    /// concurrent allocations per region: no duplicates, no gaps.
    pub async fn allocate_sequence(
        tx: &mut Transaction<'_, Postgres>,
        region_id: i64,
    ) -> AppResult<i64> {
        let next: Option<(i64,)> = sqlx::query_as(
            "UPDATE regions SET last_sequence = last_sequence + 1 WHERE id = $1 RETURNING last_sequence",
        )
        .bind(region_id)
        .fetch_optional(&mut **tx)
        .await?;

        match next {
            Some((value,)) => Ok(value),
            None => Err(not_found_error("Region", region_id)),
        }
    }
}
