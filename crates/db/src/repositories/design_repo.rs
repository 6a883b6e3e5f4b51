//! Repository for the `designs` table.
//!
//! Queries are owner-agnostic; ownership policy is enforced by the
//! lifecycle layer above, which always loads the row first.

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::design::{CreateDesign, Design, UpdateDesign};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, number, price, image, created_at, updated_at";

/// Provides CRUD operations for designs.
pub struct DesignRepo;

impl DesignRepo {
    /// Insert a new design, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDesign) -> Result<Design, sqlx::Error> {
        let query = format!(
            "INSERT INTO designs (owner_id, name, number, price, image)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.number)
            .bind(input.price)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    /// Find a design by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Design>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designs WHERE id = $1");
        sqlx::query_as::<_, Design>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all designs belonging to `owner_id`, most recently created first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Design>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM designs
             WHERE owner_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the mutable fields of a design. `image` is only overwritten
    /// when the input carries a new key.
    ///
    /// Returns `None` if no row with the given `id` exists. `owner_id` is
    /// never touched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDesign,
    ) -> Result<Option<Design>, sqlx::Error> {
        let query = format!(
            "UPDATE designs SET
                name = $2,
                number = $3,
                price = $4,
                image = COALESCE($5, image),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.number)
            .bind(input.price)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Delete a design by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM designs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
