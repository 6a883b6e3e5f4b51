//! Design entity model and DTOs.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `designs` table.
///
/// `image` holds the object-store key of the uploaded artifact, never the
/// bytes themselves.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Design {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub number: String,
    pub price: f64,
    pub image: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new design. `owner_id` comes from the authenticated
/// caller, `image` from a completed upload.
#[derive(Debug, Clone)]
pub struct CreateDesign {
    pub owner_id: DbId,
    pub name: String,
    pub number: String,
    pub price: f64,
    pub image: String,
}

/// DTO for updating an existing design. Text fields are always replaced;
/// `image` only when a new upload happened.
#[derive(Debug, Clone)]
pub struct UpdateDesign {
    pub name: String,
    pub number: String,
    pub price: f64,
    pub image: Option<String>,
}
