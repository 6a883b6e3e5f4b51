//! Design lifecycle: validation, ownership, and artifact ordering.
//!
//! Every mutating operation on a design runs through [`DesignLifecycle`],
//! which takes the caller's identity as an explicit parameter and enforces
//! three rules:
//!
//! 1. input is validated before any network call is made;
//! 2. an image upload must succeed before the row referencing it is
//!    written, so a visible `image` key always points at an existing blob;
//! 3. only the owner may read, update, or delete a design.
//!
//! Failures are terminal for the request; nothing is retried. Replaced or
//! deleted designs leave their previous blobs in the store (accepted
//! orphan accumulation, see DESIGN.md).

use atelier_core::design::{
    image_key, validate_fields, validate_image, DesignFields, ImageUpload,
};
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::design::{CreateDesign, Design, UpdateDesign};
use atelier_db::repositories::DesignRepo;
use atelier_db::DbPool;
use atelier_storage::ObjectStore;

use crate::error::{AppError, AppResult};

/// Orchestrates design CRUD against the database and the object store.
pub struct DesignLifecycle<'a> {
    pool: &'a DbPool,
    store: &'a dyn ObjectStore,
}

impl<'a> DesignLifecycle<'a> {
    pub fn new(pool: &'a DbPool, store: &'a dyn ObjectStore) -> Self {
        Self { pool, store }
    }

    /// All designs owned by `caller`, most recently created first.
    pub async fn list(&self, caller: DbId) -> AppResult<Vec<Design>> {
        Ok(DesignRepo::list_by_owner(self.pool, caller).await?)
    }

    /// Create a design together with its image artifact.
    ///
    /// The upload happens before the insert; if it fails, no row is
    /// created. If the insert fails after a successful upload the blob is
    /// orphaned -- there is no compensating delete.
    pub async fn create(
        &self,
        caller: DbId,
        fields: DesignFields,
        image: ImageUpload,
    ) -> AppResult<Design> {
        let valid = validate_fields(&fields)?;
        validate_image(&image)?;

        let key = image_key(chrono::Utc::now(), &image.filename);
        self.store
            .put(&key, image.bytes, &image.content_type)
            .await?;

        let design = DesignRepo::create(
            self.pool,
            &CreateDesign {
                owner_id: caller,
                name: valid.name,
                number: valid.number,
                price: valid.price,
                image: key,
            },
        )
        .await?;

        tracing::info!(design_id = design.id, owner_id = caller, "Created design");
        Ok(design)
    }

    /// Fetch a design, enforcing ownership.
    pub async fn get(&self, caller: DbId, id: DbId) -> AppResult<Design> {
        let design = DesignRepo::find_by_id(self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Design",
                id,
            }))?;

        if design.owner_id != caller {
            return Err(AppError::Core(CoreError::Forbidden(
                "You do not have access to this design".into(),
            )));
        }

        Ok(design)
    }

    /// Replace a design's fields, optionally uploading a replacement image.
    ///
    /// When a new image is supplied it is uploaded under a fresh key
    /// before the row is touched; the previous blob stays in the store.
    pub async fn update(
        &self,
        caller: DbId,
        id: DbId,
        fields: DesignFields,
        image: Option<ImageUpload>,
    ) -> AppResult<Design> {
        // Ownership check first; cross-owner callers learn nothing else.
        self.get(caller, id).await?;

        let valid = validate_fields(&fields)?;

        let new_key = match image {
            Some(image) => {
                validate_image(&image)?;
                let key = image_key(chrono::Utc::now(), &image.filename);
                self.store
                    .put(&key, image.bytes, &image.content_type)
                    .await?;
                Some(key)
            }
            None => None,
        };

        let design = DesignRepo::update(
            self.pool,
            id,
            &UpdateDesign {
                name: valid.name,
                number: valid.number,
                price: valid.price,
                image: new_key,
            },
        )
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Design",
            id,
        }))?;

        tracing::info!(design_id = design.id, owner_id = caller, "Updated design");
        Ok(design)
    }

    /// Delete a design row. The associated blob is left in place.
    ///
    /// Ownership is verified before removal, same as get/update.
    pub async fn delete(&self, caller: DbId, id: DbId) -> AppResult<()> {
        self.get(caller, id).await?;

        let deleted = DesignRepo::delete(self.pool, id).await?;
        if !deleted {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Design",
                id,
            }));
        }

        tracing::info!(design_id = id, owner_id = caller, "Deleted design");
        Ok(())
    }
}
