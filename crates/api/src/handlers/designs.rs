//! Handlers for the `/designs` resource.
//!
//! Create and update accept `multipart/form-data` carrying the text
//! fields (`name`, `number`, `price`) plus the `image` file part. The
//! whole form is read into memory before validation; nothing reaches the
//! object store until the field rules and the MIME/size rules pass.

use atelier_core::design::{DesignFields, ImageUpload, MAX_IMAGE_BYTES};
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::design::Design;
use atelier_storage::ObjectStore;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::lifecycle::DesignLifecycle;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A design row plus the resolved public URL of its image blob.
#[derive(Debug, Serialize)]
pub struct DesignResponse {
    #[serde(flatten)]
    pub design: Design,
    pub image_url: String,
}

fn with_image_url(store: &dyn ObjectStore, design: Design) -> DesignResponse {
    let image_url = store.url(&design.image);
    DesignResponse { design, image_url }
}

/// GET /api/v1/designs
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<DesignResponse>>>> {
    let lifecycle = DesignLifecycle::new(&state.pool, state.storage.as_ref());
    let designs = lifecycle.list(user.user_id).await?;
    let data = designs
        .into_iter()
        .map(|d| with_image_url(state.storage.as_ref(), d))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/designs
///
/// Multipart form: `name`, `number`, `price`, `image` (file, required).
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<DesignResponse>>)> {
    let (fields, image) = read_design_form(multipart).await?;
    let image = image.ok_or_else(|| {
        AppError::Core(CoreError::invalid_field("image", "is required"))
    })?;

    let lifecycle = DesignLifecycle::new(&state.pool, state.storage.as_ref());
    let design = lifecycle.create(user.user_id, fields, image).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: with_image_url(state.storage.as_ref(), design),
        }),
    ))
}

/// GET /api/v1/designs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DesignResponse>>> {
    let lifecycle = DesignLifecycle::new(&state.pool, state.storage.as_ref());
    let design = lifecycle.get(user.user_id, id).await?;
    Ok(Json(DataResponse {
        data: with_image_url(state.storage.as_ref(), design),
    }))
}

/// PUT/PATCH /api/v1/designs/{id}
///
/// Multipart form: `name`, `number`, `price`, `image` (file, optional).
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<DesignResponse>>> {
    let (fields, image) = read_design_form(multipart).await?;

    let lifecycle = DesignLifecycle::new(&state.pool, state.storage.as_ref());
    let design = lifecycle.update(user.user_id, id, fields, image).await?;

    Ok(Json(DataResponse {
        data: with_image_url(state.storage.as_ref(), design),
    }))
}

/// DELETE /api/v1/designs/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let lifecycle = DesignLifecycle::new(&state.pool, state.storage.as_ref());
    lifecycle.delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Read the design multipart form into raw fields plus an optional image.
///
/// Unknown parts are ignored. Malformed multipart input maps to 400; the
/// field *content* rules are the lifecycle's job, not ours — except the
/// body size ceiling, which surfaces here and is reported as an `image`
/// field error so the client sees the same shape as any other rejection.
async fn read_design_form(
    mut multipart: Multipart,
) -> AppResult<(DesignFields, Option<ImageUpload>)> {
    let mut fields = DesignFields::default();
    let mut image = None;

    while let Some(part) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = part.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "name" => {
                fields.name = part.text().await.map_err(multipart_error)?;
            }
            "number" => {
                fields.number = part.text().await.map_err(multipart_error)?;
            }
            "price" => {
                fields.price = part.text().await.map_err(multipart_error)?;
            }
            "image" => {
                let filename = part.file_name().unwrap_or("upload").to_string();
                let content_type = part.content_type().unwrap_or("").to_string();
                let bytes = part.bytes().await.map_err(multipart_error)?;

                image = Some(ImageUpload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok((fields, image))
}

fn multipart_error(err: MultipartError) -> AppError {
    // A body that blows past the request size ceiling is an oversized
    // upload, not a malformed form.
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::Core(CoreError::invalid_field(
            "image",
            format!("must not exceed {MAX_IMAGE_BYTES} bytes"),
        ));
    }
    AppError::BadRequest(err.to_string())
}
