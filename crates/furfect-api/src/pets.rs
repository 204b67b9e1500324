//! Adoptable pet catalog.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use furfect_db::models::{PetRow, format_timestamp};
use furfect_types::api::{MessageResponse, PetListResponse, PetResponse};
use furfect_types::media::encode_data_uri;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::upload::UploadForm;

fn to_response(row: PetRow) -> PetResponse {
    PetResponse {
        image: encode_data_uri(&row.image_type, &row.image),
        id: row.id,
        name: row.name,
        kind: row.kind,
        breed: row.breed,
        description: row.description,
    }
}

pub async fn upload_pet(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<MessageResponse>> {
    let mut form = UploadForm::read(multipart).await?;

    let (Some(name), Some(kind), Some(breed), Some(description)) = (
        form.text("name").map(str::to_string),
        form.text("type").map(str::to_string),
        form.text("breed").map(str::to_string),
        form.text("description").map(str::to_string),
    ) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };
    let Some(image) = form.take_file("petImage") else {
        return Err(ApiError::Validation("Pet image required".to_string()));
    };

    let pet = PetRow {
        id: Uuid::new_v4().to_string(),
        name,
        kind,
        breed,
        description,
        image: image.data,
        image_type: image.content_type,
        created_at: format_timestamp(Utc::now()),
    };
    let summary = format!("{} ({}) as {}", pet.name, pet.breed, pet.id);

    state.db.run(move |db| db.insert_pet(&pet)).await?;

    info!("Pet uploaded: {}", summary);
    Ok(Json(MessageResponse::ok("Pet uploaded successfully!")))
}

/// Catalog for the adoption center, in upload order.
pub async fn get_pets(State(state): State<AppState>) -> ApiResult<Json<PetListResponse>> {
    let rows = state.db.run(|db| db.list_pets(false)).await?;
    Ok(Json(PetListResponse {
        success: true,
        pets: rows.into_iter().map(to_response).collect(),
    }))
}

/// Catalog for the admin dashboard, newest first.
pub async fn all_pets(State(state): State<AppState>) -> ApiResult<Json<PetListResponse>> {
    let rows = state.db.run(|db| db.list_pets(true)).await?;
    Ok(Json(PetListResponse {
        success: true,
        pets: rows.into_iter().map(to_response).collect(),
    }))
}

/// Remove a catalog entry. Adoption requests pointing at it keep their
/// snapshot and are not touched.
pub async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let lookup = id.clone();
    if !state.db.run(move |db| db.delete_pet(&lookup)).await? {
        return Err(ApiError::NotFound("Pet not found".to_string()));
    }

    info!("Pet {} deleted", id);
    Ok(Json(MessageResponse::ok("Pet deleted successfully!")))
}
