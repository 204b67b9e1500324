use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::{info, warn};

use furfect_types::api::{
    EmailQuery, MessageResponse, PetStateResponse, ProfileImageResponse, ProfileResponse,
    SavePetRequest, UserCountResponse,
};
use furfect_types::media::{DEFAULT_AVATAR, stored_image_uri};
use furfect_types::models::PetState;

use crate::auth::normalize_email;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;
use crate::upload::UploadForm;

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

fn email_param(query: EmailQuery) -> ApiResult<String> {
    query
        .email
        .filter(|e| !e.is_empty())
        .map(|e| normalize_email(&e))
        .ok_or_else(|| ApiError::Validation("Email required".to_string()))
}

pub async fn get_profile(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<ProfileResponse>> {
    let email = email_param(query)?;
    let user = state
        .db
        .run(move |db| db.get_user_by_email(&email))
        .await?
        .ok_or_else(user_not_found)?;

    let profile_image = stored_image_uri(
        user.profile_image.as_deref(),
        user.profile_image_type.as_deref(),
    )
    .unwrap_or_else(|| DEFAULT_AVATAR.to_string());

    Ok(Json(ProfileResponse {
        success: true,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        profile_image,
    }))
}

pub async fn count_users(State(state): State<AppState>) -> ApiResult<Json<UserCountResponse>> {
    let count = state.db.run(|db| db.count_users()).await?;
    Ok(Json(UserCountResponse {
        success: true,
        count,
    }))
}

pub async fn upload_profile_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<ProfileImageResponse>> {
    let mut form = UploadForm::read(multipart).await?;
    let email = form.text("email").map(normalize_email);
    let Some(image) = form.take_file("profileImage") else {
        return Err(ApiError::Validation("No file uploaded".to_string()));
    };
    let Some(email) = email else {
        return Err(ApiError::Validation("Email required".to_string()));
    };

    let profile_image = image.to_data_uri();
    let updated = state
        .db
        .run(move |db| db.set_profile_image(&email, &image.data, &image.content_type))
        .await?;
    if !updated {
        return Err(user_not_found());
    }

    Ok(Json(ProfileImageResponse {
        success: true,
        message: "Profile updated!".to_string(),
        profile_image,
    }))
}

/// Replace the user's virtual-pet state wholesale. Field values are stored
/// as sent.
pub async fn save_pet_state(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SavePetRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let Some(email) = req.email.filter(|e| !e.is_empty()).map(|e| normalize_email(&e)) else {
        return Err(ApiError::Validation("email required".to_string()));
    };
    let Some(pet) = req.pet.filter(|p| p.kind.is_some()) else {
        return Err(ApiError::Validation("pet.type required".to_string()));
    };

    let blob = serde_json::to_string(&pet).map_err(anyhow::Error::from)?;
    let lookup = email.clone();
    let saved = state
        .db
        .run(move |db| db.save_pet_state(&lookup, &blob))
        .await?;
    if !saved {
        return Err(user_not_found());
    }

    info!("User {} saved pet state ({:?}, level {})", email, pet.kind, pet.level);
    Ok(Json(MessageResponse::ok("Pet saved")))
}

pub async fn get_pet_state(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<PetStateResponse>> {
    let email = email_param(query)?;
    let user = state
        .db
        .run(move |db| db.get_user_by_email(&email))
        .await?
        .ok_or_else(user_not_found)?;

    let pet = match user.pet_state.as_deref() {
        Some(blob) => serde_json::from_str(blob).unwrap_or_else(|e| {
            warn!("Unreadable pet state for {}: {}", user.email, e);
            PetState::default()
        }),
        None => PetState::default(),
    };

    Ok(Json(PetStateResponse { success: true, pet }))
}
