use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use furfect_db::is_unique_violation;
use furfect_db::models::{UserRow, format_timestamp};
use furfect_types::api::{LoginRequest, LoginResponse, MessageResponse, UserSummary};
use furfect_types::models::PetState;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::upload::UploadForm;

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn signup(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = UploadForm::read(multipart).await?;

    let (Some(email), Some(password)) = (form.text("email"), form.text("password")) else {
        return Err(ApiError::Validation(
            "Email and password are required.".to_string(),
        ));
    };
    let email = normalize_email(email);
    let password = password.to_string();
    let first_name = form.text("firstName").unwrap_or_default().to_string();
    let last_name = form.text("lastName").unwrap_or_default().to_string();
    let profile_image = form.take_file("profileImage");

    // Check if email is taken
    let lookup = email.clone();
    if state
        .db
        .run(move |db| db.get_user_by_email(&lookup))
        .await?
        .is_some()
    {
        return Err(ApiError::DuplicateIdentity(
            "Email already registered!".to_string(),
        ));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();

    let user = UserRow {
        id: Uuid::new_v4().to_string(),
        email: email.clone(),
        first_name,
        last_name,
        password: password_hash,
        profile_image_type: profile_image.as_ref().map(|i| i.content_type.clone()),
        profile_image: profile_image.map(|i| i.data),
        pet_state: Some(serde_json::to_string(&PetState::default()).map_err(anyhow::Error::from)?),
        created_at: format_timestamp(Utc::now()),
    };

    match state.db.run(move |db| db.create_user(&user)).await {
        Ok(()) => {}
        // Lost a race with a concurrent signup for the same email
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::DuplicateIdentity(
                "Email already registered!".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    info!("User {} registered", email);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("User registered successfully!")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = normalize_email(&req.email);
    let user = state
        .db
        .run(move |db| db.get_user_by_email(&email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("stored password hash is unreadable: {}", e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful!".to_string(),
        user: UserSummary {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        },
    }))
}
