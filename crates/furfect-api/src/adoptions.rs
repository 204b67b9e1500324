//! Adoption workflow: intake with scoring, administrative status changes with
//! best-effort email notification, and the read/delete views.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use furfect_db::models::{AdoptionRow, format_timestamp, parse_timestamp};
use furfect_types::api::{
    AdoptedPet, AdoptedPetsResponse, AdoptionForm, AdoptionListResponse, AdoptionResponse,
    ApprovedCountResponse, EmailQuery, MessageResponse, StatusUpdateRequest,
    SubmitAdoptionResponse,
};
use furfect_types::media::{DEFAULT_PET_IMAGE, encode_data_uri};
use furfect_types::models::{AdoptionStatus, Application, PetSnapshot, Recommendation};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::mailer::OutgoingMail;
use crate::scoring;
use crate::state::{AppState, AppStateInner};

const SIGNATURE: &str = "FurFect Match";

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// -- Workflow --

/// Validate, score and store a new request. Returns the score and tier.
pub async fn submit(state: &AppStateInner, form: AdoptionForm) -> ApiResult<(u8, Recommendation)> {
    let (
        Some(pet_name),
        Some(pet_breed),
        Some(requester_name),
        Some(requester_dob),
        Some(requester_contact),
        Some(requester_email),
        Some(requester_address),
        Some(experience),
        Some(time_with_pet),
        Some(living_space),
        Some(budget),
        Some(reason),
    ) = (
        required(form.pet_name),
        required(form.pet_breed),
        required(form.requester_name),
        required(form.requester_dob),
        required(form.requester_contact),
        required(form.requester_email),
        required(form.requester_address),
        required(form.experience),
        required(form.time_with_pet),
        required(form.living_space),
        required(form.budget),
        required(form.reason),
    )
    else {
        return Err(ApiError::Validation(
            "All required fields must be filled out.".to_string(),
        ));
    };

    let application = Application {
        experience,
        time_with_pet,
        living_space,
        budget,
        reason,
    };
    let (score, recommendation) = scoring::score(&application);

    let lookup = (pet_name.clone(), pet_breed.clone());
    let pet = state
        .db
        .run(move |db| db.find_pet(&lookup.0, &lookup.1))
        .await?;

    let (pet_id, pet_image) = match pet {
        Some(pet) => {
            let image = (!pet.image.is_empty()).then(|| encode_data_uri(&pet.image_type, &pet.image));
            (Some(pet.id), image)
        }
        None => {
            info!("No catalog entry for {} ({}), storing request without pet link", pet_name, pet_breed);
            (None, None)
        }
    };

    let row = AdoptionRow {
        id: Uuid::new_v4().to_string(),
        pet_id,
        pet_name,
        pet_breed,
        pet_image,
        requester_name,
        requester_dob,
        requester_contact,
        requester_email: requester_email.to_lowercase(),
        requester_address,
        experience: application.experience,
        time_with_pet: application.time_with_pet,
        living_space: application.living_space,
        budget: application.budget,
        reason: application.reason,
        qualification_score: i64::from(score),
        recommendation: recommendation.label().to_string(),
        status: AdoptionStatus::Pending.as_str().to_string(),
        created_at: format_timestamp(Utc::now()),
    };

    let id = row.id.clone();
    state.db.run(move |db| db.insert_adoption(&row)).await?;
    info!("Adoption request {} submitted (score {}, {})", id, score, recommendation);

    Ok((score, recommendation))
}

/// Approve or decline a request, then notify the requester.
///
/// The status write is committed before the email is attempted and is not
/// undone if the email fails; that failure comes back as
/// [`ApiError::Notification`].
pub async fn update_status(
    state: &AppStateInner,
    id: String,
    requested: Option<String>,
) -> ApiResult<AdoptionStatus> {
    let status = match requested.as_deref() {
        Some("approved") => AdoptionStatus::Approved,
        Some("declined") => AdoptionStatus::Declined,
        _ => return Err(ApiError::Validation("Invalid status value.".to_string())),
    };

    // Unbounded: every committed status write is followed by the email below
    let lookup_id = id.clone();
    let updated = state
        .db
        .run_to_completion(move |db| {
            let Some(adoption) = db.get_adoption(&lookup_id)? else {
                return Ok(None);
            };
            db.set_adoption_status(&lookup_id, status.as_str())?;

            // Prefer the live catalog name, fall back to the snapshot
            let pet_name = match adoption.pet_id.as_deref() {
                Some(pet_id) => db.get_pet(pet_id)?.map(|pet| pet.name),
                None => None,
            }
            .unwrap_or_else(|| adoption.pet_name.clone());

            Ok(Some((adoption, pet_name)))
        })
        .await?;

    let Some((adoption, pet_name)) = updated else {
        return Err(ApiError::NotFound("Adoption request not found.".to_string()));
    };
    info!("Adoption request {} marked {}", id, status);

    let mail = status_notification(
        &state.mail.from,
        &adoption.requester_email,
        &adoption.requester_name,
        &pet_name,
        status,
    );
    if let Err(e) = state.deliver(mail).await {
        error!("Status email for adoption {} failed: {:#}", id, e);
        return Err(ApiError::Notification(format!(
            "Request {} but the notification email could not be sent.",
            status
        )));
    }

    Ok(status)
}

pub fn status_notification(
    from: &str,
    to: &str,
    requester_name: &str,
    pet_name: &str,
    status: AdoptionStatus,
) -> OutgoingMail {
    let (subject, body) = match status {
        AdoptionStatus::Approved => (
            "Adoption Request Approved!",
            format!(
                "Hello {},\n\nGood news! Your request to adopt {} has been APPROVED.\n\
                 We will contact you with further details.\n\nThank you,\n{}",
                requester_name, pet_name, SIGNATURE
            ),
        ),
        _ => (
            "Adoption Request Declined",
            format!(
                "Hello {},\n\nUnfortunately, your request to adopt {} has been DECLINED.\n\n\
                 Thank you for understanding,\n{}",
                requester_name, pet_name, SIGNATURE
            ),
        ),
    };

    OutgoingMail {
        from: from.to_string(),
        reply_to: None,
        to: to.to_string(),
        subject: subject.to_string(),
        body,
    }
}

fn request_date(row: &AdoptionRow) -> chrono::DateTime<Utc> {
    parse_timestamp(&row.created_at).unwrap_or_else(|| {
        warn!("Corrupt created_at '{}' on adoption '{}'", row.created_at, row.id);
        chrono::DateTime::default()
    })
}

fn to_response(row: AdoptionRow) -> AdoptionResponse {
    let request_date = request_date(&row);
    let status = row.status.parse().unwrap_or_else(|e| {
        warn!("Adoption '{}': {}", row.id, e);
        AdoptionStatus::Pending
    });

    AdoptionResponse {
        id: row.id,
        pet_id: row.pet_id,
        snapshot: PetSnapshot {
            pet_name: row.pet_name,
            pet_breed: row.pet_breed,
            pet_image: row.pet_image,
        },
        requester_name: row.requester_name,
        requester_dob: row.requester_dob,
        requester_contact: row.requester_contact,
        requester_email: row.requester_email,
        requester_address: row.requester_address,
        experience: row.experience,
        time_with_pet: row.time_with_pet,
        living_space: row.living_space,
        budget: row.budget,
        reason: row.reason,
        qualification_score: u8::try_from(row.qualification_score).unwrap_or_default(),
        recommendation: row.recommendation,
        status,
        request_date,
    }
}

fn require_email(query: EmailQuery) -> ApiResult<String> {
    query
        .email
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ApiError::Validation("Email required".to_string()))
}

// -- Handlers --

pub async fn submit_request(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<AdoptionForm>,
) -> ApiResult<impl IntoResponse> {
    let (score, recommendation) = submit(&state, form).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitAdoptionResponse {
            success: true,
            message: "Adoption request submitted successfully!".to_string(),
            score,
            recommendation,
        }),
    ))
}

pub async fn list_all(State(state): State<AppState>) -> ApiResult<Json<AdoptionListResponse>> {
    let rows = state.db.run(|db| db.list_adoptions()).await?;

    Ok(Json(AdoptionListResponse {
        success: true,
        requests: rows.into_iter().map(to_response).collect(),
    }))
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusUpdateRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let status = update_status(&state, id, req.status).await?;

    Ok(Json(MessageResponse::ok(format!(
        "Request {} and email sent.",
        status
    ))))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<AdoptionListResponse>> {
    let email = require_email(query)?;
    let rows = state
        .db
        .run(move |db| db.list_adoptions_by_email(&email, None))
        .await?;

    Ok(Json(AdoptionListResponse {
        success: true,
        requests: rows.into_iter().map(to_response).collect(),
    }))
}

/// Approved requests for a user, each resolved against the current catalog
/// where the pet still exists and against its snapshot otherwise.
pub async fn list_adopted_by_user(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<AdoptedPetsResponse>> {
    let email = require_email(query)?;
    let resolved = state
        .db
        .run(move |db| {
            let rows = db.list_adoptions_by_email(&email, Some(AdoptionStatus::Approved.as_str()))?;
            let mut resolved = Vec::with_capacity(rows.len());
            for row in rows {
                let pet = match row.pet_id.as_deref() {
                    Some(pet_id) => db.get_pet(pet_id)?,
                    None => None,
                };
                resolved.push((row, pet));
            }
            Ok(resolved)
        })
        .await?;

    let pets = resolved
        .into_iter()
        .map(|(row, pet)| {
            let request_date = request_date(&row);
            let qualification_score = u8::try_from(row.qualification_score).unwrap_or_default();
            let fallback = |value: String, default: &str| {
                if value.is_empty() { default.to_string() } else { value }
            };

            match pet {
                Some(pet) => AdoptedPet {
                    pet_image: if pet.image.is_empty() {
                        row.pet_image.unwrap_or_else(|| DEFAULT_PET_IMAGE.to_string())
                    } else {
                        encode_data_uri(&pet.image_type, &pet.image)
                    },
                    pet_name: pet.name,
                    pet_breed: pet.breed,
                    request_date,
                    qualification_score,
                },
                None => AdoptedPet {
                    pet_name: fallback(row.pet_name, "Unknown Pet"),
                    pet_breed: fallback(row.pet_breed, "Unknown Breed"),
                    pet_image: row.pet_image.unwrap_or_else(|| DEFAULT_PET_IMAGE.to_string()),
                    request_date,
                    qualification_score,
                },
            }
        })
        .collect();

    Ok(Json(AdoptedPetsResponse {
        success: true,
        pets,
    }))
}

pub async fn count_approved(
    State(state): State<AppState>,
) -> ApiResult<Json<ApprovedCountResponse>> {
    let total_approved = state
        .db
        .run(|db| db.count_adoptions_with_status(AdoptionStatus::Approved.as_str()))
        .await?;

    Ok(Json(ApprovedCountResponse {
        success: true,
        total_approved,
    }))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let lookup_id = id.clone();
    let deleted = state.db.run(move |db| db.delete_adoption(&lookup_id)).await?;
    if !deleted {
        return Err(ApiError::NotFound("Adoption request not found.".to_string()));
    }

    info!("Adoption request {} deleted", id);
    Ok(Json(MessageResponse::ok("Adoption request deleted.")))
}
