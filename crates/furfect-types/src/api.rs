use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AdoptionStatus, PetSnapshot, PetState, Recommendation};

// -- Shared --

/// Plain `{success, message}` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

// -- Users --

/// Missing fields deserialize as empty and fail as bad credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub success: bool,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserCountResponse {
    pub success: bool,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageResponse {
    pub success: bool,
    pub message: String,
    pub profile_image: String,
}

#[derive(Debug, Deserialize)]
pub struct SavePetRequest {
    pub email: Option<String>,
    pub pet: Option<PetState>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PetStateResponse {
    pub success: bool,
    pub pet: PetState,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

// -- Pet catalog --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub breed: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PetListResponse {
    pub success: bool,
    pub pets: Vec<PetResponse>,
}

// -- Adoptions --

/// Adoption application as posted by the client. Every field is required;
/// they are optional here so a missing one surfaces as a validation error
/// rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionForm {
    pub pet_name: Option<String>,
    pub pet_breed: Option<String>,
    pub requester_name: Option<String>,
    #[serde(rename = "requesterDOB")]
    pub requester_dob: Option<String>,
    pub requester_contact: Option<String>,
    pub requester_email: Option<String>,
    pub requester_address: Option<String>,
    pub experience: Option<String>,
    pub time_with_pet: Option<String>,
    pub living_space: Option<String>,
    pub budget: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAdoptionResponse {
    pub success: bool,
    pub message: String,
    pub score: u8,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionResponse {
    pub id: String,
    pub pet_id: Option<String>,
    #[serde(flatten)]
    pub snapshot: PetSnapshot,
    pub requester_name: String,
    #[serde(rename = "requesterDOB")]
    pub requester_dob: String,
    pub requester_contact: String,
    pub requester_email: String,
    pub requester_address: String,
    pub experience: String,
    pub time_with_pet: String,
    pub living_space: String,
    pub budget: String,
    pub reason: String,
    pub qualification_score: u8,
    pub recommendation: String,
    pub status: AdoptionStatus,
    pub request_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdoptionListResponse {
    pub success: bool,
    pub requests: Vec<AdoptionResponse>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptedPet {
    pub pet_name: String,
    pub pet_breed: String,
    pub request_date: DateTime<Utc>,
    pub pet_image: String,
    pub qualification_score: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdoptedPetsResponse {
    pub success: bool,
    pub pets: Vec<AdoptedPet>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedCountResponse {
    pub success: bool,
    pub total_approved: u64,
}
