/// Database row types — these map directly to SQLite rows.
/// Distinct from furfect-types API models to keep the DB layer independent.
use chrono::{DateTime, SecondsFormat, Utc};

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub profile_image: Option<Vec<u8>>,
    pub profile_image_type: Option<String>,
    /// JSON-encoded virtual pet state
    pub pet_state: Option<String>,
    pub created_at: String,
}

impl UserRow {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

pub struct PetRow {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub breed: String,
    pub description: String,
    pub image: Vec<u8>,
    pub image_type: String,
    pub created_at: String,
}

pub struct AdoptionRow {
    pub id: String,
    pub pet_id: Option<String>,
    pub pet_name: String,
    pub pet_breed: String,
    pub pet_image: Option<String>,
    pub requester_name: String,
    pub requester_dob: String,
    pub requester_contact: String,
    pub requester_email: String,
    pub requester_address: String,
    pub experience: String,
    pub time_with_pet: String,
    pub living_space: String,
    pub budget: String,
    pub reason: String,
    pub qualification_score: i64,
    pub recommendation: String,
    pub status: String,
    pub created_at: String,
}

pub struct ChatMessageRow {
    pub id: String,
    pub sender: String,
    pub name: String,
    pub profile: String,
    pub message: String,
    pub image: Option<Vec<u8>>,
    pub image_type: Option<String>,
    pub created_at: String,
}

/// Timestamps are stored as RFC 3339 UTC with millisecond precision so that
/// string order matches time order.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
