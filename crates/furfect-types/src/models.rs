use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Species of the virtual pet a user is raising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetKind {
    Cat,
    Dog,
}

/// Virtual-pet state embedded in every user record.
///
/// Field ranges are not enforced: whatever the client saves is stored and
/// returned as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetState {
    #[serde(default = "default_pet_name")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<PetKind>,
    #[serde(default = "default_level")]
    pub level: i64,
    #[serde(default = "default_meter")]
    pub hunger: i64,
    #[serde(default = "default_meter")]
    pub energy: i64,
    #[serde(default)]
    pub exp: i64,
}

fn default_pet_name() -> String {
    "My Pet".to_string()
}

fn default_level() -> i64 {
    1
}

fn default_meter() -> i64 {
    100
}

impl Default for PetState {
    fn default() -> Self {
        Self {
            name: default_pet_name(),
            kind: None,
            level: default_level(),
            hunger: default_meter(),
            energy: default_meter(),
            exp: 0,
        }
    }
}

/// Lifecycle of an adoption request. Anything other than `Pending` is
/// terminal in normal flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionStatus {
    Pending,
    Approved,
    Declined,
}

impl AdoptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown adoption status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AdoptionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Tier derived from a qualification score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Highly Qualified")]
    HighlyQualified,
    #[serde(rename = "Qualified")]
    Qualified,
    #[serde(rename = "May Need Assistance")]
    MayNeedAssistance,
    #[serde(rename = "Not Qualified")]
    NotQualified,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighlyQualified => "Highly Qualified",
            Self::Qualified => "Qualified",
            Self::MayNeedAssistance => "May Need Assistance",
            Self::NotQualified => "Not Qualified",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five questionnaire answers that feed the qualification score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub experience: String,
    pub time_with_pet: String,
    pub living_space: String,
    pub budget: String,
    pub reason: String,
}

/// Pet details copied onto an adoption request at submission time so the
/// request stays readable after the catalog entry is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetSnapshot {
    pub pet_name: String,
    pub pet_breed: String,
    pub pet_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pet_state_fills_missing_fields() {
        let state: PetState = serde_json::from_str(r#"{"type":"cat","hunger":-5}"#).unwrap();
        assert_eq!(state.kind, Some(PetKind::Cat));
        assert_eq!(state.name, "My Pet");
        assert_eq!(state.level, 1);
        assert_eq!(state.hunger, -5);
        assert_eq!(state.energy, 100);
        assert_eq!(state.exp, 0);
    }

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("approved".parse::<AdoptionStatus>().unwrap(), AdoptionStatus::Approved);
        assert!("Approved".parse::<AdoptionStatus>().is_err());
        assert!("".parse::<AdoptionStatus>().is_err());
    }

    #[test]
    fn recommendation_serializes_as_label() {
        let json = serde_json::to_string(&Recommendation::MayNeedAssistance).unwrap();
        assert_eq!(json, r#""May Need Assistance""#);
        assert_eq!(Recommendation::Qualified.to_string(), "Qualified");
    }
}
