use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// One anonymized compensation data point, with the salary in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub position: String,
    pub years_of_experience: i64,
    pub location: String,
    pub team_size: i64,
    pub salary: i64,
    pub created_at: DateTime<Utc>,
}

/// The persisted shape of a profile. The salary only exists here encrypted.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub position: String,
    pub years_of_experience: i64,
    pub location: String,
    pub team_size: i64,
    pub salary_encrypted: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    #[validate(length(min = 1))]
    pub position: String,
    #[validate(range(min = 0))]
    pub years_of_experience: i64,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 0))]
    pub team_size: i64,
    #[validate(range(min = 1))]
    pub salary: i64,
}

impl NewProfile {
    pub fn new(
        position: impl Into<String>,
        years_of_experience: i64,
        location: impl Into<String>,
        team_size: i64,
        salary: i64,
    ) -> Self {
        Self {
            position: position.into(),
            years_of_experience,
            location: location.into(),
            team_size,
            salary,
        }
    }

    /// Free-text columns are stored trimmed so exact-match filters behave.
    pub fn normalized(mut self) -> Self {
        self.position = self.position.trim().to_string();
        self.location = self.location.trim().to_string();
        self
    }
}
