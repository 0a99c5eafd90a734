use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::profile::{NewProfile, Profile};
use crate::models::search_filters::SearchFilters;
use crate::services::profile_service::ProfileStats;
use crate::services::similarity::ScoredProfile;
use crate::utils::validation::{required_integer, required_text, IntegerInput};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProfilePayload {
    pub position: Option<String>,
    pub years_of_experience: Option<IntegerInput>,
    pub location: Option<String>,
    pub team_size: Option<IntegerInput>,
    pub salary: Option<IntegerInput>,
}

impl CreateProfilePayload {
    pub fn into_new_profile(self) -> Result<NewProfile> {
        Ok(NewProfile {
            position: required_text(self.position.as_deref(), "position")?,
            years_of_experience: required_integer(
                self.years_of_experience.as_ref(),
                "yearsOfExperience",
            )?,
            location: required_text(self.location.as_deref(), "location")?,
            team_size: required_integer(self.team_size.as_ref(), "teamSize")?,
            salary: required_integer(self.salary.as_ref(), "salary")?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchProfilesPayload {
    pub position: Option<String>,
    pub years_of_experience: Option<IntegerInput>,
    pub location: Option<String>,
    pub team_size: Option<IntegerInput>,
}

impl SearchProfilesPayload {
    pub fn into_filters(self) -> Result<SearchFilters> {
        Ok(SearchFilters {
            position: self.position,
            years_of_experience: optional_integer(self.years_of_experience, "yearsOfExperience")?,
            location: self.location,
            team_size: optional_integer(self.team_size, "teamSize")?,
        })
    }
}

// An empty form field means "any".
fn optional_integer(value: Option<IntegerInput>, field: &str) -> Result<Option<i64>> {
    match value {
        None => Ok(None),
        Some(IntegerInput::Text(raw)) if raw.trim().is_empty() => Ok(None),
        Some(v) => v.to_i64(field).map(Some),
    }
}

/// A profile as shown to anonymous clients: no salary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub position: String,
    pub years_of_experience: i64,
    pub location: String,
    pub team_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for PublicProfile {
    fn from(value: Profile) -> Self {
        Self {
            id: value.id,
            position: value.position,
            years_of_experience: value.years_of_experience,
            location: value.location,
            team_size: value.team_size,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProfileResponse {
    pub success: bool,
    pub profile: PublicProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileListResponse {
    pub success: bool,
    pub count: usize,
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub profile: Profile,
    pub similarity: i64,
}

impl From<ScoredProfile> for SearchResultItem {
    fn from(value: ScoredProfile) -> Self {
        Self {
            profile: value.profile,
            similarity: value.similarity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchProfilesResponse {
    pub success: bool,
    pub count: usize,
    pub results: Vec<SearchResultItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: ProfileStats,
}
