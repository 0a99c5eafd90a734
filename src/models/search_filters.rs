use serde::{Deserialize, Serialize};

/// Optional query dimensions for a similarity search. An absent field places
/// no constraint on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub position: Option<String>,
    pub years_of_experience: Option<i64>,
    pub location: Option<String>,
    pub team_size: Option<i64>,
}

impl SearchFilters {
    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn years_of_experience(mut self, years: i64) -> Self {
        self.years_of_experience = Some(years);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn team_size(mut self, team_size: i64) -> Self {
        self.team_size = Some(team_size);
        self
    }

    /// Blank strings count as "no constraint".
    pub fn position_term(&self) -> Option<&str> {
        non_blank(self.position.as_deref())
    }

    pub fn location_term(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.position_term().is_none()
            && self.years_of_experience.is_none()
            && self.location_term().is_none()
            && self.team_size.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
