//! Filter predicates over the plaintext profile columns.
//!
//! Every optional filter dimension becomes at most one [`Predicate`]; the
//! predicates are ANDed together and rendered with bound parameters only.

use sqlx::{QueryBuilder, Sqlite};

use crate::models::profile::Profile;
use crate::models::search_filters::SearchFilters;

pub const EXPERIENCE_WINDOW: i64 = 2;
pub const TEAM_SIZE_WINDOW: i64 = 5;
pub const SEARCH_CANDIDATE_LIMIT: i64 = 50;

const SELECT_PROFILES: &str = "SELECT id, position, years_of_experience, location, team_size, salary_encrypted, created_at FROM profiles";
const NEWEST_FIRST: &str = " ORDER BY created_at DESC, rowid DESC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Position,
    YearsOfExperience,
    Location,
    TeamSize,
}

impl Column {
    pub fn as_sql(self) -> &'static str {
        match self {
            Column::Position => "position",
            Column::YearsOfExperience => "years_of_experience",
            Column::Location => "location",
            Column::TeamSize => "team_size",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals { column: Column, value: String },
    /// Inclusive on both ends.
    Between { column: Column, low: i64, high: i64 },
}

impl Predicate {
    pub fn matches(&self, profile: &Profile) -> bool {
        match self {
            Predicate::Equals { column, value } => match column {
                Column::Position => profile.position == *value,
                Column::Location => profile.location == *value,
                Column::YearsOfExperience | Column::TeamSize => false,
            },
            Predicate::Between { column, low, high } => {
                let actual = match column {
                    Column::YearsOfExperience => profile.years_of_experience,
                    Column::TeamSize => profile.team_size,
                    Column::Position | Column::Location => return false,
                };
                (*low..=*high).contains(&actual)
            }
        }
    }

    fn push_to(&self, qb: &mut QueryBuilder<'static, Sqlite>) {
        match self {
            Predicate::Equals { column, value } => {
                qb.push(column.as_sql()).push(" = ").push_bind(value.clone());
            }
            Predicate::Between { column, low, high } => {
                qb.push(column.as_sql())
                    .push(" BETWEEN ")
                    .push_bind(*low)
                    .push(" AND ")
                    .push_bind(*high);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileQuery {
    predicates: Vec<Predicate>,
    limit: Option<i64>,
}

impl ProfileQuery {
    /// Every row, newest first, uncapped.
    pub fn all() -> Self {
        Self::default()
    }

    /// Candidate selection for a similarity search: the filter predicates,
    /// capped to the newest [`SEARCH_CANDIDATE_LIMIT`] matches.
    pub fn for_search(filters: &SearchFilters) -> Self {
        let mut predicates = Vec::new();

        if let Some(position) = filters.position_term() {
            predicates.push(Predicate::Equals {
                column: Column::Position,
                value: position.to_string(),
            });
        }
        if let Some(years) = filters.years_of_experience {
            predicates.push(Predicate::Between {
                column: Column::YearsOfExperience,
                low: years.saturating_sub(EXPERIENCE_WINDOW),
                high: years.saturating_add(EXPERIENCE_WINDOW),
            });
        }
        if let Some(location) = filters.location_term() {
            predicates.push(Predicate::Equals {
                column: Column::Location,
                value: location.to_string(),
            });
        }
        if let Some(team_size) = filters.team_size {
            predicates.push(Predicate::Between {
                column: Column::TeamSize,
                low: team_size.saturating_sub(TEAM_SIZE_WINDOW).max(0),
                high: team_size.saturating_add(TEAM_SIZE_WINDOW),
            });
        }

        Self {
            predicates,
            limit: Some(SEARCH_CANDIDATE_LIMIT),
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        self.predicates.iter().all(|p| p.matches(profile))
    }

    pub fn to_builder(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(SELECT_PROFILES);

        for (i, predicate) in self.predicates.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_to(&mut qb);
        }

        qb.push(NEWEST_FIRST);
        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
        qb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(position: &str, years: i64, location: &str, team: i64) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            position: position.into(),
            years_of_experience: years,
            location: location.into(),
            team_size: team,
            salary: 50_000,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn no_filters_selects_everything_with_cap() {
        let query = ProfileQuery::for_search(&SearchFilters::default());
        assert!(query.predicates().is_empty());
        let qb = query.to_builder();
        assert!(!qb.sql().contains("WHERE"));
        assert!(qb.sql().ends_with("ORDER BY created_at DESC, rowid DESC LIMIT ?"));
    }

    #[test]
    fn list_query_is_uncapped() {
        let qb = ProfileQuery::all().to_builder();
        assert!(!qb.sql().contains("LIMIT"));
        assert!(qb.sql().ends_with("ORDER BY created_at DESC, rowid DESC"));
    }

    #[test]
    fn every_dimension_becomes_one_bound_term() {
        let filters = SearchFilters::default()
            .position("Product Manager'; DROP TABLE profiles; --")
            .years_of_experience(5)
            .location("Paris")
            .team_size(3);
        let query = ProfileQuery::for_search(&filters);
        assert_eq!(query.predicates().len(), 4);

        let qb = query.to_builder();
        let sql = qb.sql();
        assert!(sql.contains(
            "WHERE position = ? AND years_of_experience BETWEEN ? AND ? AND location = ? AND team_size BETWEEN ? AND ?"
        ));
        assert!(!sql.contains("DROP TABLE"));
        assert!(!sql.contains("Paris"));
    }

    #[test]
    fn windows_follow_documented_bounds() {
        let query = ProfileQuery::for_search(
            &SearchFilters::default().years_of_experience(5).team_size(3),
        );
        assert_eq!(
            query.predicates(),
            &[
                Predicate::Between {
                    column: Column::YearsOfExperience,
                    low: 3,
                    high: 7
                },
                Predicate::Between {
                    column: Column::TeamSize,
                    low: 0,
                    high: 8
                },
            ]
        );
    }

    #[test]
    fn blank_strings_are_not_constraints() {
        let query = ProfileQuery::for_search(&SearchFilters::default().position("  ").location(""));
        assert!(query.predicates().is_empty());
    }

    #[test]
    fn in_memory_evaluation_matches_window_rules() {
        let query = ProfileQuery::for_search(
            &SearchFilters::default()
                .position("CPO")
                .years_of_experience(20)
                .team_size(40),
        );
        assert!(query.matches(&profile("CPO", 22, "Paris", 45)));
        assert!(query.matches(&profile("CPO", 18, "Lyon", 35)));
        assert!(!query.matches(&profile("CPO", 23, "Paris", 40)));
        assert!(!query.matches(&profile("CPO", 20, "Paris", 46)));
        assert!(!query.matches(&profile("Head of Product", 20, "Paris", 40)));
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let query = ProfileQuery::for_search(
            &SearchFilters::default()
                .years_of_experience(i64::MAX)
                .team_size(i64::MIN),
        );
        assert_eq!(query.predicates().len(), 2);
    }
}
