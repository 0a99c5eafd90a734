use serde::Serialize;

use crate::models::profile::Profile;
use crate::models::search_filters::SearchFilters;

pub const POSITION_MATCH: i64 = 100;
pub const LOCATION_MATCH: i64 = 75;
pub const EXPERIENCE_MAX: i64 = 50;
pub const EXPERIENCE_PENALTY_PER_YEAR: i64 = 10;
pub const TEAM_SIZE_MAX: i64 = 25;
pub const TEAM_SIZE_PENALTY_PER_MEMBER: i64 = 2;

/// Similarity of `profile` to `filters`. Only plaintext dimensions take part;
/// absent filters contribute nothing and proximity terms floor at zero.
pub fn score(profile: &Profile, filters: &SearchFilters) -> i64 {
    let mut score = 0;

    if filters
        .position_term()
        .is_some_and(|position| profile.position == position)
    {
        score += POSITION_MATCH;
    }

    if let Some(years) = filters.years_of_experience {
        let diff = profile.years_of_experience.abs_diff(years);
        score += proximity(EXPERIENCE_MAX, EXPERIENCE_PENALTY_PER_YEAR, diff);
    }

    if filters
        .location_term()
        .is_some_and(|location| profile.location == location)
    {
        score += LOCATION_MATCH;
    }

    if let Some(team_size) = filters.team_size {
        let diff = profile.team_size.abs_diff(team_size);
        score += proximity(TEAM_SIZE_MAX, TEAM_SIZE_PENALTY_PER_MEMBER, diff);
    }

    score
}

fn proximity(max: i64, penalty: i64, diff: u64) -> i64 {
    let diff = i64::try_from(diff).unwrap_or(i64::MAX);
    max.saturating_sub(diff.saturating_mul(penalty)).max(0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredProfile {
    pub profile: Profile,
    pub similarity: i64,
}

/// Score and stable-sort descending; equal scores keep their input order.
pub fn rank(profiles: Vec<Profile>, filters: &SearchFilters) -> Vec<ScoredProfile> {
    let mut scored: Vec<ScoredProfile> = profiles
        .into_iter()
        .map(|profile| {
            let similarity = score(&profile, filters);
            ScoredProfile {
                profile,
                similarity,
            }
        })
        .collect();
    scored.sort_by(|a, b| b.similarity.cmp(&a.similarity));
    scored
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
            salary: 60_000,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn no_filters_scores_zero() {
        assert_eq!(score(&profile("CPO", 20, "Paris", 40), &SearchFilters::default()), 0);
    }

    #[test]
    fn weights_match_reference_scenario() {
        let filters = SearchFilters::default()
            .position("Product Manager")
            .years_of_experience(5)
            .location("Paris");
        assert_eq!(score(&profile("Product Manager", 5, "Paris", 3), &filters), 225);
        assert_eq!(score(&profile("Product Manager", 3, "Paris", 2), &filters), 205);
    }

    #[test]
    fn proximity_terms_floor_at_zero() {
        let filters = SearchFilters::default().years_of_experience(0).team_size(0);
        assert_eq!(score(&profile("CPO", 5, "Paris", 13), &filters), 0);
        assert_eq!(score(&profile("CPO", 4, "Paris", 12), &filters), 10 + 1);
        assert_eq!(score(&profile("CPO", 0, "Paris", 0), &filters), 50 + 25);
    }

    #[test]
    fn mismatched_categories_contribute_nothing() {
        let filters = SearchFilters::default().position("CPO").location("Lyon");
        assert_eq!(score(&profile("CPO", 1, "Paris", 1), &filters), 100);
        assert_eq!(score(&profile("Head of Product", 1, "Lyon", 1), &filters), 75);
    }

    #[test]
    fn closer_profiles_never_score_lower() {
        let filters = SearchFilters::default()
            .position("Product Manager")
            .years_of_experience(6)
            .location("Paris")
            .team_size(4);
        let close = profile("Product Manager", 6, "Paris", 4);
        let far = profile("Product Manager", 8, "Paris", 9);
        assert!(score(&close, &filters) >= score(&far, &filters));
    }

    #[test]
    fn extreme_differences_saturate() {
        let filters = SearchFilters::default().years_of_experience(i64::MIN).team_size(i64::MAX);
        assert_eq!(score(&profile("CPO", i64::MAX, "Paris", i64::MIN), &filters), 0);
    }

    #[test]
    fn ranking_is_stable_for_equal_scores() {
        let filters = SearchFilters::default().location("Paris");
        let first = profile("A", 1, "Lyon", 1);
        let second = profile("B", 1, "Paris", 1);
        let third = profile("C", 1, "Lyon", 1);
        let ranked = rank(vec![first.clone(), second.clone(), third.clone()], &filters);
        let ids: Vec<_> = ranked.iter().map(|s| s.profile.id).collect();
        assert_eq!(ids, vec![second.id, first.id, third.id]);
        assert_eq!(ranked[0].similarity, 75);
    }
}
