//! Load the sample product-management profiles into the configured database.

use salary_compass::{
    config::{get_config, init_config},
    error::Error,
    models::profile::NewProfile,
    AppState,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const SAMPLE_PROFILES: &[(&str, i64, &str, i64, i64)] = &[
    ("Product Manager", 3, "Paris", 2, 55000),
    ("Product Manager", 5, "Paris", 3, 65000),
    ("Product Manager", 4, "Paris", 2, 60000),
    ("Product Manager", 6, "Lyon", 4, 58000),
    ("Product Manager", 7, "Paris", 5, 72000),
    ("Senior Product Manager", 8, "Paris", 6, 85000),
    ("Senior Product Manager", 10, "Paris", 8, 95000),
    ("Senior Product Manager", 9, "Lyon", 5, 80000),
    ("Senior Product Manager", 12, "Paris", 10, 105000),
    ("Senior Product Manager", 11, "Toulouse", 7, 88000),
    ("Lead Product Manager", 12, "Paris", 12, 110000),
    ("Lead Product Manager", 14, "Paris", 15, 125000),
    ("Lead Product Manager", 13, "Lyon", 10, 105000),
    ("Lead Product Manager", 15, "Paris", 18, 135000),
    ("Head of Product", 15, "Paris", 20, 140000),
    ("Head of Product", 18, "Paris", 25, 165000),
    ("Head of Product", 16, "Lyon", 18, 135000),
    ("Head of Product", 20, "Paris", 30, 180000),
    ("CPO", 20, "Paris", 40, 200000),
    ("CPO", 22, "Paris", 50, 230000),
    ("Product Manager", 4, "Marseille", 2, 52000),
    ("Product Manager", 5, "Nantes", 3, 54000),
    ("Product Manager", 6, "Bordeaux", 4, 57000),
    ("Senior Product Manager", 9, "Marseille", 6, 75000),
    ("Senior Product Manager", 10, "Nantes", 7, 78000),
    ("Senior Product Manager", 11, "Bordeaux", 8, 82000),
    ("Junior Product Manager", 1, "Paris", 0, 42000),
    ("Junior Product Manager", 2, "Paris", 0, 48000),
    ("Junior Product Manager", 1, "Lyon", 0, 40000),
    ("Junior Product Manager", 2, "Toulouse", 1, 45000),
];

fn sample_profiles() -> Vec<NewProfile> {
    SAMPLE_PROFILES
        .iter()
        .map(|&(position, years, location, team, salary)| {
            NewProfile::new(position, years, location, team, salary)
        })
        .collect()
}

/// Field names of a validation failure. Validator messages echo the rejected
/// value and must not reach the log.
fn rejected_fields(err: &Error) -> Vec<String> {
    let mut fields: Vec<String> = match err {
        Error::Validation(errors) => errors.field_errors().keys().map(|k| k.to_string()).collect(),
        _ => Vec::new(),
    };
    fields.sort();
    fields
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    init_config()?;
    let state = AppState::from_config(get_config()).await?;
    let store = state.profile_service;

    info!("Starting database seeding");
    let mut success = 0usize;
    let mut failed = 0usize;
    for profile in sample_profiles() {
        match store.create(profile).await {
            Ok(created) => {
                info!(position = %created.position, location = %created.location, "created profile");
                success += 1;
            }
            Err(e) => {
                error!(
                    validation = e.is_validation(),
                    persistence = e.is_persistence(),
                    fields = ?rejected_fields(&e),
                    "failed to create profile"
                );
                failed += 1;
            }
        }
    }

    info!(success, failed, total = SAMPLE_PROFILES.len(), "seeding completed");
    store.close().await;

    if failed > 0 {
        anyhow::bail!("{} profiles could not be seeded", failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn rejected_fields_names_fields_without_values() {
        let bad = NewProfile::new("", 5, "Paris", 3, -987654);
        let err = Error::from(bad.validate().unwrap_err());

        let fields = rejected_fields(&err);
        assert_eq!(fields, vec!["position".to_string(), "salary".to_string()]);
        assert!(!format!("{:?}", fields).contains("987654"));
    }

    #[test]
    fn rejected_fields_is_empty_for_other_errors() {
        assert!(rejected_fields(&Error::Internal("boom".to_string())).is_empty());
    }

    #[test]
    fn every_sample_profile_is_valid() {
        for profile in sample_profiles() {
            assert!(profile.validate().is_ok(), "{:?}", profile);
        }
    }
}
