#![allow(dead_code)]

use salary_compass::{
    models::profile::{NewProfile, Profile},
    services::{cipher_service::Cipher, profile_service::ProfileService},
};

pub const TEST_SECRET: &str = "integration-test-secret";

pub async fn memory_store() -> ProfileService {
    ProfileService::connect("sqlite::memory:", Cipher::new(TEST_SECRET))
        .await
        .expect("open in-memory store")
}

pub async fn seed(store: &ProfileService, rows: &[(&str, i64, &str, i64, i64)]) -> Vec<Profile> {
    let mut created = Vec::with_capacity(rows.len());
    for &(position, years, location, team, salary) in rows {
        created.push(
            store
                .create(NewProfile::new(position, years, location, team, salary))
                .await
                .expect("create profile"),
        );
    }
    created
}

pub const SAMPLE: &[(&str, i64, &str, i64, i64)] = &[
    ("Product Manager", 3, "Paris", 2, 55000),
    ("Product Manager", 5, "Paris", 3, 65000),
    ("Product Manager", 4, "Paris", 2, 60000),
    ("Product Manager", 6, "Lyon", 4, 58000),
    ("Product Manager", 7, "Paris", 5, 72000),
    ("Senior Product Manager", 8, "Paris", 6, 85000),
    ("Senior Product Manager", 10, "Paris", 8, 95000),
    ("Senior Product Manager", 9, "Lyon", 5, 80000),
    ("Lead Product Manager", 12, "Paris", 12, 110000),
    ("Head of Product", 15, "Paris", 20, 140000),
    ("CPO", 20, "Paris", 40, 200000),
    ("CPO", 22, "Lyon", 50, 230000),
    ("Junior Product Manager", 1, "Paris", 0, 42000),
    ("Junior Product Manager", 2, "Toulouse", 1, 45000),
];
