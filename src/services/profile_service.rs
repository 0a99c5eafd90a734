use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::pool::{create_pool, run_migrations};
use crate::error::{Error, Result};
use crate::models::profile::{NewProfile, Profile, ProfileRow};
use crate::models::search_filters::SearchFilters;
use crate::services::cipher_service::Cipher;
use crate::services::query_builder::ProfileQuery;
use crate::services::similarity::{rank, ScoredProfile};
use crate::utils::{time, validation};

/// Encrypted profile store.
///
/// Non-sensitive columns are stored in plaintext for filtering and
/// aggregation; the salary is only ever persisted through [`Cipher::encrypt`].
#[derive(Clone)]
pub struct ProfileService {
    pool: SqlitePool,
    cipher: Cipher,
    decryption_failures: Arc<AtomicU64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub total_profiles: i64,
    pub positions: BTreeSet<String>,
    pub locations: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: Vec<ScoredProfile>,
    /// Ids of candidate rows excluded because they could not be decoded.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListOutcome {
    pub profiles: Vec<Profile>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Default)]
struct RowDecryption {
    profiles: Vec<Profile>,
    skipped: Vec<String>,
}

impl ProfileService {
    pub fn new(pool: SqlitePool, cipher: Cipher) -> Self {
        Self {
            pool,
            cipher,
            decryption_failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Open the database at `database_url`, create the schema if absent and
    /// return a ready store. Pair with [`ProfileService::close`].
    pub async fn connect(database_url: &str, cipher: Cipher) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        tracing::info!(key_id = %cipher.key_id(), "profile store ready");
        Ok(Self::new(pool, cipher))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn cipher(&self) -> &Cipher {
        &self.cipher
    }

    /// Rows excluded from reads because they could not be decoded, since
    /// this store was constructed.
    pub fn decryption_failures(&self) -> u64 {
        self.decryption_failures.load(Ordering::Relaxed)
    }

    pub async fn create(&self, input: NewProfile) -> Result<Profile> {
        let input = input.normalized();
        validation::validate(&input)?;

        let id = Uuid::new_v4();
        let created_at = time::now();
        let salary_encrypted = self.cipher.encrypt(&input.salary.to_string())?;

        sqlx::query(
            r#"
            INSERT INTO profiles (id, position, years_of_experience, location, team_size, salary_encrypted, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.position)
        .bind(input.years_of_experience)
        .bind(&input.location)
        .bind(input.team_size)
        .bind(salary_encrypted)
        .bind(time::to_rfc3339(created_at))
        .execute(&self.pool)
        .await?;

        tracing::debug!(profile_id = %id, position = %input.position, "profile created");

        Ok(Profile {
            id,
            position: input.position,
            years_of_experience: input.years_of_experience,
            location: input.location,
            team_size: input.team_size,
            salary: input.salary,
            created_at,
        })
    }

    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Profile>> {
        let outcome = self.search_detailed(filters).await?;
        Ok(outcome.results.into_iter().map(|s| s.profile).collect())
    }

    /// Select the newest matching rows (capped), decrypt them, then rank the
    /// survivors by similarity.
    ///
    /// The recency cap is applied before ranking, so an older but closer
    /// match can fall outside the candidate set once more rows match than the
    /// cap allows.
    pub async fn search_detailed(&self, filters: &SearchFilters) -> Result<SearchOutcome> {
        let query = ProfileQuery::for_search(filters);
        let mut qb = query.to_builder();
        let rows = qb
            .build_query_as::<ProfileRow>()
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!(
            unfiltered = filters.is_empty(),
            candidates = rows.len(),
            "search candidates loaded"
        );

        let decoded = self.decrypt_rows(rows, "search");
        Ok(SearchOutcome {
            results: rank(decoded.profiles, filters),
            skipped: decoded.skipped,
        })
    }

    /// Every profile, newest first, with salaries. Administrative use only.
    pub async fn list(&self) -> Result<Vec<Profile>> {
        Ok(self.list_detailed().await?.profiles)
    }

    pub async fn list_detailed(&self) -> Result<ListOutcome> {
        let mut qb = ProfileQuery::all().to_builder();
        let rows = qb
            .build_query_as::<ProfileRow>()
            .fetch_all(&self.pool)
            .await?;

        let decoded = self.decrypt_rows(rows, "list");
        Ok(ListOutcome {
            profiles: decoded.profiles,
            skipped: decoded.skipped,
        })
    }

    /// Row count and distinct filter values. Never reads the salary column.
    pub async fn stats(&self) -> Result<ProfileStats> {
        let total_profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;

        let positions: Vec<String> = sqlx::query_scalar("SELECT DISTINCT position FROM profiles")
            .fetch_all(&self.pool)
            .await?;

        let locations: Vec<String> = sqlx::query_scalar("SELECT DISTINCT location FROM profiles")
            .fetch_all(&self.pool)
            .await?;

        Ok(ProfileStats {
            total_profiles,
            positions: positions.into_iter().collect(),
            locations: locations.into_iter().collect(),
        })
    }

    fn decrypt_rows(&self, rows: Vec<ProfileRow>, operation: &str) -> RowDecryption {
        let mut out = RowDecryption {
            profiles: Vec::with_capacity(rows.len()),
            skipped: Vec::new(),
        };

        for row in rows {
            let row_id = row.id.clone();
            match self.decode_row(row) {
                Ok(profile) => out.profiles.push(profile),
                Err(err) => {
                    tracing::debug!(profile_id = %row_id, error = %err, "row excluded");
                    out.skipped.push(row_id);
                }
            }
        }

        if !out.skipped.is_empty() {
            self.decryption_failures
                .fetch_add(out.skipped.len() as u64, Ordering::Relaxed);
            tracing::warn!(
                operation,
                skipped = out.skipped.len(),
                ids = ?out.skipped,
                key_id = %self.cipher.key_id(),
                "excluded rows that could not be decrypted"
            );
        }

        out
    }

    fn decode_row(&self, row: ProfileRow) -> Result<Profile> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::Internal(format!("corrupt profile id: {}", e)))?;
        let created_at = time::from_rfc3339(&row.created_at)
            .map_err(|e| Error::Internal(format!("corrupt created_at: {}", e)))?;

        let plaintext = self.cipher.decrypt(&row.salary_encrypted)?;
        let salary = plaintext
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| Error::Decryption("decrypted salary is not a positive integer".to_string()))?;

        Ok(Profile {
            id,
            position: row.position,
            years_of_experience: row.years_of_experience,
            location: row.location,
            team_size: row.team_size,
            salary,
            created_at,
        })
    }
}
