pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::services::{cipher_service::Cipher, profile_service::ProfileService};

#[derive(Clone)]
pub struct AppState {
    pub profile_service: ProfileService,
}

impl AppState {
    pub fn new(profile_service: ProfileService) -> Self {
        Self { profile_service }
    }

    /// Resolve the cipher secret and open the profile store described by
    /// `config`. Fails when production runs without a secret.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let cipher = Cipher::from_config(config)?;
        let profile_service = ProfileService::connect(&config.database_url, cipher).await?;
        Ok(Self::new(profile_service))
    }
}
