use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/salaries.db";
pub const DEFAULT_PUBLIC_RPS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Production,
    Development,
}

impl RuntimeMode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => RuntimeMode::Production,
            _ => RuntimeMode::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, RuntimeMode::Production)
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub encryption_key: Option<String>,
    pub runtime_mode: RuntimeMode,
    pub admin_api_key: Option<String>,
    pub public_rps: u32,
}

// Secrets stay out of Debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_address", &self.server_address)
            .field("database_url", &self.database_url)
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "<redacted>"))
            .field("runtime_mode", &self.runtime_mode)
            .field("admin_api_key", &self.admin_api_key.as_ref().map(|_| "<redacted>"))
            .field("public_rps", &self.public_rps)
            .finish()
    }
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            database_url: get_env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            encryption_key: get_env_optional("ENCRYPTION_KEY"),
            runtime_mode: RuntimeMode::parse(&get_env_or("APP_ENV", "development")),
            admin_api_key: get_env_optional("ADMIN_API_KEY"),
            public_rps: match get_env_optional("PUBLIC_RPS") {
                Some(_) => get_env_parse("PUBLIC_RPS")?,
                None => DEFAULT_PUBLIC_RPS,
            },
        })
    }

    /// Development defaults with no secrets, useful for tools and tests.
    pub fn development() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            encryption_key: None,
            runtime_mode: RuntimeMode::Development,
            admin_api_key: None,
            public_rps: DEFAULT_PUBLIC_RPS,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or(name: &str, default: &str) -> String {
    get_env_optional(name).unwrap_or_else(|| default.to_string())
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
