//! Field-level encryption for the sensitive salary column.
//!
//! AES-256-GCM with a fresh 96-bit nonce per value. The 32-byte key is the
//! SHA-256 digest of the configured secret.
//!
//! Stored format: `v1:` followed by standard base64 of `nonce || ciphertext+tag`.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::error::{Error, Result};

const FORMAT_PREFIX: &str = "v1:";
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Never protects real data. Only used outside production when no secret is
/// configured.
pub const DEVELOPMENT_FALLBACK_KEY: &str = "dev-key-only-for-local-development-change-in-prod";

#[derive(Clone)]
pub struct Cipher {
    aead: Aes256Gcm,
    key_id: String,
    fallback: bool,
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher")
            .field("key_id", &self.key_id)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl Cipher {
    pub fn new(secret: &str) -> Self {
        Self::build(secret, false)
    }

    pub fn development_fallback() -> Self {
        Self::build(DEVELOPMENT_FALLBACK_KEY, true)
    }

    /// Resolve the cipher secret from configuration.
    ///
    /// A missing secret is fatal in production. Anywhere else the fallback key
    /// is used and a warning is emitted.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.encryption_key.as_deref() {
            Some(secret) => Ok(Self::new(secret)),
            None if config.runtime_mode.is_production() => Err(Error::Config(
                "ENCRYPTION_KEY must be set in production".to_string(),
            )),
            None => {
                let cipher = Self::development_fallback();
                tracing::warn!(
                    key_id = %cipher.key_id(),
                    "ENCRYPTION_KEY is not set; using the development fallback key. DO NOT USE IN PRODUCTION"
                );
                Ok(cipher)
            }
        }
    }

    fn build(secret: &str, fallback: bool) -> Self {
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&Sha256::digest(secret.as_bytes()));
        let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
        let fingerprint = hex::encode(&Sha256::digest(key.as_slice())[..4]);
        let key_id = if fallback {
            format!("insecure-dev-{}", fingerprint)
        } else {
            format!("key-{}", fingerprint)
        };
        Self {
            aead,
            key_id,
            fallback,
        }
    }

    /// Non-secret label identifying the active key in logs.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .aead
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| Error::Internal("encryption failed".to_string()))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(format!("{}{}", FORMAT_PREFIX, STANDARD.encode(out)))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let body = encoded
            .strip_prefix(FORMAT_PREFIX)
            .ok_or_else(|| Error::Decryption("unrecognised ciphertext format".to_string()))?;
        let data = STANDARD
            .decode(body)
            .map_err(|e| Error::Decryption(format!("invalid base64: {}", e)))?;
        if data.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::Decryption("ciphertext too short".to_string()));
        }

        let (nonce, ciphertext) = data.split_at(NONCE_LEN);
        let plaintext = Zeroizing::new(
            self.aead
                .decrypt(Nonce::from_slice(nonce), ciphertext)
                .map_err(|_| {
                    Error::Decryption("authentication failed (wrong key or tampered value)".to_string())
                })?,
        );

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| Error::Decryption("plaintext is not valid UTF-8".to_string()))
    }

    /// One-way digest for equality lookups over sensitive values.
    pub fn hash(value: &str) -> String {
        hex::encode(Sha256::digest(value.as_bytes()))
    }
}
