// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Argon2 password hashing.
//!
//! Hashes are stored as PHC strings with a random salt per password. A hash
//! starting with [`UNUSABLE_PASSWORD_PREFIX`] marks an account without a
//! usable password; it never verifies.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{self, rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};
use rand::RngCore;
use std::env;

pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

/// Configuration for password hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashConfig {
    pub algorithm: String,
    pub version: String,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            algorithm: "Argon2id".to_string(),
            version: "V0x13".to_string(),
        }
    }
}

impl HashConfig {
    /// Load hash configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            algorithm: env::var("PASSWORD_HASH_ALGORITHM").unwrap_or(defaults.algorithm),
            version: env::var("PASSWORD_HASH_VERSION").unwrap_or(defaults.version),
        }
    }
}

/// Argon2 hasher for user passwords.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(config: &HashConfig) -> Result<Self> {
        let algorithm = match config.algorithm.as_str() {
            "Argon2d" => Algorithm::Argon2d,
            "Argon2i" => Algorithm::Argon2i,
            "Argon2id" => Algorithm::Argon2id,
            other => return Err(anyhow!("Unknown argon2 algorithm: {}", other)),
        };

        let version = match config.version.as_str() {
            "V0x10" => Version::V0x10,
            "V0x13" => Version::V0x13,
            other => return Err(anyhow!("Unknown argon2 version: {}", other)),
        };

        Ok(Self {
            argon2: Argon2::new(algorithm, version, Params::DEFAULT),
        })
    }

    /// Hash a raw password into a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    /// Check a raw password against a stored hash.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if !is_usable(hash) {
            return false;
        }
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Marker stored for accounts created without a password.
pub fn unusable_password() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", UNUSABLE_PASSWORD_PREFIX, hex::encode(bytes))
}

pub fn is_usable(hash: &str) -> bool {
    !hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

/// Short description of a stored hash for the admin edit view.
pub fn summarize(hash: &str) -> String {
    if !is_usable(hash) {
        return "No password set.".to_string();
    }
    match PasswordHash::new(hash) {
        Ok(parsed) => format!(
            "algorithm: {} version: {}",
            parsed.algorithm,
            parsed.version.map(|v| v.to_string()).unwrap_or_default()
        ),
        Err(_) => "Invalid password format or unknown hashing algorithm.".to_string(),
    }
}
