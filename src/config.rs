//! Dispatch configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `DISPATCH_FEE_RATE_PER_KM` - Delivery fee per kilometre (default: 100)
//! - `DISPATCH_WRITE_TIMEOUT_MS` - Bound on a single remote write (default: 10000)
//! - `DISPATCH_MAILBOX_CAPACITY` - Request buffer of each store collection (default: 32)

use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_FEE_RATE_PER_KM: i64 = 100;
const DEFAULT_WRITE_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAILBOX_CAPACITY: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Tunables for billing and store access.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    /// Linear delivery fee rate, in currency units per kilometre.
    pub fee_rate_per_km: Decimal,
    /// A write that neither succeeds nor fails within this bound counts as failed.
    pub write_timeout: Duration,
    /// Channel capacity of each document collection actor.
    pub mailbox_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            fee_rate_per_km: Decimal::from(DEFAULT_FEE_RATE_PER_KM),
            write_timeout: Duration::from_millis(DEFAULT_WRITE_TIMEOUT_MS),
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

impl DispatchConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or if the
    /// fee rate is negative or the capacity zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let fee_rate_per_km = parse_or("DISPATCH_FEE_RATE_PER_KM", &lookup, defaults.fee_rate_per_km)?;
        if fee_rate_per_km.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "DISPATCH_FEE_RATE_PER_KM".to_string(),
                "must not be negative".to_string(),
            ));
        }
        let write_timeout_ms = parse_or(
            "DISPATCH_WRITE_TIMEOUT_MS",
            &lookup,
            DEFAULT_WRITE_TIMEOUT_MS,
        )?;
        let mailbox_capacity = parse_or(
            "DISPATCH_MAILBOX_CAPACITY",
            &lookup,
            defaults.mailbox_capacity,
        )?;
        if mailbox_capacity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DISPATCH_MAILBOX_CAPACITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            fee_rate_per_km,
            write_timeout: Duration::from_millis(write_timeout_ms),
            mailbox_capacity,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if present, otherwise fall back to `default`.
fn parse_or<T>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
