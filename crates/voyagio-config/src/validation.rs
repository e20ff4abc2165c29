// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid log levels, non-empty paths, and the commission band.

use crate::diagnostic::ConfigError;
use crate::model::VoyagioConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Commission band accepted by the estimator, inclusive on both ends.
const COMMISSION_BAND: (f64, f64) = (10.0, 15.0);

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VoyagioConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate log_level is a known tracing level
    let level = config.service.log_level.trim();
    if !LOG_LEVELS.contains(&level) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{level}` is not one of: {}",
                LOG_LEVELS.join(", ")
            ),
        });
    }

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate gateway host is not empty and looks like an IP or hostname
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Port 0 would bind to an arbitrary port and make the gateway unreachable
    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must not be 0".to_string(),
        });
    }

    // An auth token that is set but blank would lock every request out
    if let Some(token) = &config.gateway.auth_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "gateway.auth_token must not be blank when set; omit it to disable auth"
                .to_string(),
        });
    }

    // Validate default commission stays within the agency band
    let pct = config.cost.default_commission_pct;
    let (band_low, band_high) = COMMISSION_BAND;
    if !(band_low..=band_high).contains(&pct) {
        errors.push(ConfigError::Validation {
            message: format!(
                "cost.default_commission_pct must be between {band_low} and {band_high}, got {pct}"
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
