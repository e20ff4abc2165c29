// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./voyagio.toml` > `~/.config/voyagio/voyagio.toml` > `/etc/voyagio/voyagio.toml`
//! with environment variable overrides via `VOYAGIO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VoyagioConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/voyagio/voyagio.toml` (system-wide)
/// 3. `~/.config/voyagio/voyagio.toml` (user XDG config)
/// 4. `./voyagio.toml` (local directory)
/// 5. `VOYAGIO_*` environment variables
pub fn load_config() -> Result<VoyagioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoyagioConfig::default()))
        .merge(Toml::file("/etc/voyagio/voyagio.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("voyagio/voyagio.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("voyagio.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<VoyagioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoyagioConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// Backs the `--config <path>` CLI flag, bypassing the XDG hierarchy.
pub fn load_config_from_path(path: &Path) -> Result<VoyagioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoyagioConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `VOYAGIO_GATEWAY_AUTH_TOKEN` must
/// map to `gateway.auth_token`, not `gateway.auth.token`.
fn env_provider() -> Env {
    Env::prefixed("VOYAGIO_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
///
/// Example: `VOYAGIO_STORAGE_DATABASE_PATH` arrives as `storage_database_path`
/// and maps to `storage.database_path`.
fn map_env_key(key: &str) -> String {
    key.replacen("service_", "service.", 1)
        .replacen("storage_", "storage.", 1)
        .replacen("gateway_", "gateway.", 1)
        .replacen("cost_", "cost.", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_section_dot_field() {
        assert_eq!(map_env_key("service_log_level"), "service.log_level");
        assert_eq!(
            map_env_key("storage_database_path"),
            "storage.database_path"
        );
        assert_eq!(map_env_key("gateway_auth_token"), "gateway.auth_token");
        assert_eq!(
            map_env_key("cost_default_commission_pct"),
            "cost.default_commission_pct"
        );
    }

    #[test]
    fn env_key_mapping_splits_only_the_section() {
        // Only the first section prefix becomes a dot; later underscores survive.
        assert_eq!(map_env_key("gateway_host"), "gateway.host");
        assert_ne!(map_env_key("gateway_auth_token"), "gateway.auth.token");
    }
}
