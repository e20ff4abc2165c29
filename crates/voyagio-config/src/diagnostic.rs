// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge for voyagio.toml.
//!
//! Turns Figment deserialization failures into miette diagnostics with
//! source spans into the offending TOML, Jaro-Winkler "did you mean?"
//! suggestions, and section-aware hints: a key that is valid in another
//! section (say `auth_token` placed under `[service]`) is pointed at its
//! home section instead of being reported as a plain typo.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches the typos travelers' operators actually make
/// (`log_levl`, `auth_tokn`, `database_pth`) while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// The full voyagio.toml key layout, section by section.
///
/// Kept in sync with the structs in [`crate::model`]; used to route
/// misplaced keys to their home section.
const CONFIG_SCHEMA: &[(&str, &[&str])] = &[
    ("service", &["name", "log_level"]),
    ("storage", &["database_path", "wal_mode"]),
    ("gateway", &["enabled", "host", "port", "auth_token"]),
    ("cost", &["default_commission_pct"]),
];

/// The section whose schema contains `key` verbatim, if any.
fn home_section(key: &str) -> Option<&'static str> {
    CONFIG_SCHEMA
        .iter()
        .find(|(_, keys)| keys.contains(&key))
        .map(|&(section, _)| section)
}

/// A configuration error with rich diagnostic information.
///
/// Each variant carries enough context for miette to render an Elm-style
/// error message with source spans, suggestions, and valid key listings.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(voyagio::config::unknown_key),
        help("{}", unknown_key_help(key, suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
        /// Source span for the offending key.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The source file content for context display.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(voyagio::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// The key with the wrong type.
        key: String,
        /// Description of the type mismatch.
        detail: String,
        /// What type was expected.
        expected: String,
        /// Source span for the offending value.
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        /// The source file content.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(voyagio::config::missing_key),
        help("add `{key} = <value>` to your voyagio.toml")
    )]
    MissingKey {
        /// The missing key name.
        key: String,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(voyagio::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(voyagio::config::other))]
    Other(String),
}

/// Help text for an unknown key: typo suggestion first, then the
/// misplaced-section hint, then the bare key listing.
fn unknown_key_help(key: &str, suggestion: Option<&str>, valid_keys: &str) -> String {
    if let Some(s) = suggestion {
        return format!("did you mean `{s}`? Valid keys: {valid_keys}");
    }
    if let Some(section) = home_section(key) {
        return format!("`{key}` belongs under [{section}]. Valid keys here: {valid_keys}");
    }
    format!("valid keys: {valid_keys}")
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// A single figment error can carry several underlying failures; each is
/// converted on its own, so one bad voyagio.toml surfaces every problem
/// in one pass instead of one per restart.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert_error(error, toml_sources))
        .collect()
}

fn convert_error(error: figment::error::Error, toml_sources: &[(String, String)]) -> ConfigError {
    use figment::error::Kind;

    let dotted_path = || {
        error
            .path
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    };

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let valid: Vec<&str> = expected.to_vec();
            let (span, src) = locate_in_sources(&error, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, &valid),
                valid_keys: valid.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.clone().into_owned(),
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: dotted_path(),
            detail: format!("found {actual}, expected {expected}"),
            expected: expected.to_string(),
            span: None,
            src: None,
        },
        Kind::InvalidValue(actual, expected) => ConfigError::Validation {
            message: format!("invalid value for `{}`: found {actual}, expected {expected}", dotted_path()),
        },
        _ => ConfigError::Other(format!("{error}")),
    }
}

/// Resolve the span of `field` in whichever loaded TOML file the error
/// points at.
fn locate_in_sources(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(figment::Source::File(path)) = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
    else {
        return (None, None);
    };
    let path = path.display().to_string();

    let Some((_, content)) = toml_sources.iter().find(|(p, _)| *p == path) else {
        return (None, None);
    };

    let section = error.path.first().map(|s| s.to_string());
    match key_offset(content, section.as_deref(), field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `key` inside `section` of a TOML document.
///
/// Walks the document line by line, tracking the section each line lives
/// in, so a key name that also appears under a different section header
/// is never matched by mistake. `section = None` means the top level,
/// before any `[header]`.
pub fn key_offset(content: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut current_section: Option<&str> = None;
    let mut offset = 0;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current_section = header
                .trim_start_matches('[')
                .split(']')
                .next()
                .map(str::trim);
        } else if current_section == section
            && let Some(rest) = trimmed.strip_prefix(key)
        {
            // Require a delimiter so `port` does not match `port_max`.
            if rest.starts_with('=') || rest.starts_with(' ') || rest.starts_with('\t') {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len() + 1; // +1 for newline
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
///
/// Returns the best match above the similarity threshold, or `None` if
/// no valid key is close enough to the unknown key.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|&(_, score)| score > SUGGESTION_THRESHOLD)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(key, _)| key.to_string())
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    let mut out = String::new();
    for error in errors {
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut out, diagnostic).is_err() {
            out.push_str(&format!("Error: {error}\n"));
        }
    }
    eprint!("{out}");
}
