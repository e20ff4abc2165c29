// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `voyagio status` command implementation.
//!
//! Probes the gateway's public health endpoint and, when a bearer token
//! is configured, the trip listing behind it, then reports service state
//! plus a per-status trip tally. Falls back gracefully when the gateway
//! is unreachable or the listing is unauthorized.

use std::io::IsTerminal;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use voyagio_config::model::VoyagioConfig;
use voyagio_core::{TripStatus, VoyagioError};

/// Health endpoint response from the gateway.
#[derive(Debug, Deserialize)]
struct HealthProbe {
    status: String,
    version: String,
    uptime_secs: u64,
}

/// The slice of a trip listing row the tally needs.
#[derive(Debug, Deserialize)]
struct TripRow {
    status: TripStatus,
}

#[derive(Debug, Deserialize)]
struct TripListing {
    trips: Vec<TripRow>,
}

/// Per-status trip tally from the authenticated listing endpoint.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct TripCounts {
    pub total: usize,
    pub active: usize,
    pub quote_requested: usize,
    pub booked: usize,
}

impl TripCounts {
    fn tally(rows: &[TripRow]) -> TripCounts {
        let mut counts = TripCounts {
            total: rows.len(),
            ..TripCounts::default()
        };
        for row in rows {
            match row.status {
                TripStatus::Active => counts.active += 1,
                TripStatus::QuoteRequested => counts.quote_requested += 1,
                TripStatus::Booked => counts.booked += 1,
            }
        }
        counts
    }
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_human: Option<String>,
    pub endpoint: String,
    /// Absent when the gateway is down or no auth token is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trips: Option<TripCounts>,
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let (days, rem) = (secs / 86400, secs % 86400);
    let (hours, minutes) = (rem / 3600, rem % 3600 / 60);
    match (days, hours) {
        (0, 0) => format!("{minutes}m"),
        (0, _) => format!("{hours}h {minutes}m"),
        _ => format!("{days}d {hours}h {minutes}m"),
    }
}

/// One line summarizing the tally, for the human-readable report.
fn trips_line(counts: &TripCounts) -> String {
    format!(
        "{} total ({} active, {} awaiting quote, {} booked)",
        counts.total, counts.active, counts.quote_requested, counts.booked
    )
}

async fn probe_health(client: &reqwest::Client, base: &str) -> Option<HealthProbe> {
    let resp = client.get(format!("{base}/health")).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json().await.ok()
}

/// Fetch the trip tally through the authenticated listing route.
///
/// Any failure (no token, 401, parse error) yields `None`; status must
/// still report service health when the tally is unavailable.
async fn probe_trips(
    client: &reqwest::Client,
    base: &str,
    token: Option<&str>,
) -> Option<TripCounts> {
    let resp = client
        .get(format!("{base}/v1/trips"))
        .bearer_auth(token?)
        .send()
        .await
        .ok()?;
    if !resp.status().is_success() {
        return None;
    }
    let listing: TripListing = resp.json().await.ok()?;
    Some(TripCounts::tally(&listing.trips))
}

/// Run the `voyagio status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(
    config: &VoyagioConfig,
    json: bool,
    plain: bool,
) -> Result<(), VoyagioError> {
    let base = format!("http://{}:{}", config.gateway.host, config.gateway.port);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| VoyagioError::Internal(format!("failed to create HTTP client: {e}")))?;

    let health = probe_health(&client, &base).await;
    let trips = match health {
        Some(_) => probe_trips(&client, &base, config.gateway.auth_token.as_deref()).await,
        None => None,
    };

    let response = match health {
        Some(health) => StatusResponse {
            running: true,
            status: health.status,
            version: Some(health.version),
            uptime_human: Some(format_uptime(health.uptime_secs)),
            uptime_secs: Some(health.uptime_secs),
            endpoint: base,
            trips,
        },
        None => StatusResponse {
            running: false,
            status: "not running".to_string(),
            version: None,
            uptime_secs: None,
            uptime_human: None,
            endpoint: base,
            trips: None,
        },
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_report(&response, config.gateway.auth_token.is_some(), use_color);
    }

    Ok(())
}

/// Print the human-readable report with optional colors.
fn print_report(response: &StatusResponse, has_token: bool, use_color: bool) {
    println!();
    println!("  voyagio status");
    println!("  {}", "-".repeat(35));

    if response.running {
        let version = response.version.as_deref().unwrap_or("?");
        let uptime = response.uptime_human.as_deref().unwrap_or("?");
        if use_color {
            use colored::Colorize;
            println!(
                "    Gateway:  {} {} v{version} (uptime: {uptime})",
                "✓".green(),
                response.status.green(),
            );
        } else {
            println!(
                "    Gateway:  [OK] {} v{version} (uptime: {uptime})",
                response.status
            );
        }
        match &response.trips {
            Some(counts) => println!("    Trips:    {}", trips_line(counts)),
            None if has_token => println!("    Trips:    unavailable (listing request failed)"),
            None => println!("    Trips:    unavailable (no auth_token configured)"),
        }
        println!();
    } else {
        if use_color {
            use colored::Colorize;
            println!("    Gateway:  {} {}", "✗".red(), "not running".red());
        } else {
            println!("    Gateway:  [FAIL] not running");
        }
        println!("    Endpoint: {}/health", response.endpoint);
        println!();
        println!("  Start with: voyagio serve");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uptime_rolls_over_units() {
        assert_eq!(format_uptime(120), "2m");
        assert_eq!(format_uptime(3720), "1h 2m");
        assert_eq!(format_uptime(90060), "1d 1h 1m");
    }

    #[test]
    fn tally_counts_each_status() {
        let rows = vec![
            TripRow {
                status: TripStatus::Active,
            },
            TripRow {
                status: TripStatus::Active,
            },
            TripRow {
                status: TripStatus::QuoteRequested,
            },
            TripRow {
                status: TripStatus::Booked,
            },
        ];
        let counts = TripCounts::tally(&rows);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.quote_requested, 1);
        assert_eq!(counts.booked, 1);
    }

    #[test]
    fn tally_of_empty_listing_is_zero() {
        assert_eq!(TripCounts::tally(&[]), TripCounts::default());
    }

    #[test]
    fn trips_line_reads_naturally() {
        let counts = TripCounts {
            total: 3,
            active: 1,
            quote_requested: 1,
            booked: 1,
        };
        assert_eq!(
            trips_line(&counts),
            "3 total (1 active, 1 awaiting quote, 1 booked)"
        );
    }

    #[test]
    fn running_response_serializes_with_counts() {
        let response = StatusResponse {
            running: true,
            status: "ok".to_string(),
            version: Some("0.1.0".to_string()),
            uptime_secs: Some(3600),
            uptime_human: Some("1h 0m".to_string()),
            endpoint: "http://127.0.0.1:8080".to_string(),
            trips: Some(TripCounts {
                total: 2,
                active: 2,
                quote_requested: 0,
                booked: 0,
            }),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"running\":true"));
        assert!(json.contains("\"total\":2"));
    }

    #[test]
    fn offline_response_omits_optional_fields() {
        let response = StatusResponse {
            running: false,
            status: "not running".to_string(),
            version: None,
            uptime_secs: None,
            uptime_human: None,
            endpoint: "http://127.0.0.1:8080".to_string(),
            trips: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"running\":false"));
        assert!(!json.contains("uptime_secs"));
        assert!(!json.contains("trips"));
    }
}
