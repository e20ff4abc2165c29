// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `voyagio estimate` command implementation.
//!
//! Reads an itemized cost input as JSON from a file or stdin, runs the
//! estimator, and prints the estimate to stdout as pretty JSON.

use std::io::Read;
use std::path::Path;

use voyagio_core::{CostEstimateInput, VoyagioError};

/// Run the `voyagio estimate` command.
///
/// When `input` is `None`, the JSON document is read from stdin.
pub fn run_estimate(input: Option<&Path>) -> Result<(), VoyagioError> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            VoyagioError::Validation {
                field: "input".to_string(),
                message: format!("cannot read {}: {e}", path.display()),
            }
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| VoyagioError::Internal(format!("failed to read stdin: {e}")))?;
            buf
        }
    };

    let parsed: CostEstimateInput =
        serde_json::from_str(&raw).map_err(|e| VoyagioError::Validation {
            field: "input".to_string(),
            message: format!("invalid cost input JSON: {e}"),
        })?;

    let estimate = voyagio_cost::calculate(&parsed)?;

    let rendered = serde_json::to_string_pretty(&estimate)
        .map_err(|e| VoyagioError::Internal(format!("failed to serialize estimate: {e}")))?;
    println!("{rendered}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "airfare": { "low": 400, "high": 600 },
        "hotels": [
            { "nights": 3, "nightly_low": 100, "nightly_high": 150 }
        ]
    }"#;

    #[test]
    fn estimate_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, SAMPLE).unwrap();
        run_estimate(Some(&path)).unwrap();
    }

    #[test]
    fn missing_file_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = run_estimate(Some(&path)).unwrap_err();
        assert!(matches!(err, VoyagioError::Validation { ref field, .. } if field == "input"));
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = run_estimate(Some(&path)).unwrap_err();
        assert!(matches!(err, VoyagioError::Validation { ref field, .. } if field == "input"));
    }

    #[test]
    fn out_of_band_commission_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commission.json");
        std::fs::write(
            &path,
            r#"{ "airfare": { "low": 400, "high": 600 }, "commission_pct": 20 }"#,
        )
        .unwrap();
        let err = run_estimate(Some(&path)).unwrap_err();
        assert!(
            matches!(err, VoyagioError::Validation { ref field, .. } if field == "commission_pct")
        );
    }
}
