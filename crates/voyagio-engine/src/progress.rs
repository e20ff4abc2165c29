// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort progress reporting for long-running pipeline steps.
//!
//! Progress is advisory telemetry for pollers. A failed progress write
//! must never fail the pipeline step that emitted it, so every update is
//! swallow-and-log. Completion is not stored: it is derived from the
//! trip's phase at read time, which keeps the flag correct even when a
//! progress write was lost.

use std::sync::Arc;

use tracing::warn;

use voyagio_core::types::{ProgressReport, Trip, TripProgress};
use voyagio_core::{TripPhase, TripStore};

/// The fixed milestone ladder: step name, percent, poller-facing message.
///
/// Percentages are non-decreasing down the ladder; pipelines emit steps
/// in ladder order within a single run.
pub const LADDER: &[(&str, u8, &str)] = &[
    ("intake", 10, "Trip created, intake captured"),
    ("research", 40, "Destination research complete"),
    ("options", 70, "Trip options generated"),
    ("finalizing", 95, "Building the day-by-day itinerary"),
    ("complete", 100, "Planning complete"),
];

/// Writes milestone updates and assembles poller reports.
pub struct ProgressTracker {
    store: Arc<dyn TripStore>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    /// Record a milestone for a trip, best-effort.
    ///
    /// Unknown step names and storage failures are logged and dropped;
    /// callers never see an error from here.
    pub async fn record(&self, trip_id: &str, step: &str) {
        let Some(&(name, percent, message)) = LADDER.iter().find(|(name, _, _)| *name == step)
        else {
            warn!(trip_id, step, "progress step not on the ladder, dropping");
            return;
        };
        self.update(
            trip_id,
            TripProgress {
                step: name.to_string(),
                message: message.to_string(),
                percent,
            },
        )
        .await;
    }

    /// Write an arbitrary progress snapshot for a trip, best-effort.
    ///
    /// Percents above 100 are clamped. A percent lower than the stored one
    /// is written as-is: progress is advisory and the last writer wins, so
    /// out-of-order updates from overlapping steps must not be rejected.
    pub async fn update(&self, trip_id: &str, mut progress: TripProgress) {
        if progress.percent > 100 {
            warn!(
                trip_id,
                step = %progress.step,
                percent = progress.percent,
                "progress percent above 100, clamping"
            );
            progress.percent = 100;
        }
        match self.store.set_progress(trip_id, &progress).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(trip_id, step = %progress.step, "progress update hit a missing trip");
            }
            Err(err) => warn!(trip_id, step = %progress.step, %err, "progress update failed"),
        }
    }

    /// Assemble the poller-facing report from a trip snapshot.
    ///
    /// `complete` is derived from phase, not from the stored percent, so
    /// a trip whose final progress write was lost still reports done.
    pub fn report(trip: &Trip) -> ProgressReport {
        let complete = TripPhase::of(trip).is_at_least(TripPhase::Phase2OptionsReady);
        ProgressReport {
            step: trip.progress.step.clone(),
            message: trip.progress.message.clone(),
            percent: if complete { 100 } else { trip.progress.percent },
            complete,
        }
    }
}
