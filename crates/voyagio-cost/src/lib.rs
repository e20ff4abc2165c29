// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trip cost estimation for the Voyagio workflow engine.
//!
//! This crate provides:
//! - **Estimator**: Pure range arithmetic over airfare, hotels, tours, and
//!   ground transport, with an agency commission applied to the high bound only
//! - **Commission policy**: A default rate plus a validated override band

pub mod estimate;

pub use estimate::{
    calculate, resolve_commission, COMMISSION_RANGE, CURRENCY, DEFAULT_COMMISSION_PCT, DISCLAIMER,
};
