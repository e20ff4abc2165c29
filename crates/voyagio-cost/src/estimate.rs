// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Commissioned budget estimation from itemized price ranges.
//!
//! Commission headroom lands only on the upper bound:
//!
//! ```text
//! total.low  = subtotal.low
//! total.high = ceil(subtotal.high * (1 + commission_pct / 100))
//! ```
//!
//! The floor price advertised to the traveler never includes the
//! professional's margin; the ceiling always does.

use voyagio_core::error::VoyagioError;
use voyagio_core::types::{now_iso, CostEstimate, CostEstimateInput, LineItemRange, PriceRange};

/// Commission applied when the input omits one.
pub const DEFAULT_COMMISSION_PCT: f64 = 15.0;

/// Inclusive band of acceptable commission percentages.
pub const COMMISSION_RANGE: (f64, f64) = (10.0, 15.0);

/// Currency tag stamped on every estimate.
pub const CURRENCY: &str = "USD";

/// Disclaimer stamped on every estimate.
pub const DISCLAIMER: &str =
    "Estimated ranges only. Final pricing is confirmed by your travel professional at booking.";

/// Resolve and validate the commission percentage for an input.
///
/// `None` falls back to [`DEFAULT_COMMISSION_PCT`]. An explicit value
/// outside [10, 15] inclusive is a hard validation failure, not a clamp.
pub fn resolve_commission(requested: Option<f64>) -> Result<f64, VoyagioError> {
    let (min, max) = COMMISSION_RANGE;
    match requested {
        None => Ok(DEFAULT_COMMISSION_PCT),
        Some(pct) if (min..=max).contains(&pct) => Ok(pct),
        Some(pct) => Err(VoyagioError::Validation {
            field: "commission_pct".into(),
            message: format!("{pct} is outside the allowed range [{min}, {max}]"),
        }),
    }
}

/// Component-wise sum of a line-item list. Empty lists sum to (0, 0).
fn sum_line_items(items: &[LineItemRange]) -> PriceRange {
    items.iter().fold(PriceRange::ZERO, |acc, item| {
        acc.plus(PriceRange {
            low: item.price_low,
            high: item.price_high,
        })
    })
}

/// Compute a commissioned budget estimate from itemized ranges.
///
/// Deterministic and reproducible byte-for-byte for identical input;
/// the only non-deterministic output field is `computed_at`.
pub fn calculate(input: &CostEstimateInput) -> Result<CostEstimate, VoyagioError> {
    let commission_pct = resolve_commission(input.commission_pct)?;

    let hotels = input.hotels.iter().fold(PriceRange::ZERO, |acc, stay| {
        let nights = stay.nights as f64;
        acc.plus(PriceRange {
            low: stay.nightly_low * nights,
            high: stay.nightly_high * nights,
        })
    });
    let tours = sum_line_items(&input.tours);
    let transport = sum_line_items(&input.transport);

    let subtotal = input.airfare.plus(hotels).plus(tours).plus(transport);
    let total = PriceRange {
        low: subtotal.low,
        high: (subtotal.high * (1.0 + commission_pct / 100.0)).ceil(),
    };

    Ok(CostEstimate {
        airfare: input.airfare,
        hotels,
        tours,
        transport,
        subtotal,
        total,
        commission_pct,
        currency: CURRENCY.to_string(),
        disclaimer: DISCLAIMER.to_string(),
        computed_at: now_iso(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyagio_core::types::HotelStay;

    fn stay(nights: u32, low: f64, high: f64) -> HotelStay {
        HotelStay {
            name: None,
            nights,
            nightly_low: low,
            nightly_high: high,
        }
    }

    fn base_input() -> CostEstimateInput {
        CostEstimateInput {
            airfare: PriceRange {
                low: 400.0,
                high: 600.0,
            },
            hotels: vec![stay(3, 100.0, 150.0)],
            tours: vec![],
            transport: vec![],
            commission_pct: None,
        }
    }

    #[test]
    fn reference_breakdown() {
        // 3 nights at 100-150 plus 400-600 airfare, default commission.
        let estimate = calculate(&base_input()).expect("valid input");

        assert!((estimate.hotels.low - 300.0).abs() < f64::EPSILON);
        assert!((estimate.hotels.high - 450.0).abs() < f64::EPSILON);
        assert!((estimate.subtotal.low - 700.0).abs() < f64::EPSILON);
        assert!((estimate.subtotal.high - 1050.0).abs() < f64::EPSILON);
        assert!((estimate.total.low - 700.0).abs() < f64::EPSILON);
        assert!((estimate.total.high - 1208.0).abs() < f64::EPSILON);
        assert!((estimate.commission_pct - 15.0).abs() < f64::EPSILON);
        assert_eq!(estimate.currency, "USD");
    }

    #[test]
    fn omitted_commission_defaults_to_fifteen() {
        let estimate = calculate(&base_input()).expect("valid input");
        assert!((estimate.commission_pct - DEFAULT_COMMISSION_PCT).abs() < f64::EPSILON);
    }

    #[test]
    fn commission_below_band_rejected() {
        let mut input = base_input();
        input.commission_pct = Some(9.0);
        let err = calculate(&input).expect_err("9% must fail");
        match err {
            VoyagioError::Validation { field, .. } => assert_eq!(field, "commission_pct"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn commission_above_band_rejected() {
        let mut input = base_input();
        input.commission_pct = Some(16.0);
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn resolve_commission_is_reachable_from_the_crate_root() {
        // Callers resolve policy questions without running a full estimate.
        assert!((crate::resolve_commission(None).unwrap() - DEFAULT_COMMISSION_PCT).abs()
            < f64::EPSILON);
        assert!(crate::resolve_commission(Some(20.0)).is_err());
    }

    #[test]
    fn commission_band_is_inclusive() {
        for pct in [10.0, 12.5, 15.0] {
            let mut input = base_input();
            input.commission_pct = Some(pct);
            let estimate = calculate(&input).expect("in-band commission");
            assert!((estimate.commission_pct - pct).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn empty_components_sum_to_zero() {
        let input = CostEstimateInput {
            airfare: PriceRange {
                low: 250.0,
                high: 310.0,
            },
            hotels: vec![],
            tours: vec![],
            transport: vec![],
            commission_pct: Some(10.0),
        };
        let estimate = calculate(&input).expect("valid input");
        assert!((estimate.hotels.low).abs() < f64::EPSILON);
        assert!((estimate.hotels.high).abs() < f64::EPSILON);
        assert!((estimate.subtotal.low - 250.0).abs() < f64::EPSILON);
        assert!((estimate.subtotal.high - 310.0).abs() < f64::EPSILON);
        // ceil(310 * 1.10) = 341
        assert!((estimate.total.high - 341.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tours_and_transport_accumulate() {
        let mut input = base_input();
        input.tours = vec![
            LineItemRange {
                label: Some("Food walk".into()),
                price_low: 60.0,
                price_high: 90.0,
            },
            LineItemRange {
                label: None,
                price_low: 40.0,
                price_high: 55.0,
            },
        ];
        input.transport = vec![LineItemRange {
            label: Some("Rail pass".into()),
            price_low: 120.0,
            price_high: 120.0,
        }];
        let estimate = calculate(&input).expect("valid input");
        assert!((estimate.tours.low - 100.0).abs() < f64::EPSILON);
        assert!((estimate.tours.high - 145.0).abs() < f64::EPSILON);
        assert!((estimate.transport.low - 120.0).abs() < f64::EPSILON);
        assert!((estimate.subtotal.low - 920.0).abs() < f64::EPSILON);
        assert!((estimate.subtotal.high - 1315.0).abs() < f64::EPSILON);
    }

    #[test]
    fn identical_inputs_reproduce_identically_modulo_timestamp() {
        let input = base_input();
        let mut a = calculate(&input).expect("valid input");
        let mut b = calculate(&input).expect("valid input");
        a.computed_at = String::new();
        b.computed_at = String::new();

        let a_json = serde_json::to_string(&a).expect("serialize");
        let b_json = serde_json::to_string(&b).expect("serialize");
        assert_eq!(a_json, b_json);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_range() -> impl Strategy<Value = PriceRange> {
            (0.0f64..5_000.0, 0.0f64..5_000.0).prop_map(|(a, b)| PriceRange {
                low: a.min(b),
                high: a.max(b),
            })
        }

        fn arb_stay() -> impl Strategy<Value = HotelStay> {
            (1u32..15, 20.0f64..400.0, 0.0f64..300.0).prop_map(|(nights, low, spread)| HotelStay {
                name: None,
                nights,
                nightly_low: low,
                nightly_high: low + spread,
            })
        }

        fn arb_line() -> impl Strategy<Value = LineItemRange> {
            (0.0f64..800.0, 0.0f64..400.0).prop_map(|(low, spread)| LineItemRange {
                label: None,
                price_low: low,
                price_high: low + spread,
            })
        }

        proptest! {
            #[test]
            fn floor_never_commissioned_ceiling_always(
                airfare in arb_range(),
                hotels in prop::collection::vec(arb_stay(), 0..4),
                tours in prop::collection::vec(arb_line(), 0..3),
                transport in prop::collection::vec(arb_line(), 0..3),
                commission in 10.0f64..=15.0,
            ) {
                let input = CostEstimateInput {
                    airfare,
                    hotels,
                    tours,
                    transport,
                    commission_pct: Some(commission),
                };
                let estimate = calculate(&input).expect("in-band commission");

                prop_assert_eq!(estimate.total.low, estimate.subtotal.low);
                prop_assert_eq!(
                    estimate.total.high,
                    (estimate.subtotal.high * (1.0 + commission / 100.0)).ceil()
                );
                prop_assert!(estimate.total.high >= estimate.subtotal.high);
            }

            #[test]
            fn out_of_band_commission_always_rejected(
                commission in prop_oneof![-50.0f64..10.0, 15.0001f64..80.0],
            ) {
                let input = CostEstimateInput {
                    airfare: PriceRange { low: 100.0, high: 200.0 },
                    hotels: vec![],
                    tours: vec![],
                    transport: vec![],
                    commission_pct: Some(commission),
                };
                prop_assert!(calculate(&input).is_err());
            }
        }
    }
}
