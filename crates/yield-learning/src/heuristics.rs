//! Confidence and feature-importance heuristics.
//!
//! Neither score is derived from the forest. Both compare the request's
//! environmental readings against the crop's optimal ranges from the shared
//! [`crop_profile`] table.

use crate::types::{FeatureImportance, PredictionRequest};
use yield_processing::utils::round_to;
use yield_processing::{OptimalRange, crop_profile};

/// Starting confidence before per-variable adjustments, in percent.
pub const BASE_CONFIDENCE: i32 = 85;
pub const MIN_CONFIDENCE: i32 = 50;
pub const MAX_CONFIDENCE: i32 = 95;

const GROWTH_STAGE_WEIGHT: f64 = 12.0;
const DAYS_PLANTING_WEIGHT: f64 = 10.0;
const LOCATION_WEIGHT: f64 = 8.0;
const CROP_TYPE_WEIGHT: f64 = 7.0;

/// `(bonus, penalty)` applied when a reading is inside / outside its range.
const TEMPERATURE_ADJUSTMENT: (i32, i32) = (5, -10);
const HUMIDITY_ADJUSTMENT: (i32, i32) = (3, -5);
const LIGHT_ADJUSTMENT: (i32, i32) = (4, -6);

/// Heuristic confidence in percent, always within `[50, 95]`.
///
/// Unknown crops keep the base confidence.
pub fn confidence(request: &PredictionRequest) -> f64 {
    let Some(profile) = crop_profile(&request.crop_type) else {
        return f64::from(BASE_CONFIDENCE);
    };

    let adjust = |range: &OptimalRange, value: f64, (bonus, penalty): (i32, i32)| {
        if range.contains(value) { bonus } else { penalty }
    };

    let score = BASE_CONFIDENCE
        + adjust(&profile.temperature, request.temperature, TEMPERATURE_ADJUSTMENT)
        + adjust(&profile.humidity, request.humidity, HUMIDITY_ADJUSTMENT)
        + adjust(&profile.light, request.light, LIGHT_ADJUSTMENT);

    f64::from(score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE))
}

/// Per-request importance of each input, in percent rounded to one decimal.
///
/// Environmental scores shrink as the reading moves towards a range bound;
/// the deviation is always measured to the nearest bound. Unknown crops score
/// zero for all three environmental inputs.
pub fn feature_importance(request: &PredictionRequest) -> FeatureImportance {
    let (temperature, humidity, light) = match crop_profile(&request.crop_type) {
        Some(profile) => {
            let temperature_dev = profile.temperature.nearest_bound_distance(request.temperature);
            let humidity_dev = profile.humidity.nearest_bound_distance(request.humidity);
            let light_dev = profile.light.nearest_bound_distance(request.light);
            (
                (25.0 - 2.0 * temperature_dev).max(0.0),
                (20.0 - 1.5 * humidity_dev).max(0.0),
                (18.0 - 0.05 * light_dev).max(0.0),
            )
        }
        None => (0.0, 0.0, 0.0),
    };

    let raw = FeatureImportance {
        temperature,
        humidity,
        light,
        growth_stage: GROWTH_STAGE_WEIGHT,
        days_planting: DAYS_PLANTING_WEIGHT,
        location: LOCATION_WEIGHT,
        crop_type: CROP_TYPE_WEIGHT,
    };
    let total = raw.total();
    let percent = |value: f64| round_to(value / total * 100.0, 1);

    FeatureImportance {
        temperature: percent(raw.temperature),
        humidity: percent(raw.humidity),
        light: percent(raw.light),
        growth_stage: percent(raw.growth_stage),
        days_planting: percent(raw.days_planting),
        location: percent(raw.location),
        crop_type: percent(raw.crop_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(crop: &str, temperature: f64, humidity: f64, light: f64) -> PredictionRequest {
        PredictionRequest {
            crop_type: crop.to_string(),
            growth_stage: "fruiting".to_string(),
            days_planting: 90.0,
            location: "greenhouse".to_string(),
            temperature,
            humidity,
            light,
        }
    }

    #[test]
    fn test_confidence_all_inside_clamps_to_max() {
        assert_eq!(confidence(&request("tomato", 24.0, 65.0, 750.0)), 95.0);
    }

    #[test]
    fn test_confidence_all_outside() {
        // 85 - 10 - 5 - 6
        assert_eq!(confidence(&request("tomato", 35.0, 30.0, 200.0)), 64.0);
    }

    #[test]
    fn test_confidence_mixed() {
        // 85 + 5 - 5 - 6
        assert_eq!(confidence(&request("lettuce", 20.0, 50.0, 1000.0)), 79.0);
    }

    #[test]
    fn test_confidence_bounds_are_inclusive() {
        // 85 + 5 + 3 + 4, clamped
        assert_eq!(confidence(&request("pepper", 23.0, 65.0, 1000.0)), 95.0);
    }

    #[test]
    fn test_confidence_unknown_crop() {
        assert_eq!(confidence(&request("cucumber", 0.0, 0.0, 0.0)), 85.0);
    }

    #[test]
    fn test_confidence_always_in_range() {
        for crop in ["tomato", "lettuce", "strawberry", "pepper", "kale"] {
            for temperature in [5.0, 18.0, 22.0, 25.0, 40.0] {
                for humidity in [20.0, 60.0, 75.0, 95.0] {
                    for light in [100.0, 500.0, 800.0, 2000.0] {
                        let value = confidence(&request(crop, temperature, humidity, light));
                        assert!((50.0..=95.0).contains(&value), "{}", value);
                    }
                }
            }
        }
    }

    #[test]
    fn test_importance_tomato_example() {
        // raw: 25-2*2=21, 20-1.5*5=12.5, 18-0.05*150=10.5, 12, 10, 8, 7 => 81
        let importance = feature_importance(&request("tomato", 24.0, 65.0, 750.0));
        assert_eq!(
            importance,
            FeatureImportance {
                temperature: 25.9,
                humidity: 15.4,
                light: 13.0,
                growth_stage: 14.8,
                days_planting: 12.3,
                location: 9.9,
                crop_type: 8.6,
            }
        );
    }

    #[test]
    fn test_importance_floors_at_zero() {
        let importance = feature_importance(&request("tomato", 60.0, 10.0, 5000.0));
        assert_eq!(importance.temperature, 0.0);
        assert_eq!(importance.humidity, 0.0);
        assert_eq!(importance.light, 0.0);
        // fixed weights only: 12 + 10 + 8 + 7 = 37
        assert_eq!(importance.growth_stage, 32.4);
    }

    #[test]
    fn test_importance_unknown_crop_keeps_all_keys() {
        let importance = feature_importance(&request("cucumber", 24.0, 65.0, 750.0));
        assert_eq!(importance.temperature, 0.0);
        assert_eq!(importance.entries().len(), 7);
        assert!((importance.total() - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_importance_sums_to_hundred() {
        for crop in ["tomato", "lettuce", "strawberry", "pepper"] {
            for temperature in [12.0, 21.0, 30.0] {
                for humidity in [40.0, 68.0, 85.0] {
                    for light in [250.0, 700.0, 1400.0] {
                        let total =
                            feature_importance(&request(crop, temperature, humidity, light))
                                .total();
                        assert!((total - 100.0).abs() <= 0.5, "total {}", total);
                    }
                }
            }
        }
    }
}
