//! Yield adjustment factors used to label synthetic samples.

use crate::crops::{OptimalRange, growth_stage_multiplier, location_multiplier};

/// Temperature adjustment: best inside the range, harsh beyond ±5 °C.
pub fn temperature_factor(temperature: f64, optimal: &OptimalRange) -> f64 {
    if optimal.contains(temperature) {
        1.15
    } else if temperature < optimal.min - 5.0 || temperature > optimal.max + 5.0 {
        0.7
    } else if temperature < optimal.min - 2.0 || temperature > optimal.max + 2.0 {
        0.9
    } else {
        1.0
    }
}

/// Humidity adjustment: best inside the range, harsh beyond ±15 %.
pub fn humidity_factor(humidity: f64, optimal: &OptimalRange) -> f64 {
    if optimal.contains(humidity) {
        1.10
    } else if humidity < optimal.min - 15.0 || humidity > optimal.max + 15.0 {
        0.8
    } else {
        0.95
    }
}

/// Light adjustment.
///
/// Only a deficit of more than 200 below the optimal minimum is penalized
/// harshly; excess light above the maximum always gets the mild penalty.
pub fn light_factor(light: f64, optimal: &OptimalRange) -> f64 {
    if optimal.contains(light) {
        1.12
    } else if light < optimal.min - 200.0 {
        0.75
    } else {
        0.95
    }
}

/// Combined maturity adjustment from the growth stage and the crop age.
pub fn growth_factor(growth_stage: &str, days_planting: i64) -> f64 {
    let stage = growth_stage_multiplier(growth_stage);
    let age = match days_planting {
        d if d < 30 => 0.4,
        d if d < 60 => 0.7,
        d if d < 90 => 0.9,
        _ => 1.0,
    };
    stage * age
}

pub fn location_factor(location: &str) -> f64 {
    location_multiplier(location)
}
