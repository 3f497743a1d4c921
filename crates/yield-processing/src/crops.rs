//! Agronomic reference tables.
//!
//! The crop profile table is the single source of truth for base yields and
//! optimal growing ranges. Data generation, prediction confidence and
//! feature-importance scoring all read from [`crop_profile`], so the three can
//! never disagree about what "optimal" means for a crop.

use serde::Serialize;

/// Inclusive interval of optimal values for one environmental variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

impl OptimalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Distance from `value` to whichever bound is closer.
    ///
    /// This is measured to the nearest bound even when `value` is inside the
    /// range, so the midpoint is the point furthest from both bounds.
    pub fn nearest_bound_distance(&self, value: f64) -> f64 {
        (value - self.min).abs().min((value - self.max).abs())
    }
}

/// Base yield and optimal conditions for a crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropProfile {
    pub name: &'static str,
    /// Expected yield under ideal conditions before any adjustment factor.
    pub base_yield: f64,
    /// Optimal air temperature in °C.
    pub temperature: OptimalRange,
    /// Optimal relative humidity in %.
    pub humidity: OptimalRange,
    /// Optimal light level in lux-equivalent sensor units.
    pub light: OptimalRange,
}

/// Every crop the generator knows about.
pub static CROP_PROFILES: [CropProfile; 4] = [
    CropProfile {
        name: "tomato",
        base_yield: 45_000.0,
        temperature: OptimalRange::new(22.0, 26.0),
        humidity: OptimalRange::new(60.0, 70.0),
        light: OptimalRange::new(600.0, 900.0),
    },
    CropProfile {
        name: "lettuce",
        base_yield: 28_000.0,
        temperature: OptimalRange::new(18.0, 22.0),
        humidity: OptimalRange::new(70.0, 80.0),
        light: OptimalRange::new(400.0, 600.0),
    },
    CropProfile {
        name: "strawberry",
        base_yield: 22_000.0,
        temperature: OptimalRange::new(20.0, 24.0),
        humidity: OptimalRange::new(65.0, 75.0),
        light: OptimalRange::new(500.0, 800.0),
    },
    CropProfile {
        name: "pepper",
        base_yield: 38_000.0,
        temperature: OptimalRange::new(23.0, 27.0),
        humidity: OptimalRange::new(55.0, 65.0),
        light: OptimalRange::new(700.0, 1000.0),
    },
];

/// Growth stages and their yield multipliers, earliest first.
pub static GROWTH_STAGES: [(&str, f64); 4] = [
    ("early", 0.3),
    ("vegetative", 0.7),
    ("flowering", 0.9),
    ("fruiting", 1.0),
];

/// Field locations and their yield multipliers.
pub static LOCATIONS: [(&str, f64); 4] = [
    ("lot-a", 1.0),
    ("lot-b", 0.95),
    ("lot-c", 0.9),
    ("greenhouse", 1.2),
];

/// Look up a crop profile by name.
pub fn crop_profile(name: &str) -> Option<&'static CropProfile> {
    CROP_PROFILES.iter().find(|profile| profile.name == name)
}

/// Yield multiplier for a growth stage. Unknown stages are neutral.
pub fn growth_stage_multiplier(stage: &str) -> f64 {
    GROWTH_STAGES
        .iter()
        .find(|(name, _)| *name == stage)
        .map_or(1.0, |(_, factor)| *factor)
}

/// Yield multiplier for a location. Unknown locations are neutral.
pub fn location_multiplier(location: &str) -> f64 {
    LOCATIONS
        .iter()
        .find(|(name, _)| *name == location)
        .map_or(1.0, |(_, factor)| *factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_lookup() {
        let tomato = crop_profile("tomato").unwrap();
        assert_eq!(tomato.base_yield, 45_000.0);
        assert_eq!(tomato.light, OptimalRange::new(600.0, 900.0));
        assert!(crop_profile("cucumber").is_none());
    }

    #[test]
    fn test_range_helpers() {
        let range = OptimalRange::new(22.0, 26.0);
        assert!(range.contains(22.0));
        assert!(range.contains(26.0));
        assert!(!range.contains(26.1));
        assert_eq!(range.midpoint(), 24.0);
        assert_eq!(range.width(), 4.0);
    }

    #[test]
    fn test_nearest_bound_distance_inside_and_outside() {
        let range = OptimalRange::new(60.0, 70.0);
        assert_eq!(range.nearest_bound_distance(65.0), 5.0);
        assert_eq!(range.nearest_bound_distance(61.0), 1.0);
        assert_eq!(range.nearest_bound_distance(50.0), 10.0);
        assert_eq!(range.nearest_bound_distance(75.0), 5.0);
    }

    #[test]
    fn test_multipliers_default_to_neutral() {
        assert_eq!(growth_stage_multiplier("flowering"), 0.9);
        assert_eq!(growth_stage_multiplier("dormant"), 1.0);
        assert_eq!(location_multiplier("greenhouse"), 1.2);
        assert_eq!(location_multiplier("lot-z"), 1.0);
    }
}
