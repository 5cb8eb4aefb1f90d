use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// City drift is bounded to ±50.
pub const CITY_DRIFT_LIMIT: f64 = 50.0;
/// District drift is bounded to ±5.
pub const DISTRICT_DRIFT_LIMIT: f64 = 5.0;

/// Population drift for one cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftState {
    pub city: f64,
    /// Contributing factor tags in the order they were applied.
    pub factors: Vec<String>,
    /// Signed amount each factor tag contributed.
    pub factor_weights: BTreeMap<String, f64>,
    pub districts: BTreeMap<String, f64>,
    /// Feedback applied to the city economic mood this cycle.
    pub mood_feedback: f64,
}

impl DriftState {
    pub fn set_city(&mut self, value: f64) {
        self.city = value.clamp(-CITY_DRIFT_LIMIT, CITY_DRIFT_LIMIT);
    }

    pub fn set_district(&mut self, district: &str, value: f64) {
        self.districts.insert(
            district.to_string(),
            value.clamp(-DISTRICT_DRIFT_LIMIT, DISTRICT_DRIFT_LIMIT),
        );
    }
}
