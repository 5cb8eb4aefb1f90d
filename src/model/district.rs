use serde::{Deserialize, Serialize};

/// Ripple sensitivity per district. Unknown districts use 1.0.
pub const DISTRICTS: &[(&str, f64)] = &[
    ("Downtown", 1.2),
    ("Uptown", 1.1),
    ("KONO", 1.0),
    ("Temescal", 0.9),
    ("Rockridge", 0.8),
    ("Lake Merritt", 1.0),
    ("Chinatown", 1.1),
    ("Fruitvale", 1.0),
    ("West Oakland", 1.2),
    ("Jack London", 1.3),
    ("Laurel", 0.8),
    ("East Oakland", 1.1),
];

/// Districts that host First Friday art walks.
pub const ARTS_DISTRICTS: &[&str] = &["KONO", "Uptown", "Temescal"];

/// Districts around the stadium and the waterfront bars.
pub const SPORTS_DISTRICTS: &[&str] = &["Jack London", "Downtown"];

pub fn district_names() -> impl Iterator<Item = &'static str> {
    DISTRICTS.iter().map(|(name, _)| *name)
}

pub fn sensitivity(district: &str) -> f64 {
    DISTRICTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(district))
        .map(|(_, s)| *s)
        .unwrap_or(1.0)
}

/// Local metrics supplied by the external district registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistrictMetrics {
    /// 0 = no crime, 1 = worst in the city.
    pub crime_index: f64,
    /// Local sentiment in [-1, 1].
    pub sentiment: f64,
    /// 0..1
    pub retail_vitality: f64,
    /// 0..1
    pub event_attractiveness: f64,
}

impl Default for DistrictMetrics {
    fn default() -> Self {
        Self {
            crime_index: 0.5,
            sentiment: 0.0,
            retail_vitality: 0.5,
            event_attractiveness: 0.5,
        }
    }
}
