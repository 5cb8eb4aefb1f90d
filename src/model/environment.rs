use serde::{Deserialize, Serialize};

use super::calendar::Calendar;

/// Weather impact at or above which conditions count as notable.
pub const WEATHER_NOTABLE_IMPACT: f64 = 1.2;
/// Weather impact at or above which conditions count as severe.
pub const WEATHER_SEVERE_IMPACT: f64 = 1.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    /// Descriptor from the weather provider ("clear", "storm", "heatwave", ...).
    pub kind: String,
    /// Severity multiplier; 1.0 is a normal day.
    pub impact: f64,
}

impl Weather {
    pub fn new(kind: &str, impact: f64) -> Self {
        Self {
            kind: kind.to_string(),
            impact,
        }
    }

    pub fn is_notable(&self) -> bool {
        self.impact >= WEATHER_NOTABLE_IMPACT
    }

    pub fn is_severe(&self) -> bool {
        self.impact >= WEATHER_SEVERE_IMPACT
    }
}

impl Default for Weather {
    fn default() -> Self {
        Self::new("clear", 1.0)
    }
}

/// A free-text event reported for the cycle, optionally pinned to a district.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CityEvent {
    pub description: String,
    pub district: Option<String>,
}

impl CityEvent {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            district: None,
        }
    }

    pub fn in_district(description: &str, district: &str) -> Self {
        Self {
            description: description.to_string(),
            district: Some(district.to_string()),
        }
    }
}

/// Signals from the external calendar/environment provider.
///
/// Filled by the caller before each cycle. The legislature engine writes back
/// into `sentiment`; everything else is read-only inside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub calendar: Calendar,
    pub weather: Weather,
    /// Active disruption events ("chaos").
    pub chaos: Vec<CityEvent>,
    /// City sentiment in [-1, 1].
    pub sentiment: f64,
    // Remaining indices are in [0, 1].
    pub culture: f64,
    pub community_engagement: f64,
    pub nightlife: f64,
    pub public_space: f64,
    pub traffic: f64,
    pub retail: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            calendar: Calendar::default(),
            weather: Weather::default(),
            chaos: Vec::new(),
            sentiment: 0.0,
            culture: 0.5,
            community_engagement: 0.5,
            nightlife: 0.5,
            public_space: 0.5,
            traffic: 0.5,
            retail: 0.5,
        }
    }
}

impl Environment {
    pub fn chaos_count(&self) -> usize {
        self.chaos.len()
    }

    /// Apply a sentiment delta, keeping the index inside [-1, 1].
    pub fn shift_sentiment(&mut self, delta: f64) -> f64 {
        let before = self.sentiment;
        self.sentiment = (self.sentiment + delta).clamp(-1.0, 1.0);
        self.sentiment - before
    }
}

/// Aggregate counters reported by the external career subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkforceSignals {
    pub layoffs: u32,
    pub promotions: u32,
    pub sector_shifts: u32,
}
