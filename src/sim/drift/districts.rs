use crate::model::district::SPORTS_DISTRICTS;
use crate::model::drift::DISTRICT_DRIFT_LIMIT;
use crate::model::{DistrictEconomy, DistrictMetrics, MoodDescriptor};

// --- Constants ---

/// Share of city drift every district inherits.
const CITY_SHARE: f64 = 1.0 / 8.0;

const CRIME_HIGH: f64 = 0.7;
const CRIME_LOW: f64 = 0.3;
const CRIME_PENALTY: f64 = -1.0;
const SAFETY_BONUS: f64 = 0.5;

const SENTIMENT_EXTREME: f64 = 0.4;
const SENTIMENT_WEIGHT: f64 = 0.75;

const RETAIL_HIGH: f64 = 0.7;
const RETAIL_LOW: f64 = 0.3;
const RETAIL_WEIGHT: f64 = 0.75;

const EVENTS_HIGH: f64 = 0.7;
const EVENTS_LOW: f64 = 0.3;
const EVENTS_BONUS: f64 = 1.0;
const EVENTS_PENALTY: f64 = -0.5;

const LOCAL_ECONOMY_MILD: f64 = 0.5;
const LOCAL_ECONOMY_STRONG: f64 = 1.0;

/// Pull of the stadium districts during the postseason.
const SPORTS_DISTRICT_BIAS: f64 = 0.5;

/// Optional manual push toward one district.
#[derive(Debug, Clone, Copy)]
pub struct DistrictBias<'a> {
    pub district: &'a str,
    pub amount: f64,
}

/// One district's drift, clamped to ±5.
pub fn district_drift(
    name: &str,
    metrics: &DistrictMetrics,
    city_drift: f64,
    local: Option<&DistrictEconomy>,
    bias: Option<DistrictBias<'_>>,
    postseason: bool,
) -> f64 {
    let mut drift = city_drift * CITY_SHARE;

    if metrics.crime_index > CRIME_HIGH {
        drift += CRIME_PENALTY;
    } else if metrics.crime_index < CRIME_LOW {
        drift += SAFETY_BONUS;
    }

    if metrics.sentiment > SENTIMENT_EXTREME {
        drift += SENTIMENT_WEIGHT;
    } else if metrics.sentiment < -SENTIMENT_EXTREME {
        drift -= SENTIMENT_WEIGHT;
    }

    if metrics.retail_vitality > RETAIL_HIGH {
        drift += RETAIL_WEIGHT;
    } else if metrics.retail_vitality < RETAIL_LOW {
        drift -= RETAIL_WEIGHT;
    }

    if metrics.event_attractiveness > EVENTS_HIGH {
        drift += EVENTS_BONUS;
    } else if metrics.event_attractiveness < EVENTS_LOW {
        drift += EVENTS_PENALTY;
    }

    drift += match local.map(|e| e.descriptor) {
        Some(MoodDescriptor::Thriving) => LOCAL_ECONOMY_STRONG,
        Some(MoodDescriptor::Strong) => LOCAL_ECONOMY_MILD,
        Some(MoodDescriptor::Weak) => -LOCAL_ECONOMY_MILD,
        Some(MoodDescriptor::Struggling) => -LOCAL_ECONOMY_STRONG,
        _ => 0.0,
    };

    match bias {
        Some(b) if b.district.eq_ignore_ascii_case(name) => drift += b.amount,
        _ => {
            if postseason && SPORTS_DISTRICTS.iter().any(|d| d.eq_ignore_ascii_case(name)) {
                drift += SPORTS_DISTRICT_BIAS;
            }
        }
    }

    drift.clamp(-DISTRICT_DRIFT_LIMIT, DISTRICT_DRIFT_LIMIT)
}
