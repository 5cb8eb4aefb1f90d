use std::collections::BTreeMap;

use rand::{Rng, RngCore};

use super::EconomySnapshot;
use crate::model::drift::CITY_DRIFT_LIMIT;
use crate::model::population::EconomyLabelTier;
use crate::model::{Environment, MoodDescriptor, PopulationRecord, SportsPhase};

// --- Constants ---

/// Raw population change per drift point.
const MIGRATION_DIVISOR: f64 = 10.0;

const MOOD_STRONG: f64 = 3.0;
const MOOD_EXTREME: f64 = 6.0;

const RIPPLE_WEIGHT: f64 = 1.5;
const RIPPLE_CAP: f64 = 6.0;

const WEATHER_NOTABLE: f64 = -2.0;
const WEATHER_SEVERE: f64 = -4.0;

const DISRUPTION_WEIGHT: f64 = -1.5;
const DISRUPTION_CAP: f64 = -6.0;

const SENTIMENT_EXTREME: f64 = 0.5;
const SENTIMENT_WEIGHT: f64 = 4.0;

const PUBLIC_SPACE_HIGH: f64 = 0.7;
const PUBLIC_SPACE_LOW: f64 = 0.3;
const PUBLIC_SPACE_WEIGHT: f64 = 2.0;

const TRAFFIC_HIGH: f64 = 0.8;
const TRAFFIC_LOW: f64 = 0.2;
const TRAFFIC_CONGESTED: f64 = -2.0;
const TRAFFIC_LIGHT: f64 = 1.0;

const EMPLOYMENT_HIGH: f64 = 0.93;
const EMPLOYMENT_LOW: f64 = 0.85;
const EMPLOYMENT_WEIGHT: f64 = 3.0;

const LABEL_MILD: f64 = 2.0;
const LABEL_STRONG: f64 = 4.0;

const HOLIDAY_TRAVEL: f64 = -6.0;
const HOLIDAY_GATHERING: f64 = 5.0;
const HOLIDAY_CULTURAL: f64 = 3.0;
const FIRST_FRIDAY: f64 = 3.0;
const CREATION_DAY: f64 = 4.0;

const INDEX_HIGH: f64 = 0.8;
const INDEX_LOW: f64 = 0.2;
const INDEX_WEIGHT: f64 = 2.0;

/// Half-width of the random fluctuation term.
const FLUCTUATION: f64 = 3.0;
/// Fluctuations at least this large are listed as a factor.
const FLUCTUATION_NOTABLE: f64 = 1.5;

/// Running total plus the ordered tags that moved it and by how much.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contributions {
    pub total: f64,
    pub factors: Vec<String>,
    pub weights: BTreeMap<String, f64>,
}

impl Contributions {
    fn add(&mut self, tag: &str, amount: f64) {
        if amount != 0.0 {
            self.total += amount;
            self.tag(tag, amount);
        }
    }

    fn tag(&mut self, tag: &str, amount: f64) {
        if !self.weights.contains_key(tag) {
            self.factors.push(tag.to_string());
        }
        *self.weights.entry(tag.to_string()).or_default() += amount;
    }
}

/// Raw population change mapped onto the drift scale.
pub fn normalize_migration(raw: i64) -> f64 {
    (raw as f64 / MIGRATION_DIVISOR).clamp(-CITY_DRIFT_LIMIT, CITY_DRIFT_LIMIT)
}

/// City-wide drift and its factor tags, clamped to ±50.
///
/// Exactly one value is drawn from `rng`.
pub fn city_drift(
    env: &Environment,
    population: &PopulationRecord,
    economy: &EconomySnapshot,
    sports_phase: SportsPhase,
    crowd_intensity: f64,
    rng: &mut dyn RngCore,
) -> Contributions {
    let mut c = Contributions::default();

    let baseline = normalize_migration(population.migration);
    if baseline >= 0.0 {
        c.add("migration-in", baseline);
    } else {
        c.add("migration-out", baseline);
    }

    match economy.descriptor {
        MoodDescriptor::Thriving => c.add("economy-thriving", MOOD_EXTREME),
        MoodDescriptor::Strong => c.add("economy-strong", MOOD_STRONG),
        MoodDescriptor::Weak => c.add("economy-weak", -MOOD_STRONG),
        MoodDescriptor::Struggling => c.add("economy-struggling", -MOOD_EXTREME),
        MoodDescriptor::Stable => {}
    }

    let net = economy.positive_ripples as f64 - economy.negative_ripples as f64;
    let ripples = (net * RIPPLE_WEIGHT).clamp(-RIPPLE_CAP, RIPPLE_CAP);
    if ripples > 0.0 {
        c.add("ripples-positive", ripples);
    } else {
        c.add("ripples-negative", ripples);
    }

    if env.weather.is_severe() {
        c.add("weather-severe", WEATHER_SEVERE);
    } else if env.weather.is_notable() {
        c.add("weather-notable", WEATHER_NOTABLE);
    }

    let disruption = (env.chaos_count() as f64 * DISRUPTION_WEIGHT).max(DISRUPTION_CAP);
    c.add("disruption", disruption);

    if env.sentiment >= SENTIMENT_EXTREME {
        c.add("sentiment-high", SENTIMENT_WEIGHT);
    } else if env.sentiment <= -SENTIMENT_EXTREME {
        c.add("sentiment-low", -SENTIMENT_WEIGHT);
    }

    if env.public_space >= PUBLIC_SPACE_HIGH {
        c.add("public-space-active", PUBLIC_SPACE_WEIGHT);
    } else if env.public_space <= PUBLIC_SPACE_LOW {
        c.add("public-space-neglected", -PUBLIC_SPACE_WEIGHT);
    }

    if env.traffic >= TRAFFIC_HIGH {
        c.add("traffic-congested", TRAFFIC_CONGESTED);
    } else if env.traffic <= TRAFFIC_LOW {
        c.add("traffic-light", TRAFFIC_LIGHT);
    }

    if population.employment_rate >= EMPLOYMENT_HIGH {
        c.add("employment-high", EMPLOYMENT_WEIGHT);
    } else if population.employment_rate <= EMPLOYMENT_LOW {
        c.add("employment-low", -EMPLOYMENT_WEIGHT);
    }

    match population.economy_tier() {
        EconomyLabelTier::Booming => c.add("label-booming", LABEL_STRONG),
        EconomyLabelTier::Growing => c.add("label-growing", LABEL_MILD),
        EconomyLabelTier::Weak => c.add("label-weak", -LABEL_MILD),
        EconomyLabelTier::Recession => c.add("label-recession", -LABEL_STRONG),
        EconomyLabelTier::Stable => {}
    }

    let holiday = env.calendar.holiday;
    if holiday.is_travel() {
        c.add("holiday-travel", HOLIDAY_TRAVEL);
    }
    if holiday.is_gathering() {
        c.add("holiday-gathering", HOLIDAY_GATHERING);
    }
    if holiday.is_cultural() {
        c.add("holiday-cultural", HOLIDAY_CULTURAL);
    }
    if env.calendar.first_friday {
        c.add("first-friday", FIRST_FRIDAY);
    }
    if env.calendar.creation_day {
        c.add("creation-day", CREATION_DAY);
    }

    let sports = sports_phase.drift_magnitude() * crowd_intensity;
    c.add(&format!("sports-{sports_phase}"), sports);

    if env.culture >= INDEX_HIGH {
        c.add("culture-high", INDEX_WEIGHT);
    } else if env.culture <= INDEX_LOW {
        c.add("culture-low", -INDEX_WEIGHT);
    }
    if env.community_engagement >= INDEX_HIGH {
        c.add("community-high", INDEX_WEIGHT);
    } else if env.community_engagement <= INDEX_LOW {
        c.add("community-low", -INDEX_WEIGHT);
    }

    let fluctuation = rng.random_range(-FLUCTUATION..FLUCTUATION);
    c.total += fluctuation;
    if fluctuation.abs() >= FLUCTUATION_NOTABLE {
        c.tag("fluctuation", fluctuation);
    }

    c.total = c.total.clamp(-CITY_DRIFT_LIMIT, CITY_DRIFT_LIMIT);
    c
}
