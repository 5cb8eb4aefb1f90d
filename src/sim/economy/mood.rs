use std::collections::{BTreeMap, BTreeSet};

use crate::model::district::{ARTS_DISTRICTS, DISTRICTS, SPORTS_DISTRICTS, sensitivity};
use crate::model::economy::MOOD_NEUTRAL;
use crate::model::{
    Calendar, DistrictEconomy, DistrictMetrics, EconomicRipple, HolidayPriority, Season,
    SportsPhase,
};

// --- Constants ---

/// Share of summed ripple strength that moves the city mood each cycle.
const RIPPLE_WEIGHT: f64 = 0.1;
/// Per-cycle pull toward neutral.
const NEUTRAL_PULL: f64 = 0.5;

const SHOPPING_BONUS: f64 = 1.0;
const MAJOR_HOLIDAY_BONUS: f64 = 0.5;
const SPECIAL_DAY_BONUS: f64 = 0.5;
const SUMMER_BONUS: f64 = 0.5;
const WINTER_PENALTY: f64 = 0.5;
const PLAYOFFS_BONUS: f64 = 1.0;
const CHAMPIONSHIP_BONUS: f64 = 2.0;
/// Average district retail vitality above/below which mood moves.
const RETAIL_HIGH: f64 = 0.65;
const RETAIL_LOW: f64 = 0.35;
const RETAIL_ADJUSTMENT: f64 = 0.5;

const EMPLOYMENT_BASE: f64 = 0.82;
const EMPLOYMENT_SPAN: f64 = 0.14;
const EMPLOYMENT_MIN: f64 = 0.80;
const EMPLOYMENT_MAX: f64 = 0.97;
/// Prior drift magnitude that moves employment by one point.
const EMPLOYMENT_DRIFT_THRESHOLD: f64 = 20.0;
const EMPLOYMENT_DRIFT_ADJUSTMENT: f64 = 0.01;

/// Weight of a ripple on its own primary district.
const PRIMARY_BOOST: f64 = 1.5;
const HOLIDAY_ZONE_BONUS: f64 = 3.0;
const FIRST_FRIDAY_BONUS: f64 = 2.0;
const SPORTS_ZONE_BONUS: f64 = 3.0;

/// Prior mood plus the ripple term, pulled half a point toward neutral.
pub fn base_mood(prior: f64, ripples: &[EconomicRipple]) -> f64 {
    let total: f64 = ripples.iter().map(|r| r.current_strength).sum();
    let mood = prior + total * RIPPLE_WEIGHT;
    let direction = if mood > MOOD_NEUTRAL {
        1.0
    } else if mood < MOOD_NEUTRAL {
        -1.0
    } else {
        0.0
    };
    mood - NEUTRAL_PULL * direction
}

pub fn calendar_adjustment(calendar: &Calendar, sports_phase: SportsPhase) -> f64 {
    let mut delta = 0.0;
    if calendar.holiday.is_shopping() {
        delta += SHOPPING_BONUS;
    }
    if calendar.priority == HolidayPriority::Major {
        delta += MAJOR_HOLIDAY_BONUS;
    }
    if calendar.first_friday {
        delta += SPECIAL_DAY_BONUS;
    }
    if calendar.creation_day {
        delta += SPECIAL_DAY_BONUS;
    }
    match calendar.season {
        Season::Summer => delta += SUMMER_BONUS,
        Season::Winter => delta -= WINTER_PENALTY,
        _ => {}
    }
    match sports_phase {
        SportsPhase::Playoffs => delta += PLAYOFFS_BONUS,
        SportsPhase::Championship => delta += CHAMPIONSHIP_BONUS,
        _ => {}
    }
    delta
}

pub fn retail_adjustment(districts: &BTreeMap<String, DistrictMetrics>) -> f64 {
    if districts.is_empty() {
        return 0.0;
    }
    let avg = districts.values().map(|m| m.retail_vitality).sum::<f64>() / districts.len() as f64;
    if avg > RETAIL_HIGH {
        RETAIL_ADJUSTMENT
    } else if avg < RETAIL_LOW {
        -RETAIL_ADJUSTMENT
    } else {
        0.0
    }
}

/// New city mood in [0, 100].
pub fn aggregate_mood(
    prior: f64,
    ripples: &[EconomicRipple],
    calendar: &Calendar,
    sports_phase: SportsPhase,
    districts: &BTreeMap<String, DistrictMetrics>,
) -> f64 {
    let mood = base_mood(prior, ripples)
        + calendar_adjustment(calendar, sports_phase)
        + retail_adjustment(districts);
    mood.clamp(0.0, 100.0)
}

pub fn employment_rate(mood: f64, prior_drift: f64) -> f64 {
    let mut rate = EMPLOYMENT_BASE + mood / 100.0 * EMPLOYMENT_SPAN;
    if prior_drift >= EMPLOYMENT_DRIFT_THRESHOLD {
        rate += EMPLOYMENT_DRIFT_ADJUSTMENT;
    } else if prior_drift <= -EMPLOYMENT_DRIFT_THRESHOLD {
        rate -= EMPLOYMENT_DRIFT_ADJUSTMENT;
    }
    rate.clamp(EMPLOYMENT_MIN, EMPLOYMENT_MAX)
}

/// Rebuild every district economy from scratch.
///
/// Covers the fixed registry plus any extra district the metrics map knows.
pub fn district_economies(
    city_mood: f64,
    ripples: &[EconomicRipple],
    calendar: &Calendar,
    sports_phase: SportsPhase,
    districts: &BTreeMap<String, DistrictMetrics>,
) -> BTreeMap<String, DistrictEconomy> {
    let names: BTreeSet<&str> = DISTRICTS
        .iter()
        .map(|(d, _)| *d)
        .chain(districts.keys().map(String::as_str))
        .collect();
    let zone = calendar.holiday.zone_district();

    names
        .into_iter()
        .map(|name| {
            let weight = sensitivity(name);
            let mut economy = DistrictEconomy::neutral();
            let mut mood = city_mood;
            for ripple in ripples.iter().filter(|r| r.affects(name)) {
                let boost = if ripple.is_primary(name) { PRIMARY_BOOST } else { 1.0 };
                mood += ripple.current_strength * weight * boost;
                economy.active_ripples += 1;
            }

            if zone.is_some_and(|z| z.eq_ignore_ascii_case(name)) {
                economy.holiday_zone = true;
                mood += HOLIDAY_ZONE_BONUS;
            }
            if calendar.first_friday && ARTS_DISTRICTS.contains(&name) {
                mood += FIRST_FRIDAY_BONUS;
            }
            if sports_phase.is_postseason() && SPORTS_DISTRICTS.contains(&name) {
                economy.sports_zone = true;
                mood += SPORTS_ZONE_BONUS;
            }

            economy.set_mood(mood);
            (name.to_string(), economy)
        })
        .collect()
}
