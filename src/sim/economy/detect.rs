use rand::RngCore;
use rand::seq::IndexedRandom;

use super::catalog::{match_keywords, trigger_spec};
use crate::model::district::{DISTRICTS, sensitivity};
use crate::model::{
    Calendar, CityEvent, DriftState, EconomyState, RippleTrigger, Season, SportsPhase,
    WorkforceSignals,
};

// --- Constants ---

/// Prior-cycle city drift at or above which a boom shock fires.
const DRIFT_BOOM: f64 = 25.0;
const DRIFT_GROWTH: f64 = 12.0;
const DRIFT_DECLINE: f64 = -12.0;
const DRIFT_EXODUS: f64 = -25.0;

/// Reported layoffs at or above which a negative workforce shock fires.
const LAYOFF_THRESHOLD: u32 = 3;
/// Reported promotions at or above which a positive workforce shock fires.
const PROMOTION_THRESHOLD: u32 = 4;

pub const SYSTEM_SOURCE: &str = "system";

/// A shock detected this cycle, before it becomes a ripple.
#[derive(Debug, Clone, PartialEq)]
pub struct ShockRequest {
    pub trigger: RippleTrigger,
    pub primary_district: Option<String>,
    pub source: String,
}

impl ShockRequest {
    fn system(trigger: RippleTrigger, primary_district: Option<&str>) -> Self {
        Self {
            trigger,
            primary_district: primary_district.map(str::to_string),
            source: SYSTEM_SOURCE.to_string(),
        }
    }
}

/// Growth or decline shock from last cycle's drift, centred on the district
/// that moved the most in that direction.
pub fn drift_shock(prior: &DriftState) -> Option<ShockRequest> {
    let trigger = if prior.city >= DRIFT_BOOM {
        RippleTrigger::PopulationBoom
    } else if prior.city >= DRIFT_GROWTH {
        RippleTrigger::PopulationGrowth
    } else if prior.city <= DRIFT_EXODUS {
        RippleTrigger::PopulationExodus
    } else if prior.city <= DRIFT_DECLINE {
        RippleTrigger::PopulationDecline
    } else {
        return None;
    };

    let inflow = prior.city > 0.0;
    let primary = prior
        .districts
        .iter()
        .filter(|(_, v)| if inflow { **v > 0.0 } else { **v < 0.0 })
        .max_by(|a, b| {
            let (a, b) = (a.1.abs(), b.1.abs());
            a.total_cmp(&b)
        })
        .map(|(d, _)| d.as_str());
    Some(ShockRequest::system(trigger, primary))
}

pub fn workforce_shocks(signals: &WorkforceSignals) -> Vec<ShockRequest> {
    let mut out = Vec::new();
    if signals.layoffs >= LAYOFF_THRESHOLD {
        out.push(ShockRequest::system(RippleTrigger::WorkforceLayoffs, None));
    }
    if signals.promotions >= PROMOTION_THRESHOLD {
        out.push(ShockRequest::system(RippleTrigger::WorkforcePromotions, None));
    }
    out
}

/// Holiday, sports, special-day and seasonal shocks.
///
/// Multi-cycle conditions (sports phases, seasons) only fire when no ripple
/// of the same category is still active.
pub fn calendar_shocks(
    calendar: &Calendar,
    sports_phase: SportsPhase,
    economy: &EconomyState,
) -> Vec<ShockRequest> {
    let mut out = Vec::new();
    let holiday = calendar.holiday;

    if holiday.is_shopping() {
        out.push(ShockRequest::system(RippleTrigger::HolidayShopping, None));
    }
    if holiday.is_cultural() {
        if let Some(zone) = holiday.zone_district() {
            out.push(ShockRequest::system(RippleTrigger::HolidayFestival, Some(zone)));
        }
    }

    let sports = match sports_phase {
        SportsPhase::Playoffs => Some(RippleTrigger::SportsPlayoffs),
        SportsPhase::Championship => Some(RippleTrigger::SportsChampionship),
        _ => None,
    };
    if let Some(trigger) = sports.filter(|t| !economy.has_active(*t)) {
        out.push(ShockRequest::system(trigger, Some("Jack London")));
    }

    if calendar.first_friday {
        out.push(ShockRequest::system(RippleTrigger::FirstFriday, Some("KONO")));
    }
    if calendar.creation_day {
        out.push(ShockRequest::system(RippleTrigger::CreationDay, None));
    }

    let seasonal = match calendar.season {
        Season::Summer => Some(RippleTrigger::SummerTourism),
        Season::Winter => Some(RippleTrigger::WinterDoldrums),
        _ => None,
    };
    if let Some(trigger) = seasonal.filter(|t| !economy.has_active(*t)) {
        out.push(ShockRequest::system(trigger, None));
    }
    out
}

/// Keyword shocks from free-text events.
///
/// The event's own district wins; otherwise one is drawn from the category's
/// candidates weighted by sensitivity.
pub fn event_shocks(events: &[CityEvent], rng: &mut dyn RngCore) -> Vec<ShockRequest> {
    let mut out = Vec::new();
    for event in events {
        for trigger in match_keywords(&event.description) {
            let primary = match &event.district {
                Some(d) if !d.trim().is_empty() => Some(d.trim().to_string()),
                _ => pick_district(trigger, rng),
            };
            out.push(ShockRequest {
                trigger,
                primary_district: primary,
                source: event.description.clone(),
            });
        }
    }
    out
}

fn pick_district(trigger: RippleTrigger, rng: &mut dyn RngCore) -> Option<String> {
    let spec = trigger_spec(trigger);
    let candidates: Vec<&str> = if spec.districts.is_empty() {
        DISTRICTS.iter().map(|(d, _)| *d).collect()
    } else {
        spec.districts.to_vec()
    };
    candidates
        .choose_weighted(rng, |d| sensitivity(d))
        .ok()
        .map(|d| d.to_string())
}
