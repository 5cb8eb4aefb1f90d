use super::inputs::ArcInputs;
use crate::config::ArcTuning;
use crate::model::{Domain, Holiday, ResolutionType, Season, SportsPhase, StoryArc};
use crate::sim::signal::ResolutionSeed;

// --- Constants ---

const ILLNESS_CLEAR: f64 = 0.05;
const ILLNESS_EASING: f64 = 0.06;
const ILLNESS_EASING_AGE: u32 = 4;
const ILLNESS_EASING_TENSION: f64 = 4.0;

const MOOD_RECOVERED: f64 = 55.0;
/// Mood that suffices during championship or shopping windows.
const MOOD_WINDOW: f64 = 50.0;
const EMPLOYMENT_RECOVERED: f64 = 0.92;

const MIGRATION_SETTLED: i64 = 80;

const SENTIMENT_SETTLED: f64 = -0.15;
const SENTIMENT_SPECIAL_DAY: f64 = -0.3;

const CRISIS_MAX_CHAOS: usize = 1;
const CRISIS_TENSION: f64 = 3.0;
const CRISIS_AGE: u32 = 4;

/// A resolution the rules decided on: type plus human-readable reason.
pub type Verdict = (ResolutionType, String);

/// Domain-specific end condition, checked before the generic step.
pub fn check_condition(arc: &StoryArc, inputs: &ArcInputs) -> Option<Verdict> {
    use ResolutionType::{Calendar, Condition};

    match arc.effective_domain() {
        Domain::Health => {
            if inputs.illness < ILLNESS_CLEAR {
                let reason = format!("illness rate fell to {:.1}%", inputs.illness * 100.0);
                return Some((Condition, reason));
            }
            if inputs.illness < ILLNESS_EASING
                && arc.age >= ILLNESS_EASING_AGE
                && arc.tension < ILLNESS_EASING_TENSION
            {
                let reason = format!("illness rate eased to {:.1}%", inputs.illness * 100.0);
                return Some((Condition, reason));
            }
            if arc.season_created == Some(Season::Winter)
                && inputs.calendar.season != Season::Winter
            {
                return Some((Calendar, "winter illness season ended".to_string()));
            }
            None
        }
        Domain::Economic => {
            if inputs.mood > MOOD_RECOVERED {
                return Some((Condition, format!("economic mood recovered to {:.0}", inputs.mood)));
            }
            if inputs.employment > EMPLOYMENT_RECOVERED {
                return Some((
                    Condition,
                    format!("employment climbed to {:.1}%", inputs.employment * 100.0),
                ));
            }
            let window = inputs.sports_phase == SportsPhase::Championship
                || inputs.calendar.holiday.is_shopping();
            if window && inputs.mood > MOOD_WINDOW {
                return Some((Calendar, "seasonal spending lifted local business".to_string()));
            }
            None
        }
        Domain::Demographic => {
            if inputs.migration.abs() < MIGRATION_SETTLED {
                return Some((Condition, "population movement settled".to_string()));
            }
            let travel = arc
                .calendar_trigger
                .as_deref()
                .and_then(|tag| tag.strip_prefix("holiday:"))
                .and_then(|h| Holiday::try_from(h.to_string()).ok())
                .filter(|h| h.is_travel());
            match travel {
                Some(h) if h != inputs.calendar.holiday => {
                    Some((Calendar, format!("{h} travel period ended")))
                }
                _ => None,
            }
        }
        Domain::Safety => {
            if inputs.sentiment > SENTIMENT_SETTLED {
                return Some((Condition, "public sentiment steadied".to_string()));
            }
            if inputs.calendar.is_special_day() && inputs.sentiment > SENTIMENT_SPECIAL_DAY {
                return Some((Calendar, "community day brought neighbors together".to_string()));
            }
            None
        }
        Domain::Infrastructure => (!inputs.weather.is_notable())
            .then(|| (Condition, format!("weather normalized ({})", inputs.weather.kind))),
        Domain::Crisis => (inputs.chaos <= CRISIS_MAX_CHAOS
            && arc.tension < CRISIS_TENSION
            && arc.age >= CRISIS_AGE)
            .then(|| (Condition, "disruptions subsided".to_string())),
        _ => None,
    }
}

/// Hard timeout for old, low-tension arcs.
pub fn check_timeout(arc: &StoryArc, tuning: &ArcTuning) -> Option<Verdict> {
    (arc.age >= tuning.timeout_age && arc.tension < tuning.timeout_tension).then(|| {
        (
            ResolutionType::Timeout,
            format!("faded out after {} cycles", arc.age),
        )
    })
}

/// Reason for a natural end reached through the phase machine.
pub fn natural_reason(arc: &StoryArc, tuning: &ArcTuning) -> String {
    if arc.age >= tuning.phases.resolve_age {
        format!("ran its course after {} cycles", arc.age)
    } else {
        format!("tension eased to {:.1}", arc.tension)
    }
}

/// Narrative seed for a resolved arc.
pub fn resolution_seed(arc: &StoryArc) -> ResolutionSeed {
    let place = match &arc.district {
        Some(d) => format!("in {d}"),
        None => "citywide".to_string(),
    };
    let resolution = arc.resolution.unwrap_or(ResolutionType::Natural);
    ResolutionSeed {
        arc_id: arc.id.clone(),
        arc_type: arc.arc_type,
        district: arc.district.clone(),
        resolution,
        reason: arc.resolution_reason.clone(),
        headline: format!("{} {place} resolved: {}", arc.arc_type, arc.resolution_reason),
    }
}
