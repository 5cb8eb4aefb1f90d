use super::inputs::{ArcInputs, SignalStrength};
use crate::config::{ArcTuning, PhaseThresholds};
use crate::model::{ArcPhase, ArcType, Domain, SportsPhase, StoryArc};

// --- Constants ---

const HIGH_SIGNAL: f64 = 0.5;
const MEDIUM_SIGNAL: f64 = 0.2;
/// Extra push on every arc while any disruption is active.
const DISRUPTION_FLAG: f64 = 0.2;

const ILLNESS_HIGH: f64 = 0.08;
const ILLNESS_LOW: f64 = 0.05;
const MOOD_DEPRESSED: f64 = 35.0;
const MOOD_HEALTHY: f64 = 60.0;
const SENTIMENT_TENSE: f64 = -0.3;
const SENTIMENT_CALM: f64 = 0.1;
const MIGRATION_HIGH: i64 = 120;
const MIGRATION_LOW: i64 = 80;
const NIGHTLIFE_HIGH: f64 = 0.7;
const NIGHTLIFE_LOW: f64 = 0.5;
const ENGAGEMENT_HIGH: f64 = 0.7;
const CULTURE_HIGH: f64 = 0.8;

/// Damping from peaceful holidays and community special days.
const CALM_DAY_DAMPING: f64 = -0.3;
/// Crowd holidays on safety-type arcs.
const CROWD_PRESSURE: f64 = 0.4;
/// Championship periods on economic arcs.
const CHAMPIONSHIP_DAMPING: f64 = -0.3;

pub fn base_adjustment(inputs: &ArcInputs) -> f64 {
    let signal = match inputs.strength {
        SignalStrength::High => HIGH_SIGNAL,
        SignalStrength::Medium => MEDIUM_SIGNAL,
        SignalStrength::Low => 0.0,
    };
    let flag = if inputs.chaos > 0 { DISRUPTION_FLAG } else { 0.0 };
    signal + flag
}

/// Per-type tracking of the metric each arc type follows.
pub fn type_adjustment(arc: &StoryArc, inputs: &ArcInputs) -> f64 {
    match arc.arc_type {
        ArcType::HealthCrisis => {
            if inputs.illness >= ILLNESS_HIGH {
                0.6
            } else if inputs.illness < ILLNESS_LOW {
                -0.5
            } else {
                0.0
            }
        }
        ArcType::Infrastructure => {
            if inputs.weather.is_severe() {
                0.8
            } else if inputs.weather.is_notable() {
                0.3
            } else {
                -0.4
            }
        }
        ArcType::BusinessDisruption => {
            let mood = inputs.local_mood(arc.district.as_deref());
            if mood < MOOD_DEPRESSED {
                0.5
            } else if mood > MOOD_HEALTHY {
                -0.5
            } else {
                0.0
            }
        }
        ArcType::SafetyConcern | ArcType::PatternWave | ArcType::Instability => {
            if inputs.sentiment < SENTIMENT_TENSE {
                0.4
            } else if inputs.sentiment > SENTIMENT_CALM {
                -0.3
            } else {
                0.0
            }
        }
        ArcType::Crisis => match inputs.chaos {
            0 => -0.4,
            n if n >= 4 => 0.6,
            _ => 0.0,
        },
        ArcType::Strain => {
            let magnitude = inputs.migration.abs();
            if magnitude >= MIGRATION_HIGH {
                0.4
            } else if magnitude < MIGRATION_LOW {
                -0.3
            } else {
                0.0
            }
        }
        ArcType::NightlifeSurge => {
            if inputs.nightlife >= NIGHTLIFE_HIGH {
                0.3
            } else if inputs.nightlife < NIGHTLIFE_LOW {
                -0.3
            } else {
                0.0
            }
        }
        ArcType::SportsFever => match inputs.sports_phase {
            SportsPhase::Championship => 1.0,
            SportsPhase::Playoffs => 0.5,
            SportsPhase::LateSeason => 0.0,
            SportsPhase::Off => -1.0,
            _ => -0.2,
        },
        ArcType::Community if inputs.community >= ENGAGEMENT_HIGH => 0.2,
        ArcType::CulturalMoment if inputs.culture >= CULTURE_HIGH => 0.2,
        _ => 0.0,
    }
}

pub fn calendar_adjustment(arc: &StoryArc, inputs: &ArcInputs) -> f64 {
    let calendar = &inputs.calendar;
    let mut delta = 0.0;
    let calm = calendar.holiday.is_peaceful() || calendar.is_special_day();
    if calm && !arc.arc_type.is_celebratory() {
        delta += CALM_DAY_DAMPING;
    }
    if calendar.holiday.is_crowd() && arc.arc_type.is_safety_type() {
        delta += CROWD_PRESSURE;
    }
    if inputs.sports_phase == SportsPhase::Championship
        && arc.effective_domain() == Domain::Economic
    {
        delta += CHAMPIONSHIP_DAMPING;
    }
    delta
}

/// One full tension step for a live arc. `colocated` is the number of other
/// live arcs in the same district.
pub fn step_tension(arc: &mut StoryArc, inputs: &ArcInputs, colocated: usize, tuning: &ArcTuning) {
    let mut delta = base_adjustment(inputs)
        + type_adjustment(arc, inputs)
        + calendar_adjustment(arc, inputs)
        + colocated as f64 * tuning.interference_step;

    if !arc.arc_type.is_decay_exempt() {
        delta -= tuning.passive_decay;
    }
    if arc.age > tuning.fatigue_start_age {
        delta -= tuning.fatigue_rate * (arc.age - tuning.fatigue_start_age) as f64;
    }
    arc.set_tension(arc.tension + delta);
}

/// The phase the arc should move to, if any. `Resolved` means a natural end.
pub fn next_phase(arc: &StoryArc, t: &PhaseThresholds) -> Option<ArcPhase> {
    let (tension, age) = (arc.tension, arc.age);
    let next = match arc.phase {
        ArcPhase::Early if tension >= t.rising_tension && age >= t.rising_age => {
            Some(ArcPhase::Rising)
        }
        ArcPhase::Rising if tension >= t.peak_tension && age >= t.peak_age => Some(ArcPhase::Peak),
        ArcPhase::Rising if tension < t.rising_collapse_tension => Some(ArcPhase::Falling),
        ArcPhase::Peak if age >= t.peak_exit_age || tension < t.peak_exit_tension => {
            Some(ArcPhase::Falling)
        }
        ArcPhase::Falling if age >= t.resolve_age || tension < t.resolve_tension => {
            Some(ArcPhase::Resolved)
        }
        _ => None,
    };
    match next {
        Some(phase) => Some(phase),
        None if arc.phase != ArcPhase::Resolved
            && tension < t.lenient_tension
            && age >= t.lenient_age =>
        {
            Some(ArcPhase::Resolved)
        }
        None => None,
    }
}
