use std::collections::BTreeMap;

use crate::config::FeedbackConfig;
use crate::model::{DistrictEconomy, EconomyState, MoodDescriptor};

/// Weight of city sentiment in damping the city feedback.
const SENTIMENT_DAMPING: f64 = 0.5;
/// Factor on district feedback that pushes an extreme descriptor further.
const EXTREME_DAMPING: f64 = 0.5;

/// Nudge city mood by the drift. Returns the applied delta.
pub fn apply_city_feedback(
    economy: &mut EconomyState,
    drift: f64,
    sentiment: f64,
    config: &FeedbackConfig,
) -> f64 {
    if !config.city_enabled {
        return 0.0;
    }
    let damping = 1.0 - SENTIMENT_DAMPING * sentiment.abs().min(1.0);
    let delta = (drift * config.scale * damping).clamp(-config.max_delta, config.max_delta);
    let before = economy.mood;
    economy.set_mood(before + delta);
    economy.mood - before
}

/// Nudge each district economy by its own drift.
pub fn apply_district_feedback(
    economy: &mut EconomyState,
    drift: &BTreeMap<String, f64>,
    config: &FeedbackConfig,
) {
    if !config.district_enabled {
        return;
    }
    for (name, value) in drift {
        let district = economy
            .districts
            .entry(name.clone())
            .or_insert_with(DistrictEconomy::neutral);
        let pushes_extreme = matches!(
            (district.descriptor, *value > 0.0),
            (MoodDescriptor::Thriving, true) | (MoodDescriptor::Struggling, false)
        );
        let damping = if pushes_extreme { EXTREME_DAMPING } else { 1.0 };
        let delta = (value * config.district_scale * damping)
            .clamp(-config.district_max_delta, config.district_max_delta);
        district.set_mood(district.mood + delta);
    }
}
