use std::collections::BTreeMap;

use crate::config::SimConfig;
use crate::model::{Calendar, SportsPhase, Weather, WorldState};

/// Chaos events at or above which the cycle is high-signal.
const HIGH_SIGNAL_CHAOS: usize = 3;
/// Sentiment magnitude at or above which the cycle is high-signal.
const HIGH_SIGNAL_SENTIMENT: f64 = 0.6;
/// Total domain activity at or above which a quiet cycle is medium-signal.
const MEDIUM_SIGNAL_ACTIVITY: u32 = 5;

/// How loud the city is this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignalStrength {
    Low,
    Medium,
    High,
}

/// Everything the arc engine reads, gathered once per cycle after the other
/// engines have run.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcInputs {
    pub cycle: u32,
    pub calendar: Calendar,
    /// Calendar phase after any manual override.
    pub sports_phase: SportsPhase,
    pub weather: Weather,
    pub chaos: usize,
    pub sentiment: f64,
    pub culture: f64,
    pub community: f64,
    pub nightlife: f64,
    pub illness: f64,
    pub employment: f64,
    /// Raw net population change.
    pub migration: i64,
    pub mood: f64,
    pub district_moods: BTreeMap<String, f64>,
    pub crime_activity: u32,
    pub education_activity: u32,
    pub sports_activity: u32,
    pub strength: SignalStrength,
}

impl ArcInputs {
    pub fn gather(world: &WorldState, config: &SimConfig) -> Self {
        let env = &world.environment;
        let chaos = env.chaos_count();
        let total_activity: u32 = world.domain_activity.values().sum();

        let strength = if chaos >= HIGH_SIGNAL_CHAOS
            || env.weather.is_severe()
            || env.sentiment.abs() >= HIGH_SIGNAL_SENTIMENT
        {
            SignalStrength::High
        } else if chaos > 0
            || env.weather.is_notable()
            || total_activity >= MEDIUM_SIGNAL_ACTIVITY
        {
            SignalStrength::Medium
        } else {
            SignalStrength::Low
        };

        Self {
            cycle: world.cycle,
            calendar: env.calendar.clone(),
            sports_phase: config.sports_phase(env.calendar.sports_phase),
            weather: env.weather.clone(),
            chaos,
            sentiment: env.sentiment,
            culture: env.culture,
            community: env.community_engagement,
            nightlife: env.nightlife,
            illness: world.population.illness_rate,
            employment: world.population.employment_rate,
            migration: world.population.migration,
            mood: world.economy.mood,
            district_moods: world
                .economy
                .districts
                .iter()
                .map(|(d, e)| (d.clone(), e.mood))
                .collect(),
            crime_activity: world.activity("crime"),
            education_activity: world.activity("education"),
            sports_activity: world.activity("sports"),
            strength,
        }
    }

    /// Local economic mood, falling back to the city mood.
    pub fn local_mood(&self, district: Option<&str>) -> f64 {
        district
            .and_then(|d| self.district_moods.get(d))
            .copied()
            .unwrap_or(self.mood)
    }

    /// The district with the lowest local mood.
    pub fn weakest_district(&self) -> Option<&str> {
        self.district_moods
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(d, _)| d.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CityEvent;

    #[test]
    fn signal_strength_tiers() {
        let mut world = WorldState::new();
        let config = SimConfig::default();
        assert_eq!(ArcInputs::gather(&world, &config).strength, SignalStrength::Low);

        world.environment.chaos.push(CityEvent::new("Protest downtown"));
        assert_eq!(ArcInputs::gather(&world, &config).strength, SignalStrength::Medium);

        world.environment.sentiment = -0.7;
        assert_eq!(ArcInputs::gather(&world, &config).strength, SignalStrength::High);
    }

    #[test]
    fn local_mood_falls_back_to_city() {
        let mut world = WorldState::new();
        world.economy.set_mood(42.0);
        let mut downtown = crate::model::DistrictEconomy::neutral();
        downtown.set_mood(30.0);
        world.economy.districts.insert("Downtown".to_string(), downtown);
        let inputs = ArcInputs::gather(&world, &SimConfig::default());
        assert_eq!(inputs.local_mood(Some("Downtown")), 30.0);
        assert_eq!(inputs.local_mood(Some("Nowhere")), 42.0);
        assert_eq!(inputs.local_mood(None), 42.0);
        assert_eq!(inputs.weakest_district(), Some("Downtown"));
    }
}
