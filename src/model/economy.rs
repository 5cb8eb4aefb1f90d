use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::calendar::{Holiday, Season, SportsPhase};

/// Neutral economic mood.
pub const MOOD_NEUTRAL: f64 = 50.0;

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// Named category of economic shock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RippleTrigger {
    MajorInvestment,
    NewBusiness,
    Construction,
    Festival,
    Championship,
    Layoffs,
    BusinessClosure,
    CrimeSpike,
    InfrastructureFailure,
    PopulationBoom,
    PopulationGrowth,
    PopulationDecline,
    PopulationExodus,
    WorkforceLayoffs,
    WorkforcePromotions,
    HolidayShopping,
    HolidayFestival,
    SportsPlayoffs,
    SportsChampionship,
    FirstFriday,
    CreationDay,
    SummerTourism,
    WinterDoldrums,
}

string_enum!(RippleTrigger {
    MajorInvestment => "major-investment",
    NewBusiness => "new-business",
    Construction => "construction",
    Festival => "festival",
    Championship => "championship",
    Layoffs => "layoffs",
    BusinessClosure => "business-closure",
    CrimeSpike => "crime-spike",
    InfrastructureFailure => "infrastructure-failure",
    PopulationBoom => "population-boom",
    PopulationGrowth => "population-growth",
    PopulationDecline => "population-decline",
    PopulationExodus => "population-exodus",
    WorkforceLayoffs => "workforce-layoffs",
    WorkforcePromotions => "workforce-promotions",
    HolidayShopping => "holiday-shopping",
    HolidayFestival => "holiday-festival",
    SportsPlayoffs => "sports-playoffs",
    SportsChampionship => "sports-championship",
    FirstFriday => "first-friday",
    CreationDay => "creation-day",
    SummerTourism => "summer-tourism",
    WinterDoldrums => "winter-doldrums",
});

// ---------------------------------------------------------------------------
// Ripples
// ---------------------------------------------------------------------------

/// Calendar state at the moment a ripple was created.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSnapshot {
    pub season: Season,
    pub holiday: Holiday,
    pub sports_phase: SportsPhase,
    pub first_friday: bool,
    pub creation_day: bool,
}

/// A timed economic impulse that decays linearly to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EconomicRipple {
    #[serde(rename = "RippleID")]
    pub id: String,
    pub trigger: RippleTrigger,
    pub impact: f64,
    #[serde(default)]
    pub sectors: Vec<String>,
    /// Empty means every district.
    #[serde(default)]
    pub districts: Vec<String>,
    #[serde(default)]
    pub primary_district: Option<String>,
    pub start_cycle: u32,
    pub end_cycle: u32,
    pub current_strength: f64,
    /// Source event text, or "system".
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub calendar: CalendarSnapshot,
}

impl EconomicRipple {
    pub fn duration(&self) -> u32 {
        self.end_cycle.saturating_sub(self.start_cycle)
    }

    pub fn is_positive(&self) -> bool {
        self.impact > 0.0
    }

    /// Strength at `cycle`: `impact × (1 − elapsed/duration)`, 0 once elapsed.
    pub fn strength_at(&self, cycle: u32) -> f64 {
        let duration = self.duration();
        let elapsed = cycle.saturating_sub(self.start_cycle);
        if duration == 0 || elapsed >= duration {
            return 0.0;
        }
        self.impact * (1.0 - elapsed as f64 / duration as f64)
    }

    pub fn is_expired(&self, cycle: u32) -> bool {
        cycle.saturating_sub(self.start_cycle) >= self.duration()
    }

    pub fn affects(&self, district: &str) -> bool {
        self.districts.is_empty() || self.districts.iter().any(|d| d.eq_ignore_ascii_case(district))
    }

    pub fn is_primary(&self, district: &str) -> bool {
        self.primary_district
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(district))
    }
}

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MoodDescriptor {
    Struggling,
    Weak,
    #[default]
    Stable,
    Strong,
    Thriving,
}

string_enum!(MoodDescriptor {
    Struggling => "struggling",
    Weak => "weak",
    Stable => "stable",
    Strong => "strong",
    Thriving => "thriving",
});

impl MoodDescriptor {
    pub fn from_mood(mood: f64) -> Self {
        if mood < 25.0 {
            MoodDescriptor::Struggling
        } else if mood < 40.0 {
            MoodDescriptor::Weak
        } else if mood < 60.0 {
            MoodDescriptor::Stable
        } else if mood < 75.0 {
            MoodDescriptor::Strong
        } else {
            MoodDescriptor::Thriving
        }
    }
}

/// Derived per-district economy, rebuilt every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictEconomy {
    pub mood: f64,
    pub descriptor: MoodDescriptor,
    pub active_ripples: u32,
    pub holiday_zone: bool,
    pub sports_zone: bool,
}

impl DistrictEconomy {
    pub fn neutral() -> Self {
        Self {
            mood: MOOD_NEUTRAL,
            descriptor: MoodDescriptor::Stable,
            active_ripples: 0,
            holiday_zone: false,
            sports_zone: false,
        }
    }

    pub fn set_mood(&mut self, mood: f64) {
        self.mood = mood.clamp(0.0, 100.0);
        self.descriptor = MoodDescriptor::from_mood(self.mood);
    }
}

/// City economy: mood scalar, active ripples, and district economies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyState {
    pub mood: f64,
    pub descriptor: MoodDescriptor,
    pub ripples: Vec<EconomicRipple>,
    pub districts: BTreeMap<String, DistrictEconomy>,
}

impl Default for EconomyState {
    fn default() -> Self {
        Self {
            mood: MOOD_NEUTRAL,
            descriptor: MoodDescriptor::Stable,
            ripples: Vec::new(),
            districts: BTreeMap::new(),
        }
    }
}

impl EconomyState {
    pub fn set_mood(&mut self, mood: f64) {
        self.mood = mood.clamp(0.0, 100.0);
        self.descriptor = MoodDescriptor::from_mood(self.mood);
    }

    pub fn has_active(&self, trigger: RippleTrigger) -> bool {
        self.ripples.iter().any(|r| r.trigger == trigger)
    }

    pub fn district_mood(&self, district: &str) -> f64 {
        self.districts
            .get(district)
            .map(|d| d.mood)
            .unwrap_or(self.mood)
    }
}
