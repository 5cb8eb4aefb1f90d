use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

string_enum!(Season {
    Spring => "spring",
    Summer => "summer",
    Autumn => "autumn" | "fall",
    Winter => "winter",
});

// ---------------------------------------------------------------------------
// Holidays
// ---------------------------------------------------------------------------

/// Holiday identity supplied by the external calendar provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Holiday {
    #[default]
    None,
    NewYearsDay,
    MlkDay,
    LunarNewYear,
    Valentines,
    StPatricks,
    Easter,
    CincoDeMayo,
    MothersDay,
    MemorialDay,
    Juneteenth,
    Pride,
    Independence,
    LaborDay,
    Halloween,
    DiaDeMuertos,
    VeteransDay,
    Thanksgiving,
    BlackFriday,
    Christmas,
    NewYearsEve,
}

string_enum!(Holiday {
    None => "none" | "",
    NewYearsDay => "new-years-day" | "newyear",
    MlkDay => "mlk-day" | "mlkday",
    LunarNewYear => "lunar-new-year" | "lunarnewyear",
    Valentines => "valentines" | "valentinesday",
    StPatricks => "st-patricks" | "stpatricksday",
    Easter => "easter",
    CincoDeMayo => "cinco-de-mayo" | "cincodemayo",
    MothersDay => "mothers-day" | "mothersday",
    MemorialDay => "memorial-day" | "memorialday",
    Juneteenth => "juneteenth",
    Pride => "pride",
    Independence => "independence" | "independenceday",
    LaborDay => "labor-day" | "laborday",
    Halloween => "halloween",
    DiaDeMuertos => "dia-de-muertos" | "diademuertos",
    VeteransDay => "veterans-day" | "veteransday",
    Thanksgiving => "thanksgiving",
    BlackFriday => "black-friday" | "blackfriday",
    Christmas => "christmas",
    NewYearsEve => "new-years-eve" | "newyearseve",
});

impl Holiday {
    pub fn is_none(self) -> bool {
        self == Holiday::None
    }

    /// Residents leave town.
    pub fn is_travel(self) -> bool {
        matches!(
            self,
            Holiday::NewYearsDay
                | Holiday::MemorialDay
                | Holiday::Independence
                | Holiday::LaborDay
                | Holiday::Thanksgiving
                | Holiday::Christmas
        )
    }

    /// Visitors come in for public gatherings.
    pub fn is_gathering(self) -> bool {
        matches!(
            self,
            Holiday::StPatricks
                | Holiday::CincoDeMayo
                | Holiday::Juneteenth
                | Holiday::Pride
                | Holiday::Independence
                | Holiday::Halloween
                | Holiday::NewYearsEve
        )
    }

    pub fn is_cultural(self) -> bool {
        matches!(
            self,
            Holiday::MlkDay
                | Holiday::LunarNewYear
                | Holiday::CincoDeMayo
                | Holiday::Juneteenth
                | Holiday::Pride
                | Holiday::DiaDeMuertos
        )
    }

    pub fn is_shopping(self) -> bool {
        matches!(
            self,
            Holiday::Valentines | Holiday::MothersDay | Holiday::BlackFriday | Holiday::Christmas
        )
    }

    /// Quiet, family-centred days that damp narrative tension.
    pub fn is_peaceful(self) -> bool {
        matches!(
            self,
            Holiday::NewYearsDay
                | Holiday::MlkDay
                | Holiday::Easter
                | Holiday::MothersDay
                | Holiday::VeteransDay
                | Holiday::Thanksgiving
                | Holiday::Christmas
        )
    }

    /// Large street crowds; raises tension on safety-type arcs.
    pub fn is_crowd(self) -> bool {
        matches!(
            self,
            Holiday::StPatricks
                | Holiday::CincoDeMayo
                | Holiday::Pride
                | Holiday::Independence
                | Holiday::Halloween
                | Holiday::BlackFriday
                | Holiday::NewYearsEve
        )
    }

    /// District that hosts the holiday's festival, if it has one.
    pub fn zone_district(self) -> Option<&'static str> {
        match self {
            Holiday::LunarNewYear => Some("Chinatown"),
            Holiday::CincoDeMayo | Holiday::DiaDeMuertos => Some("Fruitvale"),
            Holiday::Juneteenth => Some("West Oakland"),
            Holiday::Pride => Some("Downtown"),
            Holiday::StPatricks | Holiday::Halloween => Some("Uptown"),
            Holiday::Independence | Holiday::NewYearsEve => Some("Jack London"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum HolidayPriority {
    #[default]
    None,
    Minor,
    Major,
}

string_enum!(HolidayPriority {
    None => "none" | "",
    Minor => "minor" | "cultural",
    Major => "major" | "oakland",
});

// ---------------------------------------------------------------------------
// Sports season
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SportsPhase {
    #[default]
    Off,
    Preseason,
    Regular,
    LateSeason,
    Playoffs,
    Championship,
}

string_enum!(SportsPhase {
    Off => "off" | "offseason" | "off-season" | "",
    Preseason => "preseason" | "spring-training",
    Regular => "regular" | "regular-season",
    LateSeason => "late-season" | "pennant-race",
    Playoffs => "playoffs" | "postseason",
    Championship => "championship" | "finals",
});

impl SportsPhase {
    /// Crowd magnitude used by the population-drift engine.
    pub fn drift_magnitude(self) -> f64 {
        match self {
            SportsPhase::Off => 0.0,
            SportsPhase::Preseason => 0.5,
            SportsPhase::Regular => 1.0,
            SportsPhase::LateSeason => 2.0,
            SportsPhase::Playoffs => 4.0,
            SportsPhase::Championship => 6.0,
        }
    }

    pub fn is_postseason(self) -> bool {
        matches!(self, SportsPhase::Playoffs | SportsPhase::Championship)
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Read-only calendar signals for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calendar {
    pub season: Season,
    pub holiday: Holiday,
    pub priority: HolidayPriority,
    pub first_friday: bool,
    pub creation_day: bool,
    pub sports_phase: SportsPhase,
}

impl Calendar {
    /// Either community special day is active.
    pub fn is_special_day(&self) -> bool {
        self.first_friday || self.creation_day
    }

    /// Tag recorded on arcs and ripples that a calendar condition caused.
    pub fn trigger_tag(&self) -> Option<String> {
        if !self.holiday.is_none() {
            Some(format!("holiday:{}", self.holiday))
        } else if self.first_friday {
            Some("first-friday".to_string())
        } else if self.creation_day {
            Some("creation-day".to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holiday_parses_ledger_spellings() {
        assert_eq!(Holiday::try_from("Lunar New Year".to_string()), Ok(Holiday::LunarNewYear));
        assert_eq!(Holiday::try_from("".to_string()), Ok(Holiday::None));
        assert_eq!(Holiday::try_from("NewYearsEve".to_string()), Ok(Holiday::NewYearsEve));
        assert!(Holiday::try_from("arbor-day".to_string()).is_err());
    }

    #[test]
    fn festival_holidays_have_zones() {
        for h in [Holiday::LunarNewYear, Holiday::DiaDeMuertos, Holiday::Juneteenth] {
            assert!(h.is_cultural());
            assert!(h.zone_district().is_some(), "{h} should have a zone");
        }
        assert_eq!(Holiday::Thanksgiving.zone_district(), None);
    }

    #[test]
    fn sports_magnitude_grows_toward_championship() {
        let phases = [
            SportsPhase::Off,
            SportsPhase::Preseason,
            SportsPhase::Regular,
            SportsPhase::LateSeason,
            SportsPhase::Playoffs,
            SportsPhase::Championship,
        ];
        for pair in phases.windows(2) {
            assert!(pair[0].drift_magnitude() < pair[1].drift_magnitude());
        }
    }

    #[test]
    fn trigger_tag_prefers_holiday() {
        let cal = Calendar {
            holiday: Holiday::Pride,
            first_friday: true,
            ..Calendar::default()
        };
        assert_eq!(cal.trigger_tag().as_deref(), Some("holiday:pride"));
    }
}
