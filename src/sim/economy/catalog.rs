use crate::model::RippleTrigger;

/// Fixed parameters for one trigger category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerSpec {
    pub impact: f64,
    pub duration: u32,
    pub sectors: &'static [&'static str],
    /// Empty means every district.
    pub districts: &'static [&'static str],
}

const fn spec(
    impact: f64,
    duration: u32,
    sectors: &'static [&'static str],
    districts: &'static [&'static str],
) -> TriggerSpec {
    TriggerSpec {
        impact,
        duration,
        sectors,
        districts,
    }
}

const ALL: &[&str] = &[];
const CORE: &[&str] = &["Downtown", "Uptown", "Jack London", "Lake Merritt"];
const RETAIL: &[&str] = &["Downtown", "Uptown", "Rockridge", "Temescal"];
const ARTS: &[&str] = &["KONO", "Uptown", "Temescal"];
const STADIUM: &[&str] = &["Jack London", "Downtown"];
const INDUSTRIAL: &[&str] = &["West Oakland", "Jack London", "East Oakland"];
const NEIGHBORHOOD: &[&str] = &["Fruitvale", "East Oakland", "West Oakland", "Chinatown", "Laurel"];

/// Catalog entry for `trigger`.
pub fn trigger_spec(trigger: RippleTrigger) -> TriggerSpec {
    use RippleTrigger as T;
    match trigger {
        T::MajorInvestment => spec(15.0, 8, &["finance", "construction", "retail"], CORE),
        T::NewBusiness => spec(8.0, 6, &["retail", "services"], ALL),
        T::Construction => spec(6.0, 10, &["construction", "real-estate"], ALL),
        T::Festival => spec(7.0, 3, &["hospitality", "retail"], CORE),
        T::Championship => spec(12.0, 4, &["hospitality", "retail"], STADIUM),
        T::Layoffs => spec(-12.0, 8, &["employment"], ALL),
        T::BusinessClosure => spec(-8.0, 6, &["retail", "services"], ALL),
        T::CrimeSpike => spec(-10.0, 5, &["retail", "hospitality"], NEIGHBORHOOD),
        T::InfrastructureFailure => spec(-9.0, 4, &["transport", "utilities"], INDUSTRIAL),
        T::PopulationBoom => spec(12.0, 8, &["housing", "retail", "services"], ALL),
        T::PopulationGrowth => spec(6.0, 6, &["housing", "retail"], ALL),
        T::PopulationDecline => spec(-6.0, 6, &["housing", "retail"], ALL),
        T::PopulationExodus => spec(-12.0, 8, &["housing", "retail", "services"], ALL),
        T::WorkforceLayoffs => spec(-10.0, 6, &["employment"], ALL),
        T::WorkforcePromotions => spec(6.0, 5, &["employment"], ALL),
        T::HolidayShopping => spec(10.0, 3, &["retail"], RETAIL),
        T::HolidayFestival => spec(8.0, 2, &["hospitality", "retail"], ALL),
        T::SportsPlayoffs => spec(8.0, 3, &["hospitality", "retail"], STADIUM),
        T::SportsChampionship => spec(15.0, 4, &["hospitality", "retail"], STADIUM),
        T::FirstFriday => spec(4.0, 1, &["arts", "hospitality"], ARTS),
        T::CreationDay => spec(5.0, 1, &["hospitality", "retail"], ALL),
        T::SummerTourism => spec(6.0, 4, &["hospitality", "tourism"], ALL),
        T::WinterDoldrums => spec(-5.0, 4, &["retail", "hospitality"], ALL),
    }
}

/// Keyword → trigger table for free-text events, checked in order.
pub const KEYWORDS: &[(&str, RippleTrigger)] = &[
    ("investment", RippleTrigger::MajorInvestment),
    ("invests", RippleTrigger::MajorInvestment),
    ("championship", RippleTrigger::Championship),
    ("new business", RippleTrigger::NewBusiness),
    ("grand opening", RippleTrigger::NewBusiness),
    ("construction", RippleTrigger::Construction),
    ("groundbreaking", RippleTrigger::Construction),
    ("layoff", RippleTrigger::Layoffs),
    ("laid off", RippleTrigger::Layoffs),
    ("closure", RippleTrigger::BusinessClosure),
    ("closes", RippleTrigger::BusinessClosure),
    ("shutters", RippleTrigger::BusinessClosure),
    ("crime", RippleTrigger::CrimeSpike),
    ("robbery", RippleTrigger::CrimeSpike),
    ("shooting", RippleTrigger::CrimeSpike),
    ("festival", RippleTrigger::Festival),
    ("infrastructure failure", RippleTrigger::InfrastructureFailure),
    ("outage", RippleTrigger::InfrastructureFailure),
    ("water main", RippleTrigger::InfrastructureFailure),
    ("sinkhole", RippleTrigger::InfrastructureFailure),
];

/// Every distinct trigger named by `text`, in table order.
pub fn match_keywords(text: &str) -> Vec<RippleTrigger> {
    let text = text.to_ascii_lowercase();
    let mut found = Vec::new();
    for (keyword, trigger) in KEYWORDS {
        if text.contains(keyword) && !found.contains(trigger) {
            found.push(*trigger);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impacts_carry_their_sign() {
        assert_eq!(trigger_spec(RippleTrigger::MajorInvestment).impact, 15.0);
        assert_eq!(trigger_spec(RippleTrigger::MajorInvestment).duration, 8);
        assert!(trigger_spec(RippleTrigger::Layoffs).impact < 0.0);
        assert!(trigger_spec(RippleTrigger::NewBusiness).districts.is_empty());
    }

    #[test]
    fn keywords_find_each_trigger_once() {
        assert_eq!(
            match_keywords("Water main break causes outage near Lake Merritt"),
            vec![RippleTrigger::InfrastructureFailure]
        );
        assert_eq!(
            match_keywords("Plant closure leads to layoffs"),
            vec![RippleTrigger::Layoffs, RippleTrigger::BusinessClosure]
        );
        assert!(match_keywords("A quiet week").is_empty());
    }
}
