use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use super::inputs::ArcInputs;
use crate::config::ArcTuning;
use crate::model::arc::TENSION_MAX;
use crate::model::{
    ArcPhase, ArcType, Holiday, HolidayPriority, SportsPhase, StoryArc, WorldState,
};

// --- Trigger thresholds ---

const ILLNESS_TRIGGER: f64 = 0.08;
const WEATHER_TRIGGER: f64 = 1.4;
const CRISIS_CHAOS: usize = 4;
const INSTABILITY_CHAOS: usize = 2;
const INSTABILITY_SENTIMENT: f64 = -0.2;
const SAFETY_SENTIMENT: f64 = -0.4;
const SAFETY_CHAOS: usize = 3;
const CRIME_ACTIVITY: u32 = 3;
const BUSINESS_MOOD: f64 = 35.0;
const STRAIN_MIGRATION: i64 = 120;
const ENGAGEMENT_TRIGGER: f64 = 0.75;
const EDUCATION_ACTIVITY: u32 = 3;
const NIGHTLIFE_TRIGGER: f64 = 0.75;
const CULTURE_TRIGGER: f64 = 0.8;
const SPORTS_ACTIVITY: u32 = 3;

/// Tension added to a live sports-fever arc each championship cycle.
pub const CHAMPIONSHIP_INTENSIFY: f64 = 2.0;

/// How a proposed arc picks its district.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    CityWide,
    Fixed(String),
    /// Weighted draw from the type's affinity table.
    Affinity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub arc_type: ArcType,
    pub placement: Placement,
    pub calendar_trigger: Option<String>,
}

impl Proposal {
    fn new(arc_type: ArcType, placement: Placement) -> Self {
        Self {
            arc_type,
            placement,
            calendar_trigger: None,
        }
    }

    fn calendar(arc_type: ArcType, placement: Placement, tag: Option<String>) -> Self {
        Self {
            arc_type,
            placement,
            calendar_trigger: tag,
        }
    }
}

/// District weights per arc type.
pub fn affinity(arc_type: ArcType) -> &'static [(&'static str, f64)] {
    match arc_type {
        ArcType::HealthCrisis => &[
            ("East Oakland", 3.0),
            ("Fruitvale", 2.0),
            ("West Oakland", 2.0),
            ("Chinatown", 1.0),
        ],
        ArcType::Infrastructure => &[
            ("West Oakland", 3.0),
            ("Jack London", 2.0),
            ("East Oakland", 2.0),
            ("Downtown", 1.0),
        ],
        ArcType::SafetyConcern => &[
            ("Downtown", 3.0),
            ("East Oakland", 3.0),
            ("West Oakland", 2.0),
            ("Uptown", 1.0),
        ],
        ArcType::PatternWave => &[("East Oakland", 3.0), ("Fruitvale", 2.0), ("Downtown", 2.0)],
        ArcType::Strain => &[
            ("Fruitvale", 2.0),
            ("East Oakland", 2.0),
            ("Temescal", 1.0),
            ("Laurel", 1.0),
        ],
        ArcType::Community => &[
            ("Laurel", 2.0),
            ("Temescal", 2.0),
            ("Fruitvale", 2.0),
            ("Lake Merritt", 1.0),
        ],
        ArcType::EducationWave => &[("Rockridge", 2.0), ("Temescal", 2.0), ("Lake Merritt", 1.0)],
        ArcType::NightlifeSurge => &[("Uptown", 3.0), ("Jack London", 2.0), ("Temescal", 1.0)],
        ArcType::CulturalMoment => &[
            ("KONO", 2.0),
            ("Uptown", 2.0),
            ("Chinatown", 1.0),
            ("Fruitvale", 1.0),
        ],
        ArcType::Celebration => &[("Lake Merritt", 2.0), ("Downtown", 2.0)],
        ArcType::ArtsWalk => &[("KONO", 3.0), ("Uptown", 2.0), ("Temescal", 1.0)],
        ArcType::Rivalry => &[("Jack London", 2.0), ("Downtown", 1.0)],
        _ => &[],
    }
}

/// Evaluate the ordered trigger list. Championship intensification is
/// handled by the caller.
pub fn proposals(inputs: &ArcInputs) -> Vec<Proposal> {
    use Placement::{Affinity, CityWide, Fixed};

    let mut out = Vec::new();
    let calendar = &inputs.calendar;
    let tag = calendar.trigger_tag();
    let holiday = calendar.holiday;

    if inputs.illness >= ILLNESS_TRIGGER {
        out.push(Proposal::new(ArcType::HealthCrisis, Affinity));
    }
    if inputs.weather.impact >= WEATHER_TRIGGER {
        out.push(Proposal::new(ArcType::Infrastructure, Affinity));
    }
    if inputs.chaos >= CRISIS_CHAOS {
        out.push(Proposal::new(ArcType::Crisis, CityWide));
    }
    if inputs.chaos >= INSTABILITY_CHAOS && inputs.sentiment < INSTABILITY_SENTIMENT {
        out.push(Proposal::new(ArcType::Instability, CityWide));
    }
    if inputs.sentiment <= SAFETY_SENTIMENT || inputs.chaos >= SAFETY_CHAOS {
        out.push(Proposal::new(ArcType::SafetyConcern, Affinity));
    }
    if inputs.crime_activity >= CRIME_ACTIVITY {
        out.push(Proposal::new(ArcType::PatternWave, Affinity));
    }
    if inputs.mood <= BUSINESS_MOOD {
        let placement = inputs
            .weakest_district()
            .map(|d| Fixed(d.to_string()))
            .unwrap_or(CityWide);
        out.push(Proposal::new(ArcType::BusinessDisruption, placement));
    }
    if inputs.migration.abs() >= STRAIN_MIGRATION {
        let trigger = holiday.is_travel().then(|| tag.clone()).flatten();
        out.push(Proposal::calendar(ArcType::Strain, Affinity, trigger));
    }
    if inputs.community >= ENGAGEMENT_TRIGGER {
        out.push(Proposal::new(ArcType::Community, Affinity));
    }
    if inputs.education_activity >= EDUCATION_ACTIVITY {
        out.push(Proposal::new(ArcType::EducationWave, Affinity));
    }
    if inputs.nightlife >= NIGHTLIFE_TRIGGER {
        out.push(Proposal::new(ArcType::NightlifeSurge, Affinity));
    }
    if inputs.culture >= CULTURE_TRIGGER {
        out.push(Proposal::new(ArcType::CulturalMoment, Affinity));
    }

    if holiday.is_cultural() {
        if let Some(zone) = holiday.zone_district() {
            out.push(Proposal::calendar(ArcType::Festival, Fixed(zone.to_string()), tag.clone()));
        }
    }
    if calendar.priority == HolidayPriority::Major && !holiday.is_none() && !holiday.is_cultural() {
        out.push(Proposal::calendar(ArcType::Celebration, Affinity, tag.clone()));
    }
    if matches!(holiday, Holiday::Independence | Holiday::Pride) {
        let zone = holiday.zone_district().unwrap_or("Downtown");
        out.push(Proposal::calendar(ArcType::Parade, Fixed(zone.to_string()), tag.clone()));
    }
    if calendar.first_friday {
        out.push(Proposal::calendar(
            ArcType::ArtsWalk,
            Affinity,
            Some("first-friday".to_string()),
        ));
    }
    if calendar.creation_day {
        out.push(Proposal::calendar(
            ArcType::Heritage,
            Fixed("Lake Merritt".to_string()),
            Some("creation-day".to_string()),
        ));
    } else if holiday == Holiday::Juneteenth {
        out.push(Proposal::calendar(
            ArcType::Heritage,
            Fixed("West Oakland".to_string()),
            tag.clone(),
        ));
    }

    match inputs.sports_phase {
        SportsPhase::Playoffs | SportsPhase::Championship => {
            out.push(Proposal::new(ArcType::SportsFever, Fixed("Jack London".to_string())));
        }
        SportsPhase::Regular | SportsPhase::LateSeason
            if inputs.sports_activity >= SPORTS_ACTIVITY =>
        {
            out.push(Proposal::new(ArcType::Rivalry, Affinity));
        }
        _ => {}
    }
    out
}

/// Resolve a placement to a district. Types with no affinity table are
/// city-wide.
pub fn place(proposal: &Proposal, rng: &mut dyn RngCore) -> Option<String> {
    match &proposal.placement {
        Placement::CityWide => None,
        Placement::Fixed(d) => Some(d.clone()),
        Placement::Affinity => affinity(proposal.arc_type)
            .choose_weighted(rng, |(_, w)| *w)
            .ok()
            .map(|(d, _)| d.to_string()),
    }
}

/// A live arc of the same type already covers this district. Sports fever is
/// one story for the whole city, wherever it is placed.
pub fn is_duplicate(world: &WorldState, arc_type: ArcType, district: Option<&str>) -> bool {
    world.active_arcs().any(|a| {
        a.arc_type == arc_type
            && (arc_type == ArcType::SportsFever
                || match (a.district.as_deref(), district) {
                    (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
                    (None, None) => true,
                    _ => false,
                })
    })
}

/// Build a fresh arc with a randomized initial tension and a unique id.
pub fn create_arc(
    world: &mut WorldState,
    proposal: &Proposal,
    district: Option<String>,
    inputs: &ArcInputs,
    tuning: &ArcTuning,
    rng: &mut dyn RngCore,
) -> StoryArc {
    let id = loop {
        let candidate = format!("ARC-{:04}", world.id_gen.next_id());
        if world.arc(&candidate).is_none() {
            break candidate;
        }
    };
    let (lo, hi) = (tuning.initial_tension_min, tuning.initial_tension_max);
    let tension = if lo < hi {
        rng.random_range(lo..hi)
    } else {
        lo
    }
    .clamp(0.0, TENSION_MAX);
    StoryArc {
        id,
        arc_type: proposal.arc_type,
        phase: ArcPhase::Early,
        tension,
        district,
        domain: Some(proposal.arc_type.domain()),
        age: 0,
        created_cycle: inputs.cycle,
        resolved_cycle: None,
        resolution: None,
        resolution_reason: String::new(),
        calendar_trigger: proposal.calendar_trigger.clone(),
        season_created: Some(inputs.calendar.season),
        held: false,
        last_updated: inputs.cycle,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::SimConfig;
    use crate::model::CityEvent;

    fn gather(f: impl FnOnce(&mut WorldState)) -> ArcInputs {
        let mut world = WorldState::new();
        f(&mut world);
        ArcInputs::gather(&world, &SimConfig::default())
    }

    fn types(props: &[Proposal]) -> Vec<ArcType> {
        props.iter().map(|p| p.arc_type).collect()
    }

    #[test]
    fn quiet_city_proposes_nothing() {
        assert!(proposals(&gather(|_| {})).is_empty());
    }

    #[test]
    fn triggers_fire_in_order() {
        let inputs = gather(|w| {
            w.population.illness_rate = 0.1;
            for i in 0..4 {
                w.environment.chaos.push(CityEvent::new(&format!("event {i}")));
            }
            w.environment.sentiment = -0.5;
        });
        assert_eq!(
            types(&proposals(&inputs)),
            [
                ArcType::HealthCrisis,
                ArcType::Crisis,
                ArcType::Instability,
                ArcType::SafetyConcern
            ]
        );
    }

    #[test]
    fn calendar_arcs_carry_their_tag() {
        let inputs = gather(|w| {
            w.environment.calendar.holiday = Holiday::LunarNewYear;
            w.environment.calendar.priority = HolidayPriority::Major;
        });
        let props = proposals(&inputs);
        assert_eq!(types(&props), [ArcType::Festival]);
        assert_eq!(props[0].placement, Placement::Fixed("Chinatown".to_string()));
        assert_eq!(props[0].calendar_trigger.as_deref(), Some("holiday:lunar-new-year"));
    }

    #[test]
    fn independence_brings_celebration_and_parade() {
        let inputs = gather(|w| {
            w.environment.calendar.holiday = Holiday::Independence;
            w.environment.calendar.priority = HolidayPriority::Major;
        });
        assert_eq!(
            types(&proposals(&inputs)),
            [ArcType::Celebration, ArcType::Parade]
        );
    }

    #[test]
    fn affinity_placement_uses_the_table() {
        let mut rng = SmallRng::seed_from_u64(42);
        let proposal = Proposal::new(ArcType::NightlifeSurge, Placement::Affinity);
        for _ in 0..20 {
            let d = place(&proposal, &mut rng).unwrap();
            assert!(affinity(ArcType::NightlifeSurge).iter().any(|(n, _)| *n == d));
        }
        let crisis = Proposal::new(ArcType::Crisis, Placement::Affinity);
        assert_eq!(place(&crisis, &mut rng), None);
    }

    #[test]
    fn duplicates_match_type_and_district() {
        let mut world = WorldState::new();
        world.arcs.push(StoryArc {
            id: "ARC-0001".to_string(),
            arc_type: ArcType::Crisis,
            ..StoryArc::default()
        });
        assert!(is_duplicate(&world, ArcType::Crisis, None));
        assert!(!is_duplicate(&world, ArcType::Crisis, Some("Downtown")));
        assert!(!is_duplicate(&world, ArcType::Strain, None));
    }

    #[test]
    fn sports_fever_is_one_per_city() {
        let mut world = WorldState::new();
        world.arcs.push(StoryArc {
            id: "ARC-0001".to_string(),
            arc_type: ArcType::SportsFever,
            district: Some("Downtown".to_string()),
            ..StoryArc::default()
        });
        assert!(is_duplicate(&world, ArcType::SportsFever, Some("Jack London")));
        assert!(!is_duplicate(&world, ArcType::Rivalry, Some("Downtown")));
    }

    #[test]
    fn created_arcs_start_early_with_bounded_tension() {
        let mut world = WorldState::new();
        world.cycle = 3;
        let inputs = ArcInputs::gather(&world, &SimConfig::default());
        let mut rng = SmallRng::seed_from_u64(42);
        let proposal = Proposal::new(ArcType::Community, Placement::Fixed("Laurel".to_string()));
        let laurel = Some("Laurel".to_string());
        let tuning = ArcTuning::default();
        let arc = create_arc(&mut world, &proposal, laurel, &inputs, &tuning, &mut rng);
        assert_eq!(arc.phase, ArcPhase::Early);
        assert!((2.0..4.0).contains(&arc.tension));
        assert_eq!(arc.created_cycle, 3);
        assert_eq!(arc.id, "ARC-0001");
    }

    #[test]
    fn empty_tension_range_uses_its_floor() {
        let mut world = WorldState::new();
        let inputs = ArcInputs::gather(&world, &SimConfig::default());
        let mut rng = SmallRng::seed_from_u64(42);
        let proposal = Proposal::new(ArcType::Crisis, Placement::CityWide);
        let tuning = ArcTuning {
            initial_tension_min: 5.0,
            initial_tension_max: 5.0,
            ..ArcTuning::default()
        };
        let arc = create_arc(&mut world, &proposal, None, &inputs, &tuning, &mut rng);
        assert_eq!(arc.tension, 5.0);
    }
}
