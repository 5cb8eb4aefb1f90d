use std::collections::BTreeMap;

use proptest::prelude::*;

use civic_cycle::model::*;
use civic_cycle::scenario::Scenario;
use civic_cycle::sim::legislature::{
    SWING_MAX, SWING_MIN, VoteRequirement, primary_swing_probability,
    secondary_swing_probability,
};
use civic_cycle::testutil::{assert_no_duplicate_arcs, assert_world_bounds, run_cycles};
use civic_cycle::{CycleRunner, SimConfig};

const PHASES: [SportsPhase; 6] = [
    SportsPhase::Off,
    SportsPhase::Preseason,
    SportsPhase::Regular,
    SportsPhase::LateSeason,
    SportsPhase::Playoffs,
    SportsPhase::Championship,
];

#[derive(Debug, Clone)]
struct Inputs {
    sentiment: f64,
    chaos: usize,
    illness: f64,
    migration: i64,
    weather: f64,
    mood: f64,
    prior_drift: f64,
    phase: usize,
    layoffs: u32,
}

fn inputs() -> impl Strategy<Value = Inputs> {
    (
        -1.0..=1.0f64,
        0usize..7,
        0.0..0.2f64,
        -400i64..400,
        0.8..2.0f64,
        0.0..=100.0f64,
        -50.0..=50.0f64,
        0usize..6,
        0u32..6,
    )
        .prop_map(
            |(sentiment, chaos, illness, migration, weather, mood, prior_drift, phase, layoffs)| {
                Inputs {
                    sentiment,
                    chaos,
                    illness,
                    migration,
                    weather,
                    mood,
                    prior_drift,
                    phase,
                    layoffs,
                }
            },
        )
}

fn world_from(inputs: &Inputs) -> WorldState {
    let mut s = Scenario::at_cycle(0);
    s.standard_council();
    s.initiative("INIT-1", "Transit Levy").vote_cycle(2).swing("Ind A");
    s.mood(inputs.mood).prior_drift(inputs.prior_drift);
    s.environment(|e| {
        e.sentiment = inputs.sentiment;
        e.weather = Weather::new("storm", inputs.weather);
        e.calendar.sports_phase = PHASES[inputs.phase];
    });
    for i in 0..inputs.chaos {
        s.chaos(&format!("Protest {i} blocks downtown"));
    }
    s.population(|p| {
        p.illness_rate = inputs.illness;
        p.migration = inputs.migration;
    });
    s.workforce(|w| w.layoffs = inputs.layoffs);
    s.build()
}

proptest! {
    #[test]
    fn bounded_quantities_stay_in_range(inputs in inputs(), seed in 0u64..1_000) {
        let mut world = world_from(&inputs);
        run_cycles(&mut world, 6, seed);
        assert_world_bounds(&world);
        assert_no_duplicate_arcs(&world);
        prop_assert!(world.active_arcs().count() <= 10);
    }

    #[test]
    fn resolved_arcs_never_change(inputs in inputs(), seed in 0u64..1_000) {
        let mut world = world_from(&inputs);
        let mut runner = CycleRunner::new(SimConfig::seeded(seed));
        let mut closed: BTreeMap<String, StoryArc> = BTreeMap::new();
        for _ in 0..10 {
            runner.step(&mut world);
            for arc in &world.arcs {
                match closed.get(&arc.id) {
                    Some(before) => prop_assert_eq!(arc, before),
                    None if arc.is_resolved() => {
                        closed.insert(arc.id.clone(), arc.clone());
                    }
                    None => {}
                }
            }
            prop_assert!(closed.keys().all(|id| world.arc(id).is_some()));
        }
    }

    #[test]
    fn ripple_strength_only_decays(
        impact in -20.0..20.0f64,
        duration in 1u32..12,
        start in 0u32..50,
    ) {
        let ripple = EconomicRipple {
            id: "RPL-test".to_string(),
            trigger: RippleTrigger::Construction,
            impact,
            sectors: Vec::new(),
            districts: Vec::new(),
            primary_district: None,
            start_cycle: start,
            end_cycle: start + duration,
            current_strength: impact,
            source: "test".to_string(),
            calendar: CalendarSnapshot::default(),
        };
        let mut last = ripple.strength_at(start).abs();
        prop_assert!((last - impact.abs()).abs() < 1e-9);
        for cycle in start + 1..=start + duration {
            let now = ripple.strength_at(cycle).abs();
            prop_assert!(now <= last + 1e-12);
            last = now;
        }
        prop_assert_eq!(ripple.strength_at(start + duration), 0.0);
        prop_assert!(ripple.is_expired(start + duration));
    }

    #[test]
    fn swing_probabilities_are_clamped(
        sentiment in -1.0..=1.0f64,
        supermajority in any::<bool>(),
        idx in 0usize..6,
    ) {
        let projections =
            ["likely pass", "lean fail", "toss up", "needs swing", "", "unknown text"];
        let p = primary_swing_probability(projections[idx], sentiment, supermajority);
        prop_assert!((SWING_MIN..=SWING_MAX).contains(&p));
        let q = secondary_swing_probability(projections[idx], sentiment);
        prop_assert!((SWING_MIN..=SWING_MAX).contains(&q));
    }

    #[test]
    fn vote_requirements_parse(required in 1u32..15, extra in 0u32..6) {
        let of = required + extra;
        let parsed = VoteRequirement::parse(&format!("{required}-of-{of}"));
        prop_assert_eq!(parsed, Some(VoteRequirement { required, of }));
        prop_assert_eq!(parsed.unwrap().is_supermajority(), 3 * required >= 2 * of);
    }
}
