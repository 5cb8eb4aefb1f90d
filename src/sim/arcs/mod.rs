//! Situation arcs: multi-cycle storylines that rise, peak, and resolve.
//!
//! Runs last in the pipeline so it sees the economy and drift written this
//! cycle. Order inside a tick: operator interventions, then one lifecycle
//! step per live arc, then generation of new arcs.

mod generation;
mod inputs;
mod intervention;
mod resolution;
mod tension;

pub use generation::{
    CHAMPIONSHIP_INTENSIFY, Placement, Proposal, affinity, create_arc, is_duplicate, place,
    proposals,
};
pub use inputs::{ArcInputs, SignalStrength};
pub use intervention::apply_interventions;
pub use resolution::{Verdict, check_condition, check_timeout, natural_reason, resolution_seed};
pub use tension::{base_adjustment, calendar_adjustment, next_phase, step_tension, type_adjustment};

use tracing::{debug, info};

use super::context::TickContext;
use super::signal::SignalKind;
use super::system::SimSystem;
use crate::config::ArcTuning;
use crate::model::{ArcPhase, ArcType, ResolutionType, SportsPhase, StoryArc};

pub struct ArcSystem;

impl SimSystem for ArcSystem {
    fn name(&self) -> &str {
        "arcs"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let tuning = ctx.config.arcs.clone();

        for seed in apply_interventions(ctx.world, &tuning) {
            ctx.emit(SignalKind::ArcResolved(seed));
        }

        let inputs = ArcInputs::gather(ctx.world, ctx.config);
        let colocated = colocation_counts(&ctx.world.arcs);

        let mut events = Vec::new();
        for (arc, neighbours) in ctx.world.arcs.iter_mut().zip(colocated) {
            if arc.is_resolved() || arc.held {
                continue;
            }
            events.extend(advance_arc(arc, &inputs, neighbours, &tuning));
        }
        for kind in events {
            ctx.emit(kind);
        }

        generate(ctx, &inputs, &tuning);
    }
}

/// For each arc, the number of other live arcs in the same district.
/// Resolved arcs get zero.
fn colocation_counts(arcs: &[StoryArc]) -> Vec<usize> {
    arcs.iter()
        .enumerate()
        .map(|(i, arc)| {
            if arc.is_resolved() {
                return 0;
            }
            arcs.iter()
                .enumerate()
                .filter(|(j, other)| *j != i && !other.is_resolved() && arc.shares_district(other))
                .count()
        })
        .collect()
}

/// One lifecycle step: age, resolution checks, tension, phase.
fn advance_arc(
    arc: &mut StoryArc,
    inputs: &ArcInputs,
    colocated: usize,
    tuning: &ArcTuning,
) -> Vec<SignalKind> {
    arc.age += 1;
    arc.last_updated = inputs.cycle;

    if let Some((kind, reason)) =
        check_condition(arc, inputs).or_else(|| check_timeout(arc, tuning))
    {
        arc.resolve(inputs.cycle, kind, reason);
        debug!(arc = %arc.id, resolution = %kind, "arc resolved");
        return vec![SignalKind::ArcResolved(resolution_seed(arc))];
    }

    step_tension(arc, inputs, colocated, tuning);

    match next_phase(arc, &tuning.phases) {
        Some(ArcPhase::Resolved) => {
            let reason = natural_reason(arc, tuning);
            arc.resolve(inputs.cycle, ResolutionType::Natural, reason);
            debug!(arc = %arc.id, "arc ran its course");
            vec![SignalKind::ArcResolved(resolution_seed(arc))]
        }
        Some(to) => {
            let from = arc.phase;
            arc.phase = to;
            vec![SignalKind::ArcPhaseChanged {
                arc_id: arc.id.clone(),
                from,
                to,
            }]
        }
        None => Vec::new(),
    }
}

fn generate(ctx: &mut TickContext, inputs: &ArcInputs, tuning: &ArcTuning) {
    if inputs.sports_phase == SportsPhase::Championship {
        let fever = ctx
            .world
            .arcs
            .iter_mut()
            .find(|a| a.arc_type == ArcType::SportsFever && !a.is_resolved());
        if let Some(arc) = fever {
            arc.set_tension(arc.tension + CHAMPIONSHIP_INTENSIFY);
            arc.last_updated = inputs.cycle;
            let (arc_id, tension) = (arc.id.clone(), arc.tension);
            ctx.emit(SignalKind::ArcIntensified { arc_id, tension });
        }
    }

    for proposal in proposals(inputs) {
        let live = ctx.world.active_arcs().count();
        if live >= tuning.max_active {
            debug!(live, cap = tuning.max_active, "arc cap reached");
            break;
        }
        let district = place(&proposal, ctx.rng);
        if is_duplicate(ctx.world, proposal.arc_type, district.as_deref()) {
            continue;
        }
        let arc = create_arc(ctx.world, &proposal, district, inputs, tuning, ctx.rng);
        info!(
            arc = %arc.id,
            arc_type = %arc.arc_type,
            district = arc.district.as_deref().unwrap_or("citywide"),
            tension = arc.tension,
            "arc created"
        );
        ctx.emit(SignalKind::ArcCreated {
            arc_id: arc.id.clone(),
            arc_type: arc.arc_type,
            district: arc.district.clone(),
            tension: arc.tension,
        });
        ctx.world.arcs.push(arc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::model::{ArcIntervention, CityEvent, InterventionCommand, WorldState};
    use crate::sim::signal::Signal;
    use crate::testutil::{tick_system, tick_system_with};

    fn live_arc(id: &str, arc_type: ArcType, district: Option<&str>, tension: f64) -> StoryArc {
        StoryArc {
            id: id.to_string(),
            arc_type,
            tension,
            district: district.map(str::to_string),
            phase: ArcPhase::Rising,
            age: 3,
            ..StoryArc::default()
        }
    }

    fn created(signals: &[Signal]) -> Vec<ArcType> {
        signals
            .iter()
            .filter_map(|s| match &s.kind {
                SignalKind::ArcCreated { arc_type, .. } => Some(*arc_type),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn quiet_cycle_creates_nothing() {
        let mut world = WorldState::new();
        let signals = tick_system(&mut world, &mut ArcSystem, 42);
        assert!(signals.is_empty());
        assert!(world.arcs.is_empty());
    }

    #[test]
    fn chaos_spawns_citywide_crisis() {
        let mut world = WorldState::new();
        world.cycle = 5;
        for i in 0..4 {
            world.environment.chaos.push(CityEvent::new(&format!("incident {i}")));
        }
        let signals = tick_system(&mut world, &mut ArcSystem, 42);
        let types = created(&signals);
        assert!(types.contains(&ArcType::Crisis));
        let crisis = world
            .arcs
            .iter()
            .find(|a| a.arc_type == ArcType::Crisis)
            .unwrap();
        assert_eq!(crisis.district, None);
        assert_eq!(crisis.created_cycle, 5);
        assert_eq!(crisis.phase, ArcPhase::Early);
    }

    #[test]
    fn existing_arc_is_not_duplicated() {
        let mut world = WorldState::new();
        world.arcs.push(live_arc("ARC-0009", ArcType::Crisis, None, 8.0));
        for i in 0..4 {
            world.environment.chaos.push(CityEvent::new(&format!("incident {i}")));
        }
        tick_system(&mut world, &mut ArcSystem, 42);
        let crises = world
            .arcs
            .iter()
            .filter(|a| a.arc_type == ArcType::Crisis)
            .count();
        assert_eq!(crises, 1);
    }

    #[test]
    fn cap_limits_generation() {
        let mut world = WorldState::new();
        world.population.illness_rate = 0.1;
        for i in 0..4 {
            world.environment.chaos.push(CityEvent::new(&format!("incident {i}")));
        }
        world.environment.sentiment = -0.5;
        let mut config = SimConfig::default();
        config.arcs.max_active = 2;
        tick_system_with(&mut world, &mut ArcSystem, &config, 42);
        assert_eq!(world.active_arcs().count(), 2);
    }

    #[test]
    fn held_arcs_are_frozen() {
        let mut world = WorldState::new();
        let mut arc = live_arc("ARC-0001", ArcType::Rivalry, Some("Jack London"), 5.0);
        arc.held = true;
        world.arcs.push(arc);
        tick_system(&mut world, &mut ArcSystem, 42);
        assert_eq!(world.arcs[0].age, 3);
        assert_eq!(world.arcs[0].tension, 5.0);
    }

    #[test]
    fn live_arcs_age_and_decay() {
        let mut world = WorldState::new();
        world.arcs.push(live_arc("ARC-0001", ArcType::Rivalry, Some("Jack London"), 5.0));
        tick_system(&mut world, &mut ArcSystem, 42);
        assert_eq!(world.arcs[0].age, 4);
        assert!((world.arcs[0].tension - 4.7).abs() < 1e-9);
    }

    #[test]
    fn colocated_arcs_push_each_other() {
        let arcs = vec![
            live_arc("ARC-0001", ArcType::Rivalry, Some("Uptown"), 5.0),
            live_arc("ARC-0002", ArcType::NightlifeSurge, Some("uptown"), 5.0),
            live_arc("ARC-0003", ArcType::Crisis, None, 5.0),
        ];
        assert_eq!(colocation_counts(&arcs), [1, 1, 0]);
    }

    #[test]
    fn timeout_resolves_old_quiet_arcs() {
        let mut world = WorldState::new();
        let mut arc = live_arc("ARC-0001", ArcType::Rivalry, Some("Jack London"), 2.0);
        arc.age = 11;
        world.arcs.push(arc);
        let signals = tick_system(&mut world, &mut ArcSystem, 42);
        assert_eq!(world.arcs[0].resolution, Some(ResolutionType::Timeout));
        assert!(signals.iter().any(|s| matches!(
            &s.kind,
            SignalKind::ArcResolved(seed) if seed.arc_id == "ARC-0001"
        )));
    }

    #[test]
    fn force_resolve_emits_seed_before_lifecycle() {
        let mut world = WorldState::new();
        world.arcs.push(live_arc("ARC-0001", ArcType::Rivalry, Some("Jack London"), 6.0));
        world.arc_interventions.push(ArcIntervention::new(
            "ARC-0001",
            InterventionCommand::ForceResolve {
                reason: "editor closed the story".to_string(),
            },
        ));
        let signals = tick_system(&mut world, &mut ArcSystem, 42);
        assert_eq!(world.arcs[0].resolution, Some(ResolutionType::Intervention));
        assert_eq!(world.arcs[0].age, 3);
        assert!(matches!(&signals[0].kind, SignalKind::ArcResolved(_)));
    }

    #[test]
    fn championship_intensifies_sports_fever() {
        let mut world = WorldState::new();
        world.environment.calendar.sports_phase = SportsPhase::Championship;
        world.arcs.push(live_arc("ARC-0001", ArcType::SportsFever, Some("Jack London"), 5.0));
        let signals = tick_system(&mut world, &mut ArcSystem, 42);
        let fevers: Vec<_> = world
            .arcs
            .iter()
            .filter(|a| a.arc_type == ArcType::SportsFever)
            .collect();
        assert_eq!(fevers.len(), 1);
        // step: +0 base, +1.0 championship, decay exempt; then +2 intensify
        assert!((fevers[0].tension - 8.0).abs() < 1e-9);
        assert!(signals
            .iter()
            .any(|s| matches!(s.kind, SignalKind::ArcIntensified { .. })));
    }

    #[test]
    fn sports_fever_elsewhere_is_not_duplicated() {
        for phase in [SportsPhase::Playoffs, SportsPhase::Championship] {
            let mut world = WorldState::new();
            world.environment.calendar.sports_phase = phase;
            world.arcs.push(live_arc("ARC-0001", ArcType::SportsFever, Some("Downtown"), 5.0));
            let signals = tick_system(&mut world, &mut ArcSystem, 42);

            let fevers: Vec<_> = world
                .active_arcs()
                .filter(|a| a.arc_type == ArcType::SportsFever)
                .collect();
            assert_eq!(fevers.len(), 1, "{phase}");
            assert_eq!(fevers[0].district.as_deref(), Some("Downtown"));
            assert!(!created(&signals).contains(&ArcType::SportsFever));
        }
    }
}
