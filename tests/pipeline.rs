use civic_cycle::model::*;
use civic_cycle::scenario::Scenario;
use civic_cycle::sim::default_systems;
use civic_cycle::testutil::{assert_approx, count_signals, has_signal};
use civic_cycle::{CycleRunner, SignalKind, SimConfig};

#[test]
fn engines_run_in_dependency_order() {
    let names: Vec<String> = default_systems().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, ["legislature", "economy", "drift", "arcs"]);
}

#[test]
fn economy_sees_same_cycle_inputs_and_arcs_see_economy() {
    let mut s = Scenario::at_cycle(0);
    s.event_in("Plant layoffs hit 400 workers", "West Oakland")
        .event_in("Warehouse layoffs announced", "East Oakland")
        .event_in("Another round of layoffs at the port", "Jack London")
        .mood(34.0);
    let mut world = s.build();

    let report = CycleRunner::new(SimConfig::seeded(3)).step(&mut world);

    assert!(
        count_signals(&report.signals, |k| matches!(
            k,
            SignalKind::RippleCreated { trigger: RippleTrigger::Layoffs, .. }
        )) >= 1
    );
    assert!(world.economy.mood < 34.0);
    assert!(world.economy.ripples.iter().all(|r| r.start_cycle == 1));
    assert!(has_signal(&report.signals, |k| matches!(
        k,
        SignalKind::ArcCreated { arc_type: ArcType::BusinessDisruption, .. }
    )));
}

#[test]
fn drift_summary_reports_the_cycle() {
    let mut s = Scenario::at_cycle(0);
    s.population(|p| p.migration = 400)
        .environment(|e| e.sentiment = 0.8);
    let mut world = s.build();

    let report = CycleRunner::new(SimConfig::seeded(8)).step(&mut world);

    assert_eq!(report.cycle, 1);
    assert!(world.drift.city > 0.0);
    assert!(report.drift_summary.headline.contains("inflow"));
    assert!(report.drift_summary.top_factors.len() <= 3);
}

#[test]
fn cycle_signals_are_stamped_with_the_cycle() {
    let mut s = Scenario::at_cycle(4);
    s.chaos("Transit strike")
        .chaos("Power outage")
        .chaos("Water main break")
        .chaos("Warehouse fire");
    let mut world = s.build();

    let report = CycleRunner::new(SimConfig::seeded(1)).step(&mut world);

    assert!(!report.signals.is_empty());
    assert!(report.signals.iter().all(|s| s.cycle == 5));
}

#[test]
fn city_feedback_moves_mood_with_drift() {
    let mut s = Scenario::at_cycle(0);
    s.population(|p| p.migration = 400);
    let mut on = s.build();
    let mut off = on.clone();

    let mut config = SimConfig::seeded(6);
    CycleRunner::new(config.clone()).step(&mut on);
    config.feedback.city_enabled = false;
    config.feedback.district_enabled = false;
    CycleRunner::new(config).step(&mut off);

    assert_approx(on.drift.city, off.drift.city, 1e-9, "drift is computed before feedback");
    assert!(on.drift.mood_feedback > 0.0);
    assert_eq!(off.drift.mood_feedback, 0.0);
    assert!(on.economy.mood > off.economy.mood);
}

#[test]
fn resolved_health_arc_stays_closed() {
    let mut s = Scenario::at_cycle(0);
    let id = s
        .arc(ArcType::HealthCrisis)
        .district("Fruitvale")
        .tension(3.5)
        .age(5)
        .id();
    s.population(|p| p.illness_rate = 0.045);
    let mut world = s.build();
    let mut runner = CycleRunner::new(SimConfig::seeded(12));

    let report = runner.step(&mut world);
    let closed = world.arc(&id).unwrap().clone();
    assert_eq!(closed.phase, ArcPhase::Resolved);
    assert_eq!(closed.resolution, Some(ResolutionType::Condition));
    assert_eq!(closed.resolved_cycle, Some(1));
    assert!(has_signal(&report.signals, |k| matches!(k, SignalKind::ArcResolved(_))));

    for _ in 0..6 {
        let report = runner.step(&mut world);
        assert_eq!(world.arc(&id), Some(&closed));
        assert!(!has_signal(&report.signals, |k| matches!(
            k,
            SignalKind::ArcPhaseChanged { arc_id, .. } if *arc_id == id
        )));
    }
    assert_eq!(
        world.arcs.iter().filter(|a| a.arc_type == ArcType::HealthCrisis).count(),
        1
    );
}
