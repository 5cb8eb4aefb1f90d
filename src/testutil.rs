use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SimConfig;
use crate::model::WorldState;
use crate::model::arc::TENSION_MAX;
use crate::model::drift::{CITY_DRIFT_LIMIT, DISTRICT_DRIFT_LIMIT};
use crate::sim::{Signal, SignalKind, SimSystem, TickContext, default_systems, run_cycle};

// ---------------------------------------------------------------------------
// Tick execution helpers
// ---------------------------------------------------------------------------

/// Run a single system tick at the world's current cycle with the default
/// config. Returns emitted signals.
pub fn tick_system(world: &mut WorldState, system: &mut dyn SimSystem, seed: u64) -> Vec<Signal> {
    tick_system_with(world, system, &SimConfig::default(), seed)
}

/// Run a single system tick with an explicit config. Returns emitted signals.
pub fn tick_system_with(
    world: &mut WorldState,
    system: &mut dyn SimSystem,
    config: &SimConfig,
    seed: u64,
) -> Vec<Signal> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut signals = Vec::new();
    let mut ctx = TickContext {
        world,
        rng: &mut rng,
        config,
        signals: &mut signals,
    };
    system.tick(&mut ctx);
    signals
}

/// Run the default pipeline for `cycles` cycles from one seeded generator,
/// advancing `world.cycle` before each. Returns every signal emitted.
pub fn run_cycles(world: &mut WorldState, cycles: u32, seed: u64) -> Vec<Signal> {
    let config = SimConfig::default();
    let mut systems = default_systems();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut all = Vec::new();
    for _ in 0..cycles {
        world.cycle += 1;
        all.extend(run_cycle(world, &mut systems, &mut rng, &config));
    }
    all
}

// ---------------------------------------------------------------------------
// Signal helpers
// ---------------------------------------------------------------------------

/// Check if any signal matches the predicate.
pub fn has_signal(signals: &[Signal], predicate: impl Fn(&SignalKind) -> bool) -> bool {
    signals.iter().any(|s| predicate(&s.kind))
}

/// Count signals matching the predicate.
pub fn count_signals(signals: &[Signal], predicate: impl Fn(&SignalKind) -> bool) -> usize {
    signals.iter().filter(|s| predicate(&s.kind)).count()
}

// ---------------------------------------------------------------------------
// Assertion helpers
// ---------------------------------------------------------------------------

/// Assert a float is approximately equal, with a named context message.
pub fn assert_approx(actual: f64, expected: f64, tolerance: f64, msg: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{msg}: expected ~{expected} (+-{tolerance}), got {actual}"
    );
}

/// Assert two worlds evolved from the same seed and inputs are identical in
/// every persisted part.
pub fn assert_deterministic(world1: &WorldState, world2: &WorldState) {
    assert_eq!(world1.cycle, world2.cycle, "cycle mismatch");
    assert_eq!(world1.arcs, world2.arcs, "arc mismatch");
    assert_eq!(world1.economy, world2.economy, "economy mismatch");
    assert_eq!(world1.drift, world2.drift, "drift mismatch");
    assert_eq!(world1.initiatives, world2.initiatives, "initiative mismatch");
    assert_eq!(
        world1.environment.sentiment, world2.environment.sentiment,
        "sentiment mismatch"
    );
    assert_eq!(world1.rng_state, world2.rng_state, "rng state mismatch");
}

/// Assert every bounded quantity in the world is inside its range.
pub fn assert_world_bounds(world: &WorldState) {
    for arc in &world.arcs {
        assert!(
            (0.0..=TENSION_MAX).contains(&arc.tension),
            "arc {} tension {} out of range",
            arc.id,
            arc.tension
        );
        if arc.is_resolved() {
            assert!(arc.resolution.is_some(), "resolved arc {} has no type", arc.id);
            assert!(arc.resolved_cycle.is_some(), "resolved arc {} has no cycle", arc.id);
        }
    }
    assert!((0.0..=100.0).contains(&world.economy.mood), "mood {}", world.economy.mood);
    for (name, d) in &world.economy.districts {
        assert!((0.0..=100.0).contains(&d.mood), "district {name} mood {}", d.mood);
    }
    assert!(
        (-CITY_DRIFT_LIMIT..=CITY_DRIFT_LIMIT).contains(&world.drift.city),
        "city drift {}",
        world.drift.city
    );
    for (name, v) in &world.drift.districts {
        assert!(
            (-DISTRICT_DRIFT_LIMIT..=DISTRICT_DRIFT_LIMIT).contains(v),
            "district {name} drift {v}"
        );
    }
    assert!(
        (-1.0..=1.0).contains(&world.environment.sentiment),
        "sentiment {}",
        world.environment.sentiment
    );
    for ripple in &world.economy.ripples {
        assert!(
            ripple.current_strength.abs() <= ripple.impact.abs() + 1e-9,
            "ripple {} strength {} exceeds impact {}",
            ripple.id,
            ripple.current_strength,
            ripple.impact
        );
    }
}

/// Assert no two live arcs share a type and district.
pub fn assert_no_duplicate_arcs(world: &WorldState) {
    let mut seen = std::collections::BTreeSet::new();
    for arc in world.active_arcs() {
        let key = (arc.arc_type, arc.district.as_ref().map(|d| d.to_ascii_lowercase()));
        assert!(seen.insert(key), "duplicate live arc {} ({})", arc.id, arc.arc_type);
    }
}
