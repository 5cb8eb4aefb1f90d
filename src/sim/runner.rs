use rand::RngCore;
use tracing::{debug, info, warn};

use super::arcs::ArcSystem;
use super::context::TickContext;
use super::drift::{DriftSummary, DriftSystem};
use super::economy::EconomySystem;
use super::legislature::LegislatureSystem;
use super::rng::RandomSource;
use super::signal::Signal;
use super::system::SimSystem;
use crate::config::SimConfig;
use crate::error::LedgerError;
use crate::ledger::{self, LedgerStore};
use crate::model::{AppliedIntervention, WorldState};

/// The four engines in dependency order.
pub fn default_systems() -> Vec<Box<dyn SimSystem>> {
    vec![
        Box::new(LegislatureSystem),
        Box::new(EconomySystem),
        Box::new(DriftSystem),
        Box::new(ArcSystem),
    ]
}

/// Run one cycle at `world.cycle` through every system, in order.
///
/// Each system observes everything earlier systems wrote this cycle. Signals
/// are collected for the caller and never delivered back to systems.
pub fn run_cycle(
    world: &mut WorldState,
    systems: &mut [Box<dyn SimSystem>],
    rng: &mut dyn RngCore,
    config: &SimConfig,
) -> Vec<Signal> {
    let mut signals = Vec::new();
    for system in systems.iter_mut() {
        let before = signals.len();
        let mut ctx = TickContext {
            world,
            rng,
            config,
            signals: &mut signals,
        };
        system.tick(&mut ctx);
        debug!(
            system = system.name(),
            signals = signals.len() - before,
            "system ticked"
        );
    }
    signals
}

/// What one cycle produced.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u32,
    pub signals: Vec<Signal>,
    pub drift_summary: DriftSummary,
    /// Arc interventions handled this cycle, drained from the world.
    pub interventions: Vec<AppliedIntervention>,
}

/// Owns the systems, the resolved random source, and the config.
pub struct CycleRunner {
    systems: Vec<Box<dyn SimSystem>>,
    rng: RandomSource,
    config: SimConfig,
}

impl CycleRunner {
    pub fn new(config: SimConfig) -> Self {
        let rng = RandomSource::resolve(&config, None);
        Self::with_source(config, rng)
    }

    /// Use `rng` unless the config names a seed or resume state.
    pub fn with_rng(config: SimConfig, rng: Box<dyn RngCore>) -> Self {
        let rng = RandomSource::resolve(&config, Some(rng));
        Self::with_source(config, rng)
    }

    /// Resume from the generator state persisted on `world`, unless the
    /// config carries its own resume token.
    pub fn for_world(mut config: SimConfig, world: &WorldState) -> Self {
        if config.rng_state.is_none() {
            config.rng_state = world.rng_state.clone();
        }
        Self::new(config)
    }

    fn with_source(config: SimConfig, rng: RandomSource) -> Self {
        if let Err(error) = config.validate() {
            warn!(%error, "sim config failed validation; degenerate values are clamped");
        }
        Self {
            systems: default_systems(),
            rng,
            config,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn is_deterministic(&self) -> bool {
        self.rng.is_deterministic()
    }

    /// Advance `world` by one cycle.
    pub fn step(&mut self, world: &mut WorldState) -> CycleReport {
        world.cycle += 1;
        let cycle = world.cycle;
        info!(cycle, "cycle started");

        let signals = run_cycle(world, &mut self.systems, &mut self.rng, &self.config);

        if let Some(state) = self.rng.snapshot() {
            world.rng_state = Some(state.to_token());
        }
        let drift_summary = DriftSummary::from_state(&world.drift);
        let interventions = std::mem::take(&mut world.intervention_log);
        info!(
            cycle,
            signals = signals.len(),
            mood = world.economy.mood,
            drift = world.drift.city,
            "cycle finished"
        );
        CycleReport {
            cycle,
            signals,
            drift_summary,
            interventions,
        }
    }

    /// Bulk load from `store`, let `prepare` set this cycle's external
    /// inputs, step, then bulk save.
    ///
    /// Nothing is written unless the load succeeds.
    pub fn advance<F>(
        &mut self,
        store: &mut dyn LedgerStore,
        prepare: F,
    ) -> Result<CycleReport, LedgerError>
    where
        F: FnOnce(&mut WorldState),
    {
        let mut world = ledger::load_world(&*store)?;
        prepare(&mut world);
        let report = self.step(&mut world);
        ledger::save_world(store, &world)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::model::{ArcType, InterventionCommand};
    use crate::scenario::Scenario;

    struct Recorder {
        name: &'static str,
    }

    impl SimSystem for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn tick(&mut self, ctx: &mut TickContext) {
            ctx.world.environment.sentiment += 0.1;
        }
    }

    #[test]
    fn later_systems_see_earlier_writes() {
        let mut world = WorldState::new();
        let mut systems: Vec<Box<dyn SimSystem>> = vec![
            Box::new(Recorder { name: "a" }),
            Box::new(Recorder { name: "b" }),
        ];
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        run_cycle(&mut world, &mut systems, &mut rng, &SimConfig::default());
        assert!((world.environment.sentiment - 0.2).abs() < 1e-9);
    }

    #[test]
    fn step_advances_cycle_and_captures_rng_state() {
        let mut world = Scenario::at_cycle(3).build();
        let mut runner = CycleRunner::new(SimConfig::seeded(42));
        let report = runner.step(&mut world);
        assert_eq!(report.cycle, 4);
        assert_eq!(world.cycle, 4);
        assert!(world.rng_state.is_some());
    }

    #[test]
    fn intervention_log_moves_into_the_report() {
        let mut s = Scenario::at_cycle(0);
        let id = s.arc(ArcType::Rivalry).district("Jack London").id();
        s.intervene(&id, InterventionCommand::Hold);
        let mut world = s.build();
        let mut runner = CycleRunner::new(SimConfig::seeded(7));

        let report = runner.step(&mut world);
        assert_eq!(report.interventions.len(), 1);
        assert_eq!(report.interventions[0].arc_id, id);
        assert!(world.intervention_log.is_empty());

        let report = runner.step(&mut world);
        assert!(report.interventions.is_empty());
    }

    #[test]
    fn inverted_tension_range_does_not_panic() {
        let mut config = SimConfig::seeded(3);
        config.arcs.initial_tension_min = 6.0;
        config.arcs.initial_tension_max = 2.0;
        assert!(config.validate().is_err());

        let mut s = Scenario::at_cycle(0);
        for event in ["Transit strike", "Power outage", "Water main break", "Warehouse fire"] {
            s.chaos(event);
        }
        let mut world = s.build();
        CycleRunner::new(config).step(&mut world);
        let crisis = world.arcs.iter().find(|a| a.arc_type == ArcType::Crisis).unwrap();
        assert_eq!(crisis.tension, 6.0);
    }

    #[test]
    fn default_pipeline_order() {
        let names: Vec<String> = default_systems()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, ["legislature", "economy", "drift", "arcs"]);
    }
}
