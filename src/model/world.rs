use std::collections::BTreeMap;

use super::arc::{AppliedIntervention, ArcIntervention, StoryArc};
use super::district::{DistrictMetrics, district_names};
use super::drift::DriftState;
use super::economy::EconomyState;
use super::environment::{CityEvent, Environment, WorkforceSignals};
use super::legislature::{CouncilSeat, CouncilState, Initiative};
use super::population::PopulationRecord;
use crate::id::IdGenerator;

/// The shared world-state object every engine reads and mutates.
///
/// One instance is threaded through the pipeline by `&mut`; engines never keep
/// a copy between cycles.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub cycle: u32,

    // -- Inputs from external collaborators --
    pub environment: Environment,
    pub workforce: WorkforceSignals,
    /// Free-text events reported this cycle (besides chaos).
    pub events: Vec<CityEvent>,
    /// Activity counters per domain ("crime", "education", "sports", ...).
    pub domain_activity: BTreeMap<String, u32>,
    pub districts: BTreeMap<String, DistrictMetrics>,
    pub population: PopulationRecord,

    // -- Engine state --
    pub economy: EconomyState,
    pub drift: DriftState,
    pub arcs: Vec<StoryArc>,
    pub arc_interventions: Vec<ArcIntervention>,
    /// Interventions handled this cycle. `CycleRunner::step` drains it into
    /// the cycle report.
    pub intervention_log: Vec<AppliedIntervention>,
    pub council: Vec<CouncilSeat>,
    pub council_state: CouncilState,
    pub initiatives: Vec<Initiative>,
    pub id_gen: IdGenerator,
    /// Resume token of the seeded generator, captured at the end of each cycle.
    pub rng_state: Option<String>,
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            cycle: 0,
            environment: Environment::default(),
            workforce: WorkforceSignals::default(),
            events: Vec::new(),
            domain_activity: BTreeMap::new(),
            districts: district_names()
                .map(|d| (d.to_string(), DistrictMetrics::default()))
                .collect(),
            population: PopulationRecord::default(),
            economy: EconomyState::default(),
            drift: DriftState::default(),
            arcs: Vec::new(),
            arc_interventions: Vec::new(),
            intervention_log: Vec::new(),
            council: Vec::new(),
            council_state: CouncilState::default(),
            initiatives: Vec::new(),
            id_gen: IdGenerator::new(),
            rng_state: None,
        }
    }

    pub fn activity(&self, domain: &str) -> u32 {
        self.domain_activity.get(domain).copied().unwrap_or(0)
    }

    pub fn active_arcs(&self) -> impl Iterator<Item = &StoryArc> {
        self.arcs.iter().filter(|a| !a.is_resolved())
    }

    pub fn arc(&self, id: &str) -> Option<&StoryArc> {
        self.arcs.iter().find(|a| a.id == id)
    }

    pub fn initiative(&self, id: &str) -> Option<&Initiative> {
        self.initiatives.iter().find(|i| i.id == id)
    }

    /// Clear per-cycle inputs so stale signals never leak into the next cycle.
    pub fn clear_cycle_inputs(&mut self) {
        self.environment.chaos.clear();
        self.events.clear();
        self.domain_activity.clear();
        self.workforce = WorkforceSignals::default();
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}
