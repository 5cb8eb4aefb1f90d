use crate::config::SimConfig;
use crate::model::*;
use crate::sim::economy::{ShockRequest, build_ripple};
use crate::sim::{CycleReport, CycleRunner};

// -- Builder-style ref types --

/// Typed reference to an initiative in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::initiative`]. Call [`.id()`](InitiativeRef::id) to
/// terminate the chain and extract the initiative ID.
pub struct InitiativeRef<'a> {
    scenario: &'a mut Scenario,
    index: usize,
}

impl InitiativeRef<'_> {
    fn data_mut(&mut self) -> &mut Initiative {
        &mut self.scenario.world.initiatives[self.index]
    }

    pub fn kind(mut self, v: InitiativeKind) -> Self { self.data_mut().kind = v; self }
    pub fn status(mut self, v: InitiativeStatus) -> Self { self.data_mut().status = v; self }
    pub fn requirement(mut self, v: &str) -> Self { self.data_mut().vote_requirement = v.to_string(); self }
    pub fn vote_cycle(mut self, v: u32) -> Self { self.data_mut().vote_cycle = v; self }
    pub fn projection(mut self, v: &str) -> Self { self.data_mut().projection = v.to_string(); self }
    pub fn lead(mut self, v: Faction) -> Self { self.data_mut().lead_faction = Some(v); self }
    pub fn opposition(mut self, v: Faction) -> Self { self.data_mut().opposition_faction = Some(v); self }
    pub fn swing(mut self, v: &str) -> Self { self.data_mut().swing_voter = v.to_string(); self }
    pub fn swing2(mut self, name: &str, lean: &str) -> Self {
        let d = self.data_mut();
        d.swing_voter_2 = name.to_string();
        d.swing_voter_2_lean = lean.to_string();
        self
    }

    /// Escape hatch: apply an arbitrary closure to the initiative.
    pub fn with(mut self, f: impl FnOnce(&mut Initiative)) -> Self { f(self.data_mut()); self }

    /// Terminate the chain and return the initiative ID.
    pub fn id(self) -> String { self.scenario.world.initiatives[self.index].id.clone() }
}

/// Typed reference to an arc in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::arc`]. Call [`.id()`](ArcRef::id) to terminate the
/// chain and extract the arc ID.
pub struct ArcRef<'a> {
    scenario: &'a mut Scenario,
    index: usize,
}

impl ArcRef<'_> {
    fn data_mut(&mut self) -> &mut StoryArc {
        &mut self.scenario.world.arcs[self.index]
    }

    pub fn district(mut self, v: &str) -> Self { self.data_mut().district = Some(v.to_string()); self }
    pub fn tension(mut self, v: f64) -> Self { self.data_mut().set_tension(v); self }
    pub fn phase(mut self, v: ArcPhase) -> Self { self.data_mut().phase = v; self }
    pub fn age(mut self, v: u32) -> Self { self.data_mut().age = v; self }
    pub fn held(mut self, v: bool) -> Self { self.data_mut().held = v; self }
    pub fn season_created(mut self, v: Season) -> Self { self.data_mut().season_created = Some(v); self }

    /// Escape hatch: apply an arbitrary closure to the arc.
    pub fn with(mut self, f: impl FnOnce(&mut StoryArc)) -> Self { f(self.data_mut()); self }

    /// Terminate the chain and return the arc ID.
    pub fn id(self) -> String { self.scenario.world.arcs[self.index].id.clone() }
}

/// Fluent builder for constructing a [`WorldState`].
///
/// Setters take closures over the underlying model structs so adding new
/// fields never breaks callers. Used by unit and integration tests.
pub struct Scenario {
    world: WorldState,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// Create a new scenario at cycle 1.
    pub fn new() -> Self {
        Self::at_cycle(1)
    }

    /// Create a new scenario at the given cycle.
    pub fn at_cycle(cycle: u32) -> Self {
        let mut world = WorldState::new();
        world.cycle = cycle;
        Self { world }
    }

    // -- Council --

    /// Add an active, voting seat. Returns the seat number.
    pub fn add_seat(&mut self, holder: &str, faction: Faction) -> u32 {
        self.add_seat_with(holder, faction, |_| {})
    }

    pub fn add_seat_with(
        &mut self,
        holder: &str,
        faction: Faction,
        modify: impl FnOnce(&mut CouncilSeat),
    ) -> u32 {
        let seat = self.world.council.len() as u32 + 1;
        let mut row = CouncilSeat {
            seat,
            district: format!("D{seat}"),
            holder: holder.to_string(),
            faction,
            ..CouncilSeat::default()
        };
        modify(&mut row);
        self.world.council.push(row);
        seat
    }

    pub fn add_vacant_seat(&mut self) -> u32 {
        self.add_seat_with("", Faction::Independent, |_| {})
    }

    /// Nine seats: four progressive, three reform, two independents
    /// ("Ind A" and "Ind B").
    pub fn standard_council(&mut self) -> &mut Self {
        for name in ["Prog A", "Prog B", "Prog C", "Prog D"] {
            self.add_seat(name, Faction::Progressive);
        }
        for name in ["Reform A", "Reform B", "Reform C"] {
            self.add_seat(name, Faction::Reform);
        }
        for name in ["Ind A", "Ind B"] {
            self.add_seat(name, Faction::Independent);
        }
        self
    }

    /// Set a member's status (e.g. "hospitalized").
    pub fn seat_status(&mut self, holder: &str, status: &str) -> &mut Self {
        if let Some(seat) = self.world.council.iter_mut().find(|s| s.holder == holder) {
            seat.status = status.to_string();
        }
        self
    }

    // -- Initiatives --

    /// Add a pending council vote scheduled for the scenario's cycle.
    pub fn initiative(&mut self, id: &str, name: &str) -> InitiativeRef<'_> {
        self.world.initiatives.push(Initiative {
            id: id.to_string(),
            name: name.to_string(),
            kind: InitiativeKind::Vote,
            status: InitiativeStatus::PendingVote,
            vote_requirement: "5-of-9".to_string(),
            vote_cycle: self.world.cycle,
            ..Initiative::default()
        });
        let index = self.world.initiatives.len() - 1;
        InitiativeRef { scenario: self, index }
    }

    // -- Arcs --

    /// Add a live arc in the rising phase with tension 4.
    pub fn arc(&mut self, arc_type: ArcType) -> ArcRef<'_> {
        let id = format!("ARC-{:04}", self.world.id_gen.next_id());
        self.world.arcs.push(StoryArc {
            id,
            arc_type,
            phase: ArcPhase::Rising,
            tension: 4.0,
            domain: Some(arc_type.domain()),
            created_cycle: self.world.cycle,
            last_updated: self.world.cycle,
            ..StoryArc::default()
        });
        let index = self.world.arcs.len() - 1;
        ArcRef { scenario: self, index }
    }

    pub fn intervene(&mut self, arc_id: &str, command: InterventionCommand) -> &mut Self {
        self.world.arc_interventions.push(ArcIntervention::new(arc_id, command));
        self
    }

    // -- Economy --

    /// Add a ripple starting this cycle, built from the trigger catalog.
    pub fn add_ripple(&mut self, trigger: RippleTrigger, primary: Option<&str>) -> String {
        let request = ShockRequest {
            trigger,
            primary_district: primary.map(str::to_string),
            source: "scenario".to_string(),
        };
        let calendar = self.world.environment.calendar.clone();
        let ripple = build_ripple(&request, self.world.cycle, &calendar, calendar.sports_phase);
        let id = ripple.id.clone();
        self.world.economy.ripples.push(ripple);
        id
    }

    pub fn mood(&mut self, mood: f64) -> &mut Self {
        self.world.economy.set_mood(mood);
        self
    }

    pub fn prior_drift(&mut self, city: f64) -> &mut Self {
        self.world.drift.set_city(city);
        self
    }

    // -- External inputs --

    pub fn calendar(&mut self, modify: impl FnOnce(&mut Calendar)) -> &mut Self {
        modify(&mut self.world.environment.calendar);
        self
    }

    pub fn environment(&mut self, modify: impl FnOnce(&mut Environment)) -> &mut Self {
        modify(&mut self.world.environment);
        self
    }

    pub fn population(&mut self, modify: impl FnOnce(&mut PopulationRecord)) -> &mut Self {
        modify(&mut self.world.population);
        self
    }

    /// Modify a district's metrics, registering the district if unknown.
    pub fn district(&mut self, name: &str, modify: impl FnOnce(&mut DistrictMetrics)) -> &mut Self {
        modify(self.world.districts.entry(name.to_string()).or_default());
        self
    }

    pub fn chaos(&mut self, description: &str) -> &mut Self {
        self.world.environment.chaos.push(CityEvent::new(description));
        self
    }

    pub fn event_in(&mut self, description: &str, district: &str) -> &mut Self {
        self.world.events.push(CityEvent::in_district(description, district));
        self
    }

    pub fn activity(&mut self, domain: &str, count: u32) -> &mut Self {
        self.world.domain_activity.insert(domain.to_string(), count);
        self
    }

    pub fn workforce(&mut self, modify: impl FnOnce(&mut WorkforceSignals)) -> &mut Self {
        modify(&mut self.world.workforce);
        self
    }

    // -- Finalization --

    /// Consume the builder and return the world.
    pub fn build(self) -> WorldState {
        self.world
    }

    /// Build the world and step it `cycles` times with a seeded runner. The
    /// scenario's inputs stay in place for every cycle.
    pub fn run(self, cycles: u32, config: SimConfig) -> (WorldState, Vec<CycleReport>) {
        let mut world = self.build();
        let mut runner = CycleRunner::new(config);
        let reports = (0..cycles).map(|_| runner.step(&mut world)).collect();
        (world, reports)
    }

    /// Borrow the world for inspection.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Borrow the world mutably for additional modifications.
    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_council_has_nine_voting_seats() {
        let mut s = Scenario::new();
        s.standard_council().seat_status("Prog B", "hospitalized");
        let world = s.build();
        assert_eq!(world.council.len(), 9);
        assert_eq!(world.council[1].incapacity(), Some("hospitalized"));
    }

    #[test]
    fn refs_chain_and_return_ids() {
        let mut s = Scenario::at_cycle(7);
        let init = s
            .initiative("INIT-3", "Library Hours")
            .projection("likely pass")
            .swing("Ind A")
            .id();
        let arc = s.arc(ArcType::Strain).district("Fruitvale").tension(6.5).id();
        let world = s.build();
        assert_eq!(init, "INIT-3");
        assert_eq!(world.initiative("INIT-3").map(|i| i.vote_cycle), Some(7));
        assert_eq!(arc, "ARC-0001");
        assert_eq!(world.arc(&arc).map(|a| a.tension), Some(6.5));
    }

    #[test]
    fn ripples_come_from_the_catalog() {
        let mut s = Scenario::at_cycle(4);
        let id = s.add_ripple(RippleTrigger::Layoffs, Some("Fruitvale"));
        let world = s.build();
        let ripple = &world.economy.ripples[0];
        assert_eq!(ripple.id, id);
        assert_eq!(ripple.impact, -12.0);
        assert_eq!(ripple.end_cycle, 12);
    }
}
