use civic_cycle::ledger::{JsonlLedger, LedgerStore, MemoryLedger, load_world, save_world};
use civic_cycle::model::*;
use civic_cycle::scenario::Scenario;
use civic_cycle::testutil::{assert_deterministic, run_cycles};
use civic_cycle::{CycleRunner, SimConfig};

fn seeded_world() -> WorldState {
    let mut s = Scenario::at_cycle(0);
    s.standard_council();
    s.initiative("INIT-1", "Transit Levy")
        .status(InitiativeStatus::Proposed)
        .vote_cycle(4)
        .swing("Ind A")
        .projection("toss up");
    s.arc(ArcType::Strain).district("Fruitvale").tension(5.0);
    s.population(|p| p.migration = 150);
    s.build()
}

/// External inputs for the cycle about to run.
fn prepare(world: &mut WorldState) {
    let cycle = world.cycle + 1;
    world.clear_cycle_inputs();
    world.environment.sentiment = if cycle % 3 == 0 { -0.45 } else { 0.1 };
    world.environment.calendar.first_friday = cycle % 4 == 1;
    world.environment.calendar.sports_phase = if cycle >= 4 {
        SportsPhase::Playoffs
    } else {
        SportsPhase::Regular
    };
    world.population.migration = 150 - 30 * cycle as i64;
    if cycle % 2 == 0 {
        world.events.push(CityEvent::in_district("Tech firm announces major investment", "Uptown"));
        world.environment.chaos.push(CityEvent::new("Water main break floods street"));
    }
    world.domain_activity.insert("sports".to_string(), 3);
}

fn drive(world: &mut WorldState, runner: &mut CycleRunner, cycles: u32) {
    for _ in 0..cycles {
        prepare(world);
        runner.step(world);
    }
}

#[test]
fn same_seed_same_world() {
    let mut a = seeded_world();
    let mut b = seeded_world();
    drive(&mut a, &mut CycleRunner::new(SimConfig::seeded(99)), 8);
    drive(&mut b, &mut CycleRunner::new(SimConfig::seeded(99)), 8);
    assert_deterministic(&a, &b);
}

#[test]
fn run_cycles_is_reproducible() {
    let mut a = seeded_world();
    let mut b = seeded_world();
    let signals_a = run_cycles(&mut a, 5, 7);
    let signals_b = run_cycles(&mut b, 5, 7);
    assert_eq!(signals_a, signals_b);
    assert_eq!(a.cycle, 5);
}

#[test]
fn resumed_run_matches_continuous_run() {
    let config = SimConfig::seeded(2024);

    let mut continuous = MemoryLedger::new();
    save_world(&mut continuous, &seeded_world()).unwrap();
    let mut runner = CycleRunner::new(config.clone());
    for _ in 0..6 {
        runner.advance(&mut continuous, prepare).unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    let mut resumed = JsonlLedger::open(dir.path()).unwrap();
    save_world(&mut resumed, &seeded_world()).unwrap();
    let mut first = CycleRunner::new(config);
    for _ in 0..3 {
        first.advance(&mut resumed, prepare).unwrap();
    }
    drop(first);

    // A fresh process: no seed in config, state comes from the ledger.
    let world = load_world(&resumed).unwrap();
    assert!(world.rng_state.is_some());
    let mut second = CycleRunner::for_world(SimConfig::default(), &world);
    assert!(second.is_deterministic());
    for _ in 0..3 {
        second.advance(&mut resumed, prepare).unwrap();
    }

    let a = load_world(&continuous).unwrap();
    let b = load_world(&resumed).unwrap();
    assert_eq!(a.cycle, 6);
    assert_deterministic(&a, &b);
}

#[test]
fn failed_load_writes_nothing() {
    struct Broken(MemoryLedger);

    impl LedgerStore for Broken {
        fn read_rows(
            &self,
            sheet: civic_cycle::ledger::Sheet,
        ) -> Result<Option<Vec<civic_cycle::ledger::Row>>, civic_cycle::LedgerError> {
            Err(civic_cycle::LedgerError::Read {
                sheet,
                path: "unreachable".into(),
                source: std::io::Error::other("disk gone"),
            })
        }

        fn write_rows(
            &mut self,
            sheet: civic_cycle::ledger::Sheet,
            rows: &[civic_cycle::ledger::Row],
        ) -> Result<(), civic_cycle::LedgerError> {
            self.0.write_rows(sheet, rows)
        }

        fn write_batch(
            &mut self,
            batch: &[(civic_cycle::ledger::Sheet, Vec<civic_cycle::ledger::Row>)],
        ) -> Result<(), civic_cycle::LedgerError> {
            self.0.write_batch(batch)
        }
    }

    let mut store = Broken(MemoryLedger::new());
    let mut runner = CycleRunner::new(SimConfig::seeded(1));
    assert!(runner.advance(&mut store, prepare).is_err());
    assert!(civic_cycle::ledger::Sheet::ALL.iter().all(|s| !store.0.has_sheet(*s)));
}
