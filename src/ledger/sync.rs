use serde_json::Value;
use tracing::{debug, info, warn};

use super::record::{EngineStateRecord, decode_rows, encode_records, read_records, truthy};
use super::{LedgerStore, Row, Sheet};
use crate::error::LedgerError;
use crate::id::IdGenerator;
use crate::model::{
    ArcIntervention, CouncilSeat, EconomicRipple, Initiative, InterventionCommand,
    PopulationRecord, StoryArc, WorldState,
};

/// Override columns operators used to type directly into the arc sheet.
const HOLD_COLUMN: &str = "Hold";
const ESCALATE_COLUMN: &str = "Escalate";
const FORCE_RESOLVE_COLUMN: &str = "ForceResolve";

/// Bulk-load a world from `store`.
///
/// Missing sheets and columns fall back to defaults. Per-cycle inputs
/// (environment, events, district metrics) are left at their defaults for the
/// caller to fill.
pub fn load_world(store: &dyn LedgerStore) -> Result<WorldState, LedgerError> {
    let mut world = WorldState::new();

    let engine: Vec<EngineStateRecord> = read_records(store)?;
    let engine = engine.into_iter().next().unwrap_or_default();
    world.cycle = engine.cycle;
    world.economy.set_mood(engine.economic_mood);
    world.economy.descriptor = engine.mood_descriptor;
    world.drift = engine.drift;
    world.rng_state = engine.rng_state;
    world.id_gen = IdGenerator::starting_from(engine.next_arc_id);
    world.arc_interventions = engine.pending_interventions;

    let (arcs, overrides) = load_arcs(store)?;
    for arc in &arcs {
        if let Some(n) = arc_number(&arc.id) {
            world.id_gen.observe(n);
        }
    }
    world.arcs = arcs;
    world.arc_interventions.extend(overrides);

    world.economy.ripples = read_records::<EconomicRipple>(store)?;
    world.initiatives = read_records::<Initiative>(store)?;
    world.council = read_records::<CouncilSeat>(store)?;
    match read_records::<PopulationRecord>(store)?.into_iter().next() {
        Some(population) => world.population = population,
        None => warn!("population record missing; using defaults"),
    }

    info!(
        cycle = world.cycle,
        arcs = world.arcs.len(),
        initiatives = world.initiatives.len(),
        ripples = world.economy.ripples.len(),
        "ledger loaded"
    );
    Ok(world)
}

/// Bulk-save every persisted part of `world` in one batch: either every sheet
/// is replaced or the store is left as it was. Override columns are not
/// written back, which clears them.
pub fn save_world(store: &mut dyn LedgerStore, world: &WorldState) -> Result<(), LedgerError> {
    let engine = EngineStateRecord {
        cycle: world.cycle,
        economic_mood: world.economy.mood,
        mood_descriptor: world.economy.descriptor,
        drift: world.drift.clone(),
        rng_state: world.rng_state.clone(),
        next_arc_id: world.id_gen.peek(),
        pending_interventions: world.arc_interventions.clone(),
    };
    let batch = [
        encode_records(&world.arcs)?,
        encode_records(&world.initiatives)?,
        encode_records(&world.council)?,
        encode_records(std::slice::from_ref(&world.population))?,
        encode_records(&world.economy.ripples)?,
        encode_records(&[engine])?,
    ];
    store.write_batch(&batch)?;
    debug!(cycle = world.cycle, "ledger saved");
    Ok(())
}

fn load_arcs(
    store: &dyn LedgerStore,
) -> Result<(Vec<StoryArc>, Vec<ArcIntervention>), LedgerError> {
    let Some(mut rows) = store.read_rows(Sheet::Arcs)? else {
        warn!(sheet = %Sheet::Arcs, "ledger sheet missing; treating as empty");
        return Ok((Vec::new(), Vec::new()));
    };
    let mut overrides = Vec::new();
    for row in &mut rows {
        overrides.extend(take_overrides(row));
    }
    Ok((decode_rows(rows), overrides))
}

/// Strip legacy override columns from an arc row and turn them into queued
/// interventions.
fn take_overrides(row: &mut Row) -> Vec<ArcIntervention> {
    let hold = row.remove(HOLD_COLUMN);
    let escalate = row.remove(ESCALATE_COLUMN);
    let force = row.remove(FORCE_RESOLVE_COLUMN);

    let Some(arc_id) = row.get("ArcID").and_then(Value::as_str).map(str::to_string) else {
        return Vec::new();
    };
    let mut commands = Vec::new();

    match hold.as_ref().and_then(truthy) {
        Some(true) => commands.push(InterventionCommand::Hold),
        Some(false) => commands.push(InterventionCommand::Release),
        None => {}
    }
    if escalate.as_ref().and_then(truthy) == Some(true) {
        commands.push(InterventionCommand::Escalate);
    }
    if let Some(value) = force {
        match (truthy(&value), &value) {
            (Some(true), _) => commands.push(InterventionCommand::ForceResolve {
                reason: String::new(),
            }),
            (None, Value::String(s)) if !s.trim().is_empty() => {
                commands.push(InterventionCommand::ForceResolve {
                    reason: s.trim().to_string(),
                });
            }
            _ => {}
        }
    }

    if !commands.is_empty() {
        info!(arc = %arc_id, count = commands.len(), "legacy override columns queued");
    }
    commands
        .into_iter()
        .map(|command| ArcIntervention::new(&arc_id, command))
        .collect()
}

/// Numeric suffix of an `ARC-0042` style id.
fn arc_number(id: &str) -> Option<u64> {
    id.rsplit('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ledger::{MemoryLedger, SCHEMA_COLUMN};
    use crate::model::{ArcPhase, ArcType};

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn empty_store_loads_a_default_world() {
        let world = load_world(&MemoryLedger::new()).unwrap();
        assert_eq!(world.cycle, 0);
        assert!(world.arcs.is_empty());
        assert_eq!(world.population, PopulationRecord::default());
    }

    #[test]
    fn save_then_load_keeps_engine_state() {
        let mut world = WorldState::new();
        world.cycle = 9;
        world.economy.set_mood(61.0);
        world.drift.set_city(14.5);
        world.rng_state = Some("chacha8:00:0:0".to_string());
        world.arcs.push(StoryArc {
            id: "ARC-0041".to_string(),
            arc_type: ArcType::Strain,
            phase: ArcPhase::Rising,
            tension: 4.5,
            ..StoryArc::default()
        });
        let mut store = MemoryLedger::new();
        save_world(&mut store, &world).unwrap();

        let loaded = load_world(&store).unwrap();
        assert_eq!(loaded.cycle, 9);
        assert_eq!(loaded.economy.mood, 61.0);
        assert_eq!(loaded.drift.city, 14.5);
        assert_eq!(loaded.rng_state, world.rng_state);
        assert_eq!(loaded.arcs, world.arcs);
        assert_eq!(loaded.id_gen.peek(), 42);
    }

    #[test]
    fn override_columns_become_interventions() {
        let mut store = MemoryLedger::new();
        store.rows_mut(Sheet::Arcs).extend([
            row(json!({"ArcID": "ARC-0001", "ArcType": "crisis", "Hold": "TRUE"})),
            row(json!({"ArcID": "ARC-0002", "ArcType": "strain", "Escalate": "yes", "ForceResolve": ""})),
            row(json!({"ArcID": "ARC-0003", "ArcType": "rivalry", "ForceResolve": "Story closed by desk"})),
        ]);
        let world = load_world(&store).unwrap();
        assert_eq!(
            world.arc_interventions,
            [
                ArcIntervention::new("ARC-0001", InterventionCommand::Hold),
                ArcIntervention::new("ARC-0002", InterventionCommand::Escalate),
                ArcIntervention::new(
                    "ARC-0003",
                    InterventionCommand::ForceResolve {
                        reason: "Story closed by desk".to_string()
                    }
                ),
            ]
        );

        let mut store2 = MemoryLedger::new();
        save_world(&mut store2, &world).unwrap();
        for r in store2.rows(Sheet::Arcs) {
            assert!(!r.contains_key(HOLD_COLUMN));
            assert!(!r.contains_key(FORCE_RESOLVE_COLUMN));
            assert_eq!(r[SCHEMA_COLUMN], json!(2));
        }
    }
}
