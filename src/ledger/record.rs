//! Typed ledger records and schema migration.
//!
//! Every written row carries a `_schema` column. On read, rows older than the
//! record's current version are migrated column-by-column, blank cells fall
//! back to field defaults, and rows that still fail to decode are skipped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{LedgerStore, Row, Sheet};
use crate::error::LedgerError;
use crate::model::{
    ArcIntervention, CouncilSeat, DriftState, EconomicRipple, Initiative, MoodDescriptor,
    PopulationRecord, StoryArc, economy::MOOD_NEUTRAL,
};

/// Column holding the schema version a row was written with.
pub const SCHEMA_COLUMN: &str = "_schema";

/// Rows written before versioning are treated as version 1.
const UNVERSIONED: u32 = 1;

pub trait LedgerRecord: Serialize + DeserializeOwned {
    const SHEET: Sheet;
    const SCHEMA_VERSION: u32;

    /// Upgrade `row` in place from `from` to [`Self::SCHEMA_VERSION`].
    fn migrate(_row: &mut Row, _from: u32) {}
}

// --- Column helpers ---

/// Move `from` to `to` unless `to` is already present.
pub fn rename_column(row: &mut Row, from: &str, to: &str) {
    if row.contains_key(to) {
        row.remove(from);
    } else if let Some(value) = row.remove(from) {
        row.insert(to.to_string(), value);
    }
}

/// Spreadsheet truthiness: booleans, numbers, and yes/no style strings.
/// Blank cells are `None`.
pub fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" => None,
            "true" | "yes" | "y" | "x" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_bool(row: &mut Row, column: &str) {
    if let Some(b) = row.get(column).and_then(truthy) {
        row.insert(column.to_string(), Value::Bool(b));
    }
}

// --- Read / write ---

/// Decode raw rows of `T::SHEET`, migrating and skipping as needed.
pub fn decode_rows<T: LedgerRecord>(rows: Vec<Row>) -> Vec<T> {
    let sheet = T::SHEET;
    let mut out = Vec::with_capacity(rows.len());
    for (index, mut row) in rows.into_iter().enumerate() {
        let version = row
            .remove(SCHEMA_COLUMN)
            .and_then(|v| v.as_u64())
            .map_or(UNVERSIONED, |v| v as u32);
        if version > T::SCHEMA_VERSION {
            warn!(%sheet, row = index, version, "row written by a newer schema");
        } else if version < T::SCHEMA_VERSION {
            T::migrate(&mut row, version);
        }
        row.retain(|_, v| !(v.is_null() || v.as_str().is_some_and(|s| s.trim().is_empty())));

        match serde_json::from_value(Value::Object(row)) {
            Ok(record) => out.push(record),
            Err(e) => warn!(%sheet, row = index, error = %e, "unreadable ledger row; skipped"),
        }
    }
    out
}

/// Read every record of `T::SHEET`. A missing sheet reads as empty.
pub fn read_records<T: LedgerRecord>(store: &dyn LedgerStore) -> Result<Vec<T>, LedgerError> {
    match store.read_rows(T::SHEET)? {
        Some(rows) => Ok(decode_rows(rows)),
        None => {
            warn!(sheet = %T::SHEET, "ledger sheet missing; treating as empty");
            Ok(Vec::new())
        }
    }
}

/// Replace `T::SHEET` with `records`, stamping the current schema version.
pub fn write_records<T: LedgerRecord>(
    store: &mut dyn LedgerStore,
    records: &[T],
) -> Result<(), LedgerError> {
    let (sheet, rows) = encode_records(records)?;
    store.write_rows(sheet, &rows)
}

/// Encode `records` as rows of `T::SHEET`, stamped with the schema version.
pub fn encode_records<T: LedgerRecord>(records: &[T]) -> Result<(Sheet, Vec<Row>), LedgerError> {
    let sheet = T::SHEET;
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let value =
            serde_json::to_value(record).map_err(|source| LedgerError::Encode { sheet, source })?;
        let mut row = match value {
            Value::Object(row) => row,
            other => {
                let mut row = Row::new();
                row.insert("Value".to_string(), other);
                row
            }
        };
        row.insert(SCHEMA_COLUMN.to_string(), Value::from(T::SCHEMA_VERSION));
        rows.push(row);
    }
    Ok((sheet, rows))
}

// --- Records ---

impl LedgerRecord for StoryArc {
    const SHEET: Sheet = Sheet::Arcs;
    const SCHEMA_VERSION: u32 = 2;

    fn migrate(row: &mut Row, from: u32) {
        if from < 2 {
            rename_column(row, "Type", "ArcType");
            rename_column(row, "CycleCreated", "CreatedCycle");
            rename_column(row, "CycleResolved", "ResolvedCycle");
            coerce_bool(row, "Held");
        }
    }
}

impl LedgerRecord for Initiative {
    const SHEET: Sheet = Sheet::Initiatives;
    const SCHEMA_VERSION: u32 = 2;

    fn migrate(row: &mut Row, from: u32) {
        if from < 2 {
            rename_column(row, "Cycle", "VoteCycle");
            rename_column(row, "Swing2", "SwingVoter2");
            rename_column(row, "Swing2Lean", "SwingVoter2Lean");
        }
    }
}

impl LedgerRecord for CouncilSeat {
    const SHEET: Sheet = Sheet::Council;
    const SCHEMA_VERSION: u32 = 2;

    fn migrate(row: &mut Row, from: u32) {
        if from < 2 {
            rename_column(row, "Member", "Holder");
            rename_column(row, "CanVote", "Voting");
            coerce_bool(row, "Voting");
        }
    }
}

impl LedgerRecord for PopulationRecord {
    const SHEET: Sheet = Sheet::Population;
    const SCHEMA_VERSION: u32 = 2;

    fn migrate(row: &mut Row, from: u32) {
        if from < 2 {
            rename_column(row, "Population", "TotalPopulation");
            // v1 stored the illness rate as a percentage.
            if let Some(rate) = row.get("IllnessRate").and_then(Value::as_f64) {
                if rate > 1.0 {
                    row.insert("IllnessRate".to_string(), Value::from(rate / 100.0));
                }
            }
        }
    }
}

impl LedgerRecord for EconomicRipple {
    const SHEET: Sheet = Sheet::Ripples;
    const SCHEMA_VERSION: u32 = 1;
}

/// Single-row sheet carrying engine state that has no other home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EngineStateRecord {
    pub cycle: u32,
    pub economic_mood: f64,
    pub mood_descriptor: MoodDescriptor,
    pub drift: DriftState,
    pub rng_state: Option<String>,
    pub next_arc_id: u64,
    /// Interventions queued for a cycle that has not run yet.
    pub pending_interventions: Vec<ArcIntervention>,
}

impl Default for EngineStateRecord {
    fn default() -> Self {
        Self {
            cycle: 0,
            economic_mood: MOOD_NEUTRAL,
            mood_descriptor: MoodDescriptor::Stable,
            drift: DriftState::default(),
            rng_state: None,
            next_arc_id: 1,
            pending_interventions: Vec::new(),
        }
    }
}

impl LedgerRecord for EngineStateRecord {
    const SHEET: Sheet = Sheet::EngineState;
    const SCHEMA_VERSION: u32 = 1;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ledger::MemoryLedger;
    use crate::model::{ArcType, Faction};

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn missing_sheet_reads_empty() {
        let store = MemoryLedger::new();
        let arcs: Vec<StoryArc> = read_records(&store).unwrap();
        assert!(arcs.is_empty());
    }

    #[test]
    fn written_rows_carry_schema_version() {
        let mut store = MemoryLedger::new();
        let seat = CouncilSeat {
            seat: 3,
            holder: "A. Ruiz".to_string(),
            ..CouncilSeat::default()
        };
        write_records(&mut store, &[seat.clone()]).unwrap();
        assert_eq!(store.rows(Sheet::Council)[0][SCHEMA_COLUMN], json!(2));
        let back: Vec<CouncilSeat> = read_records(&store).unwrap();
        assert_eq!(back, [seat]);
    }

    #[test]
    fn blank_and_missing_cells_use_defaults() {
        let rows = vec![row(json!({
            "_schema": 2,
            "ArcID": "ARC-0004",
            "ArcType": "strain",
            "District": "",
            "Tension": 3.5,
            "Domain": null,
        }))];
        let arcs: Vec<StoryArc> = decode_rows(rows);
        assert_eq!(arcs[0].arc_type, ArcType::Strain);
        assert_eq!(arcs[0].district, None);
        assert_eq!(arcs[0].domain, None);
        assert_eq!(arcs[0].age, 0);
    }

    #[test]
    fn unreadable_rows_are_skipped() {
        let rows = vec![
            row(json!({"Seat": 1, "Holder": "A. Ruiz", "Faction": "crc"})),
            row(json!({"Seat": "first", "Holder": "B. Lin"})),
        ];
        let seats: Vec<CouncilSeat> = decode_rows(rows);
        assert_eq!(seats.len(), 1);
        assert_eq!(seats[0].faction, Faction::Reform);
    }

    #[test]
    fn v1_rows_are_migrated() {
        let seats: Vec<CouncilSeat> = decode_rows(vec![row(json!({
            "Seat": 2,
            "Member": "C. Okafor",
            "CanVote": "no",
        }))]);
        assert_eq!(seats[0].holder, "C. Okafor");
        assert!(!seats[0].voting);

        let pop: Vec<PopulationRecord> = decode_rows(vec![row(json!({
            "Population": 410000,
            "IllnessRate": 6.5,
        }))]);
        assert_eq!(pop[0].total_population, 410_000);
        assert!((pop[0].illness_rate - 0.065).abs() < 1e-12);

        let initiatives: Vec<Initiative> = decode_rows(vec![row(json!({
            "InitiativeID": "INIT-7",
            "Cycle": 12,
            "Swing2": "D. Park",
        }))]);
        assert_eq!(initiatives[0].vote_cycle, 12);
        assert_eq!(initiatives[0].swing_voter_2, "D. Park");
    }

    #[test]
    fn rename_keeps_existing_target() {
        let mut r = row(json!({"Type": "crisis", "ArcType": "strain"}));
        rename_column(&mut r, "Type", "ArcType");
        assert_eq!(r.get("ArcType"), Some(&json!("strain")));
        assert!(!r.contains_key("Type"));
    }

    #[test]
    fn truthiness() {
        assert_eq!(truthy(&json!("Yes")), Some(true));
        assert_eq!(truthy(&json!("")), None);
        assert_eq!(truthy(&json!(0)), Some(false));
        assert_eq!(truthy(&json!("maybe")), None);
    }
}
