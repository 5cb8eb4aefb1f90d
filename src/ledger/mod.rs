//! Persistence boundary: whole-sheet reads and writes of header-keyed rows.
//!
//! A sheet is read in bulk at the start of a cycle, and every sheet is written
//! together in one batch at the end. Stores only move rows; typing, defaults
//! and schema migration live in [`record`], and the mapping onto a
//! [`WorldState`](crate::model::WorldState) lives in [`sync`].

mod jsonl;
mod memory;
pub mod record;
mod sync;

use std::fmt;

use serde_json::{Map, Value};

use crate::error::LedgerError;

pub use jsonl::JsonlLedger;
pub use memory::MemoryLedger;
pub use record::{
    EngineStateRecord, LedgerRecord, SCHEMA_COLUMN, encode_records, read_records, write_records,
};
pub use sync::{load_world, save_world};

/// One ledger row, keyed by column name.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sheet {
    Arcs,
    Initiatives,
    Council,
    Population,
    Ripples,
    EngineState,
}

impl Sheet {
    pub const ALL: [Sheet; 6] = [
        Sheet::Arcs,
        Sheet::Initiatives,
        Sheet::Council,
        Sheet::Population,
        Sheet::Ripples,
        Sheet::EngineState,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sheet::Arcs => "arcs",
            Sheet::Initiatives => "initiatives",
            Sheet::Council => "council",
            Sheet::Population => "population",
            Sheet::Ripples => "ripples",
            Sheet::EngineState => "engine-state",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tabular store of named sheets.
pub trait LedgerStore {
    /// All rows of `sheet`, or `None` if the sheet does not exist.
    fn read_rows(&self, sheet: Sheet) -> Result<Option<Vec<Row>>, LedgerError>;

    /// Replace the full contents of `sheet`.
    fn write_rows(&mut self, sheet: Sheet, rows: &[Row]) -> Result<(), LedgerError>;

    /// Replace several sheets as one unit: on error, none of them change.
    fn write_batch(&mut self, batch: &[(Sheet, Vec<Row>)]) -> Result<(), LedgerError>;
}
