use std::collections::BTreeMap;

use super::{LedgerStore, Row, Sheet};
use crate::error::LedgerError;

/// In-process ledger, used by tests and embedding callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    sheets: BTreeMap<Sheet, Vec<Row>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_sheet(&self, sheet: Sheet) -> bool {
        self.sheets.contains_key(&sheet)
    }

    pub fn rows(&self, sheet: Sheet) -> &[Row] {
        self.sheets.get(&sheet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable access for hand edits between cycles, creating the sheet if needed.
    pub fn rows_mut(&mut self, sheet: Sheet) -> &mut Vec<Row> {
        self.sheets.entry(sheet).or_default()
    }
}

impl LedgerStore for MemoryLedger {
    fn read_rows(&self, sheet: Sheet) -> Result<Option<Vec<Row>>, LedgerError> {
        Ok(self.sheets.get(&sheet).cloned())
    }

    fn write_rows(&mut self, sheet: Sheet, rows: &[Row]) -> Result<(), LedgerError> {
        self.sheets.insert(sheet, rows.to_vec());
        Ok(())
    }

    fn write_batch(&mut self, batch: &[(Sheet, Vec<Row>)]) -> Result<(), LedgerError> {
        let mut sheets = self.sheets.clone();
        sheets.extend(batch.iter().cloned());
        self.sheets = sheets;
        Ok(())
    }
}
