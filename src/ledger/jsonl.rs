use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use super::{LedgerStore, Row, Sheet};
use crate::error::LedgerError;

/// A directory holding one `<sheet>.jsonl` file per sheet, one JSON object
/// per line.
#[derive(Debug, Clone)]
pub struct JsonlLedger {
    dir: PathBuf,
}

impl JsonlLedger {
    /// Open `dir`, creating it if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sheet_path(&self, sheet: Sheet) -> PathBuf {
        self.dir.join(format!("{sheet}.jsonl"))
    }

    fn staging_path(&self, sheet: Sheet) -> PathBuf {
        self.sheet_path(sheet).with_extension("jsonl.tmp")
    }

    /// Write `rows` to the sheet's sibling temp file.
    fn stage(&self, sheet: Sheet, rows: &[Row]) -> Result<PathBuf, LedgerError> {
        let tmp = self.staging_path(sheet);

        let mut buf = Vec::new();
        for row in rows {
            serde_json::to_writer(&mut buf, row)
                .map_err(|source| LedgerError::Encode { sheet, source })?;
            buf.push(b'\n');
        }

        let write = |target: &Path| -> io::Result<()> {
            let mut writer = BufWriter::new(File::create(target)?);
            writer.write_all(&buf)?;
            writer.flush()
        };
        write(&tmp).map_err(|source| LedgerError::Write {
            sheet,
            path: tmp.clone(),
            source,
        })?;
        Ok(tmp)
    }

    /// Rename a staged temp file over its sheet.
    fn commit(&self, sheet: Sheet, tmp: &Path) -> Result<(), LedgerError> {
        let path = self.sheet_path(sheet);
        fs::rename(tmp, &path).map_err(|source| LedgerError::Write { sheet, path, source })
    }
}

impl LedgerStore for JsonlLedger {
    fn read_rows(&self, sheet: Sheet) -> Result<Option<Vec<Row>>, LedgerError> {
        let path = self.sheet_path(sheet);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(LedgerError::Read { sheet, path, source }),
        };

        let mut rows = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| LedgerError::Read {
                sheet,
                path: path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(&line) {
                Ok(Value::Object(row)) => rows.push(row),
                Ok(_) => warn!(%sheet, line = index + 1, "ledger line is not an object; skipped"),
                Err(e) => {
                    warn!(%sheet, line = index + 1, error = %e, "malformed ledger line; skipped")
                }
            }
        }
        Ok(Some(rows))
    }

    /// Writes to a sibling temp file and renames it over the sheet, so a
    /// failed write never leaves a half-written sheet behind.
    fn write_rows(&mut self, sheet: Sheet, rows: &[Row]) -> Result<(), LedgerError> {
        let tmp = self.stage(sheet, rows)?;
        self.commit(sheet, &tmp)
    }

    /// Stages every sheet before renaming any of them. A failed stage
    /// removes the temp files already written and leaves every sheet as it was.
    fn write_batch(&mut self, batch: &[(Sheet, Vec<Row>)]) -> Result<(), LedgerError> {
        let mut staged = Vec::with_capacity(batch.len());
        for (sheet, rows) in batch {
            match self.stage(*sheet, rows) {
                Ok(tmp) => staged.push((*sheet, tmp)),
                Err(e) => {
                    for (_, tmp) in &staged {
                        if let Err(error) = fs::remove_file(tmp) {
                            warn!(path = ?tmp, %error, "could not remove staged sheet");
                        }
                    }
                    return Err(e);
                }
            }
        }
        for (sheet, tmp) in &staged {
            self.commit(*sheet, tmp)?;
        }
        Ok(())
    }
}
