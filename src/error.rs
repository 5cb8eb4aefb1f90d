use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ledger::Sheet;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger sheet {sheet} from {path:?}: {source}")]
    Read {
        sheet: Sheet,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write ledger sheet {sheet} to {path:?}: {source}")]
    Write {
        sheet: Sheet,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode ledger sheet {sheet}: {source}")]
    Encode {
        sheet: Sheet,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse sim config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read sim config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("malformed rng resume token: {0}")]
    RngToken(String),
}
