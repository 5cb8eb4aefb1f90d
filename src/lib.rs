pub mod config;
pub mod error;
pub mod id;
pub mod ledger;
pub mod model;
pub mod scenario;
pub mod sim;
pub mod testutil;

pub use config::SimConfig;
pub use error::{ConfigError, LedgerError};
pub use id::IdGenerator;
pub use model::WorldState;
pub use sim::{CycleReport, CycleRunner, Signal, SignalKind};
