pub mod arcs;
pub mod drift;
pub mod economy;
pub mod legislature;

mod context;
mod rng;
mod runner;
mod signal;
mod system;

pub use arcs::ArcSystem;
pub use context::TickContext;
pub use drift::{DriftSummary, DriftSystem};
pub use economy::EconomySystem;
pub use legislature::LegislatureSystem;
pub use rng::{RandomSource, RngState};
pub use runner::{CycleReport, CycleRunner, default_systems, run_cycle};
pub use signal::{ResolutionSeed, Signal, SignalKind};
pub use system::SimSystem;
