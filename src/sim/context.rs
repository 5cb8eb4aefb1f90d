use rand::RngCore;

use super::signal::{Signal, SignalKind};
use crate::config::SimConfig;
use crate::model::WorldState;

/// Context passed to each system on every cycle.
///
/// Bundled so we can add fields later without changing the `SimSystem`
/// trait signature.
pub struct TickContext<'a> {
    pub world: &'a mut WorldState,
    pub rng: &'a mut dyn RngCore,
    pub config: &'a SimConfig,
    /// Systems push signals here during tick.
    pub signals: &'a mut Vec<Signal>,
}

impl TickContext<'_> {
    pub fn emit(&mut self, kind: SignalKind) {
        self.signals.push(Signal {
            cycle: self.world.cycle,
            kind,
        });
    }
}
