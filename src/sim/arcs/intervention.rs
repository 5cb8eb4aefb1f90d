use tracing::{info, warn};

use super::resolution::resolution_seed;
use crate::config::ArcTuning;
use crate::model::{AppliedIntervention, InterventionCommand, ResolutionType, WorldState};
use crate::sim::signal::ResolutionSeed;

/// Drain the intervention queue against live arcs.
///
/// Every command is logged to `world.intervention_log`, including ones that
/// named an unknown or already-resolved arc. Returns seeds for arcs that were
/// force-resolved.
pub fn apply_interventions(world: &mut WorldState, tuning: &ArcTuning) -> Vec<ResolutionSeed> {
    let cycle = world.cycle;
    let mut seeds = Vec::new();

    for intervention in std::mem::take(&mut world.arc_interventions) {
        let arc = world
            .arcs
            .iter_mut()
            .find(|a| a.id == intervention.arc_id && !a.is_resolved());

        let applied = match arc {
            None => {
                warn!(arc = %intervention.arc_id, "intervention targets no live arc");
                false
            }
            Some(arc) => {
                match &intervention.command {
                    InterventionCommand::Hold => arc.held = true,
                    InterventionCommand::Release => arc.held = false,
                    InterventionCommand::Escalate => {
                        arc.set_tension(arc.tension + tuning.escalate_amount);
                    }
                    InterventionCommand::ForceResolve { reason } => {
                        let reason = if reason.trim().is_empty() {
                            "resolved by operator".to_string()
                        } else {
                            reason.clone()
                        };
                        arc.resolve(cycle, ResolutionType::Intervention, reason);
                        seeds.push(resolution_seed(arc));
                    }
                }
                arc.last_updated = cycle;
                info!(arc = %arc.id, command = ?intervention.command, "intervention applied");
                true
            }
        };

        world.intervention_log.push(AppliedIntervention {
            cycle,
            arc_id: intervention.arc_id,
            command: intervention.command,
            applied,
        });
    }
    seeds
}
