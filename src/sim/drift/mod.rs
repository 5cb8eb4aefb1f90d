mod districts;
mod factors;
mod feedback;
mod summary;

pub use districts::{DistrictBias, district_drift};
pub use factors::{Contributions, city_drift, normalize_migration};
pub use feedback::{apply_city_feedback, apply_district_feedback};
pub use summary::DriftSummary;

use std::collections::BTreeMap;

use rand::RngCore;
use tracing::debug;

use super::context::TickContext;
use super::system::SimSystem;
use crate::config::SimConfig;
use crate::model::{DistrictEconomy, DriftState, EconomyState, MoodDescriptor, WorldState};

/// Read-only copy of the economy taken before drift is computed.
///
/// Feedback mutates the live economy afterwards; the drift stage only ever
/// sees this snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct EconomySnapshot {
    pub mood: f64,
    pub descriptor: MoodDescriptor,
    pub positive_ripples: usize,
    pub negative_ripples: usize,
    pub districts: BTreeMap<String, DistrictEconomy>,
}

impl EconomySnapshot {
    pub fn capture(economy: &EconomyState) -> Self {
        Self {
            mood: economy.mood,
            descriptor: economy.descriptor,
            positive_ripples: economy.ripples.iter().filter(|r| r.is_positive()).count(),
            negative_ripples: economy.ripples.iter().filter(|r| r.impact < 0.0).count(),
            districts: economy.districts.clone(),
        }
    }
}

pub struct DriftSystem;

impl SimSystem for DriftSystem {
    fn name(&self) -> &str {
        "drift"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        // Stage 1: drift from the pre-feedback economy.
        let snapshot = EconomySnapshot::capture(&ctx.world.economy);
        let mut state = compute_drift(ctx.world, &snapshot, ctx.config, ctx.rng);

        // Stage 2: bounded correction back into the economy.
        let feedback = &ctx.config.feedback;
        state.mood_feedback = apply_city_feedback(
            &mut ctx.world.economy,
            state.city,
            ctx.world.environment.sentiment,
            feedback,
        );
        apply_district_feedback(&mut ctx.world.economy, &state.districts, feedback);

        debug!(
            cycle = ctx.world.cycle,
            city = state.city,
            factors = ?state.factors,
            mood_feedback = state.mood_feedback,
            "drift computed"
        );
        ctx.world.drift = state;
    }
}

/// City and district drift for this cycle. Does not mutate the world.
pub fn compute_drift(
    world: &WorldState,
    economy: &EconomySnapshot,
    config: &SimConfig,
    rng: &mut dyn RngCore,
) -> DriftState {
    let env = &world.environment;
    let sports_phase = config.sports_phase(env.calendar.sports_phase);
    let city = city_drift(
        env,
        &world.population,
        economy,
        sports_phase,
        config.crowd_intensity(),
        rng,
    );

    let mut state = DriftState::default();
    state.set_city(city.total);
    state.factors = city.factors;
    state.factor_weights = city.weights;

    let bias = config.manual_district_bias.as_deref().map(|district| DistrictBias {
        district,
        amount: config.district_bias_amount,
    });
    for (name, metrics) in &world.districts {
        let value = district_drift(
            name,
            metrics,
            state.city,
            economy.districts.get(name),
            bias,
            sports_phase.is_postseason(),
        );
        state.set_district(name, value);
    }
    state
}
