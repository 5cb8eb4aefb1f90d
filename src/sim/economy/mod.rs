mod catalog;
mod detect;
mod mood;

pub use catalog::{KEYWORDS, TriggerSpec, match_keywords, trigger_spec};
pub use detect::{
    ShockRequest, calendar_shocks, drift_shock, event_shocks, workforce_shocks,
};
pub use mood::{
    aggregate_mood, base_mood, calendar_adjustment, district_economies, employment_rate,
    retail_adjustment,
};

use tracing::debug;

use super::context::TickContext;
use super::signal::SignalKind;
use super::system::SimSystem;
use crate::model::{
    Calendar, CalendarSnapshot, CityEvent, EconomicRipple, EconomyState, SportsPhase,
};

pub struct EconomySystem;

impl SimSystem for EconomySystem {
    fn name(&self) -> &str {
        "economy"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let cycle = ctx.world.cycle;
        let calendar = ctx.world.environment.calendar.clone();
        let sports_phase = ctx.config.sports_phase(calendar.sports_phase);

        // 5 first: a ripple expiring this cycle must not suppress its renewal
        let expired = decay(&mut ctx.world.economy, cycle);

        // 1-4: detect this cycle's shocks
        let mut requests: Vec<ShockRequest> = Vec::new();
        requests.extend(drift_shock(&ctx.world.drift));
        requests.extend(workforce_shocks(&ctx.world.workforce));
        requests.extend(calendar_shocks(&calendar, sports_phase, &ctx.world.economy));
        let events: Vec<CityEvent> = ctx
            .world
            .environment
            .chaos
            .iter()
            .chain(&ctx.world.events)
            .cloned()
            .collect();
        requests.extend(event_shocks(&events, ctx.rng));

        let mut created = Vec::new();
        for request in &requests {
            let ripple = build_ripple(request, cycle, &calendar, sports_phase);
            if register(&mut ctx.world.economy, ripple.clone()) {
                debug!(ripple = %ripple.id, impact = ripple.impact, "ripple created");
                created.push(ripple);
            }
        }

        // 6-8: mood, employment, districts
        let economy = &mut ctx.world.economy;
        let mood = aggregate_mood(
            economy.mood,
            &economy.ripples,
            &calendar,
            sports_phase,
            &ctx.world.districts,
        );
        economy.set_mood(mood);
        ctx.world.population.employment_rate = employment_rate(mood, ctx.world.drift.city);
        economy.districts = district_economies(
            mood,
            &economy.ripples,
            &calendar,
            sports_phase,
            &ctx.world.districts,
        );
        debug!(cycle, mood, descriptor = %economy.descriptor, "economic mood updated");

        for ripple in created {
            ctx.emit(SignalKind::RippleCreated {
                ripple_id: ripple.id,
                trigger: ripple.trigger,
                impact: ripple.impact,
                primary_district: ripple.primary_district,
            });
        }
        for ripple in expired {
            ctx.emit(SignalKind::RippleExpired {
                ripple_id: ripple.id,
                trigger: ripple.trigger,
            });
        }
    }
}

/// Turn a detected shock into a ripple starting at `cycle`.
///
/// Catalog candidates become the affected set; a primary district outside
/// that set is added to it.
pub fn build_ripple(
    request: &ShockRequest,
    cycle: u32,
    calendar: &Calendar,
    sports_phase: SportsPhase,
) -> EconomicRipple {
    let spec = trigger_spec(request.trigger);
    let mut districts: Vec<String> = spec.districts.iter().map(|d| d.to_string()).collect();
    if let Some(primary) = &request.primary_district {
        if !districts.is_empty() && !districts.iter().any(|d| d.eq_ignore_ascii_case(primary)) {
            districts.push(primary.clone());
        }
    }

    EconomicRipple {
        id: ripple_id(cycle, request),
        trigger: request.trigger,
        impact: spec.impact,
        sectors: spec.sectors.iter().map(|s| s.to_string()).collect(),
        districts,
        primary_district: request.primary_district.clone(),
        start_cycle: cycle,
        end_cycle: cycle + spec.duration,
        current_strength: spec.impact,
        source: request.source.clone(),
        calendar: CalendarSnapshot {
            season: calendar.season,
            holiday: calendar.holiday,
            sports_phase,
            first_friday: calendar.first_friday,
            creation_day: calendar.creation_day,
        },
    }
}

fn ripple_id(cycle: u32, request: &ShockRequest) -> String {
    format!("RPL-{cycle}-{}", request.trigger)
}

/// Insert unless a ripple with the same id already exists.
fn register(economy: &mut EconomyState, ripple: EconomicRipple) -> bool {
    if economy.ripples.iter().any(|r| r.id == ripple.id) {
        return false;
    }
    economy.ripples.push(ripple);
    true
}

/// Drop elapsed ripples and recompute the rest. Returns the dropped ones.
pub fn decay(economy: &mut EconomyState, cycle: u32) -> Vec<EconomicRipple> {
    let (expired, mut active): (Vec<_>, Vec<_>) = economy
        .ripples
        .drain(..)
        .partition(|r| r.is_expired(cycle));
    for ripple in &mut active {
        ripple.current_strength = ripple.strength_at(cycle);
    }
    economy.ripples = active;
    expired
}
