mod council;
mod odds;

pub use council::{assemble, majority_bloc};
pub use odds::{
    GRANT_MAX, GRANT_MIN, SWING_MAX, SWING_MIN, VoteRequirement, grant_probability,
    independent_probability, lean_base, primary_swing_probability, projection_base,
    secondary_swing_probability,
};

use rand::{Rng, RngCore};
use tracing::{debug, info};

use super::context::TickContext;
use super::signal::SignalKind;
use super::system::SimSystem;
use crate::model::legislature::AvailableMember;
use crate::model::{
    CouncilState, Faction, Initiative, InitiativeKind, InitiativeStatus, SwingVote, VoteTally,
};

// --- Constants ---

/// Sentiment shift applied when a council vote passes (negated on failure).
const VOTE_SENTIMENT_SHIFT: f64 = 0.05;
/// Proposed items become active this many cycles before their vote.
const ACTIVATION_WINDOW: u32 = 3;

/// What the engine decided for one initiative at its scheduled cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub status: InitiativeStatus,
    pub outcome: String,
    pub consequences: String,
    pub notes: String,
    pub tally: Option<VoteTally>,
    pub sentiment_delta: f64,
}

pub struct LegislatureSystem;

impl SimSystem for LegislatureSystem {
    fn name(&self) -> &str {
        "legislature"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let cycle = ctx.world.cycle;
        let council = assemble(&ctx.world.council);
        if council.total_seats == 0 {
            debug!(cycle, "council roster is empty");
        }

        for idx in 0..ctx.world.initiatives.len() {
            let sentiment = ctx.world.environment.sentiment;
            let initiative = &mut ctx.world.initiatives[idx];

            if initiative.vote_cycle != cycle || !initiative.status.is_open() {
                if let Some(status) = auto_advance(initiative, cycle) {
                    debug!(initiative = %initiative.id, %status, "initiative advanced");
                }
                continue;
            }

            let decision = decide(initiative, &council, sentiment, ctx.rng);
            apply(initiative, &decision, cycle);
            info!(
                initiative = %initiative.id,
                status = %decision.status,
                outcome = %decision.outcome,
                "initiative resolved"
            );

            let (yes, no) = decision
                .tally
                .as_ref()
                .map(|t| (t.yes, t.no))
                .unwrap_or_default();
            let signal = SignalKind::InitiativeResolved {
                initiative_id: initiative.id.clone(),
                name: initiative.name.clone(),
                status: decision.status,
                yes,
                no,
            };
            ctx.emit(signal);

            if decision.sentiment_delta != 0.0 {
                let applied = ctx.world.environment.shift_sentiment(decision.sentiment_delta);
                ctx.emit(SignalKind::SentimentShifted {
                    source: "legislature".to_string(),
                    delta: applied,
                });
            }
        }

        ctx.world.council_state = council;
    }
}

/// Route an initiative to the resolver for its type.
pub fn decide(
    initiative: &Initiative,
    council: &CouncilState,
    sentiment: f64,
    rng: &mut dyn RngCore,
) -> Decision {
    match initiative.kind {
        InitiativeKind::Vote => resolve_vote(initiative, council, sentiment, rng),
        InitiativeKind::Grant | InitiativeKind::External => {
            resolve_grant(initiative, sentiment, rng)
        }
        InitiativeKind::Visioning => complete_visioning(initiative),
    }
}

/// Bloc arithmetic plus probabilistic swing members.
///
/// Each available member casts exactly one vote: named swing voters are drawn
/// first (primary, then secondary), then every other member in roster order.
pub fn resolve_vote(
    initiative: &Initiative,
    council: &CouncilState,
    sentiment: f64,
    rng: &mut dyn RngCore,
) -> Decision {
    let requirement =
        VoteRequirement::parse_or_default(&initiative.id, &initiative.vote_requirement);
    let available = council.available_votes();
    let mut tally = VoteTally {
        required: requirement.required,
        available,
        ..VoteTally::default()
    };

    if available < requirement.required {
        return Decision {
            status: InitiativeStatus::Delayed,
            outcome: "Delayed".to_string(),
            consequences: format!("{} waits until the council can reach quorum.", initiative.name),
            notes: format!(
                "{available} members available, {} required",
                requirement.required
            ),
            tally: Some(tally),
            sentiment_delta: 0.0,
        };
    }

    let lead = initiative
        .lead_faction
        .filter(|f| *f != Faction::Independent)
        .unwrap_or_else(|| majority_bloc(council));
    let opposition = initiative
        .opposition_faction
        .filter(|f| *f != Faction::Independent && *f != lead)
        .or(lead.rival());

    let primary = council.find_available(&initiative.swing_voter);
    let secondary = council
        .find_available(&initiative.swing_voter_2)
        .filter(|m| primary.is_none_or(|p| !p.name.eq_ignore_ascii_case(&m.name)));

    if let Some(member) = primary {
        let p = primary_swing_probability(
            &initiative.projection,
            sentiment,
            requirement.is_supermajority(),
        );
        cast_swing(&mut tally, member, p, rng);
    }
    if let Some(member) = secondary {
        let p = secondary_swing_probability(&initiative.swing_voter_2_lean, sentiment);
        cast_swing(&mut tally, member, p, rng);
    }

    let is_named = |m: &AvailableMember| {
        [primary, secondary]
            .into_iter()
            .flatten()
            .any(|n| n.name == m.name)
    };
    for member in council.available.iter().filter(|m| !is_named(m)) {
        let yes = if member.faction == lead {
            true
        } else if Some(member.faction) == opposition {
            false
        } else {
            rng.random_bool(independent_probability(sentiment))
        };
        record(&mut tally, yes);
    }

    let passed = tally.yes >= requirement.required;
    let (status, verdict, consequences, delta) = if passed {
        (
            InitiativeStatus::Passed,
            "Passed",
            format!("{} is adopted and moves to implementation.", initiative.name),
            VOTE_SENTIMENT_SHIFT,
        )
    } else {
        (
            InitiativeStatus::Failed,
            "Failed",
            format!("{} is defeated and returns to committee.", initiative.name),
            -VOTE_SENTIMENT_SHIFT,
        )
    };

    let swing = if tally.swing.is_empty() {
        "no named swing votes".to_string()
    } else {
        tally
            .swing
            .iter()
            .map(|s| {
                let choice = if s.voted_yes { "yes" } else { "no" };
                format!("{} {choice} at {:.0}%", s.member, s.probability * 100.0)
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    Decision {
        status,
        outcome: format!("{verdict} {}-{}", tally.yes, tally.no),
        consequences,
        notes: format!(
            "Vote {}-{} with {} required; {swing}",
            tally.yes, tally.no, requirement.required
        ),
        tally: Some(tally),
        sentiment_delta: delta,
    }
}

fn cast_swing(tally: &mut VoteTally, member: &AvailableMember, p: f64, rng: &mut dyn RngCore) {
    let voted_yes = rng.random_bool(p);
    record(tally, voted_yes);
    tally.swing.push(SwingVote {
        member: member.name.clone(),
        probability: p,
        voted_yes,
    });
}

fn record(tally: &mut VoteTally, yes: bool) {
    if yes {
        tally.yes += 1;
    } else {
        tally.no += 1;
    }
}

/// One Bernoulli draw for grants and outside decisions.
pub fn resolve_grant(initiative: &Initiative, sentiment: f64, rng: &mut dyn RngCore) -> Decision {
    let p = grant_probability(&initiative.projection, sentiment);
    let awarded = rng.random_bool(p);
    let (status, outcome, consequences) = if awarded {
        (
            InitiativeStatus::Passed,
            "Awarded",
            format!("{} is funded.", initiative.name),
        )
    } else {
        (
            InitiativeStatus::Failed,
            "Denied",
            format!("{} is not funded this round.", initiative.name),
        )
    };
    Decision {
        status,
        outcome: outcome.to_string(),
        consequences,
        notes: format!("decision odds {:.0}%", p * 100.0),
        tally: None,
        sentiment_delta: 0.0,
    }
}

/// Visioning items always complete.
pub fn complete_visioning(initiative: &Initiative) -> Decision {
    Decision {
        status: InitiativeStatus::Resolved,
        outcome: "Completed".to_string(),
        consequences: format!("{} concludes and feeds the planning agenda.", initiative.name),
        notes: String::new(),
        tally: None,
        sentiment_delta: 0.0,
    }
}

fn apply(initiative: &mut Initiative, decision: &Decision, cycle: u32) {
    initiative.status = decision.status;
    initiative.outcome = decision.outcome.clone();
    initiative.consequences = decision.consequences.clone();
    if !decision.notes.is_empty() {
        let note = format!("C{cycle}: {}", decision.notes);
        initiative.notes = if initiative.notes.trim().is_empty() {
            note
        } else {
            format!("{} | {note}", initiative.notes.trim())
        };
    }
    initiative.tally = decision.tally.clone();
    initiative.last_updated = cycle;
}

/// Move an unscheduled-this-cycle item along by proximity to its vote.
pub fn auto_advance(initiative: &mut Initiative, cycle: u32) -> Option<InitiativeStatus> {
    if initiative.vote_cycle <= cycle {
        return None;
    }
    let until = initiative.vote_cycle - cycle;
    let next = match initiative.status {
        InitiativeStatus::Proposed | InitiativeStatus::Active if until == 1 => {
            InitiativeStatus::PendingVote
        }
        InitiativeStatus::Proposed if until <= ACTIVATION_WINDOW => InitiativeStatus::Active,
        _ => return None,
    };
    initiative.status = next;
    initiative.last_updated = cycle;
    Some(next)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::CouncilSeat;

    fn roster(spec: &[(&str, Faction, &str)]) -> Vec<CouncilSeat> {
        spec.iter()
            .enumerate()
            .map(|(i, (holder, faction, status))| CouncilSeat {
                seat: i as u32 + 1,
                district: format!("D{}", i + 1),
                holder: holder.to_string(),
                status: status.to_string(),
                faction: *faction,
                voting: true,
            })
            .collect()
    }

    fn nine_seats() -> Vec<CouncilSeat> {
        roster(&[
            ("P1", Faction::Progressive, "active"),
            ("P2", Faction::Progressive, "active"),
            ("P3", Faction::Progressive, "active"),
            ("P4", Faction::Progressive, "active"),
            ("R1", Faction::Reform, "active"),
            ("R2", Faction::Reform, "active"),
            ("R3", Faction::Reform, "active"),
            ("Swing", Faction::Independent, "active"),
            ("", Faction::Reform, ""),
        ])
    }

    fn vote(projection: &str) -> Initiative {
        Initiative {
            id: "INIT-1".to_string(),
            name: "Transit Levy".to_string(),
            kind: InitiativeKind::Vote,
            status: InitiativeStatus::PendingVote,
            vote_requirement: "5-of-9".to_string(),
            vote_cycle: 10,
            projection: projection.to_string(),
            lead_faction: Some(Faction::Progressive),
            opposition_faction: Some(Faction::Reform),
            swing_voter: "Swing".to_string(),
            ..Initiative::default()
        }
    }

    #[test]
    fn swing_voter_decides_close_vote() {
        let council = assemble(&nine_seats());
        let initiative = vote("Likely passes");
        let mut outcomes = (0, 0);
        for seed in 0..64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let decision = resolve_vote(&initiative, &council, 0.0, &mut rng);
            let tally = decision.tally.unwrap();
            assert_eq!(tally.swing.len(), 1);
            assert_eq!(tally.swing[0].probability, 0.70);
            assert_eq!(tally.total_cast(), 8);
            if tally.swing[0].voted_yes {
                assert_eq!(decision.status, InitiativeStatus::Passed);
                assert_eq!(tally.yes, 5);
                outcomes.0 += 1;
            } else {
                assert_eq!(decision.status, InitiativeStatus::Failed);
                assert_eq!(tally.yes, 4);
                outcomes.1 += 1;
            }
        }
        assert!(outcomes.0 > 0 && outcomes.1 > 0);
    }

    #[test]
    fn quorum_shortfall_delays() {
        let mut seats = nine_seats();
        for seat in seats.iter_mut().take(5) {
            seat.status = "hospitalized".to_string();
        }
        let council = assemble(&seats);
        let mut rng = SmallRng::seed_from_u64(42);
        let decision = resolve_vote(&vote("likely pass"), &council, 0.0, &mut rng);
        assert_eq!(decision.status, InitiativeStatus::Delayed);
        assert_eq!(decision.sentiment_delta, 0.0);
        assert_eq!(decision.tally.unwrap().total_cast(), 0);
    }

    #[test]
    fn secondary_swing_uses_lean() {
        let council = assemble(&nine_seats());
        let mut initiative = vote("toss-up");
        initiative.swing_voter_2 = "R3".to_string();
        initiative.swing_voter_2_lean = "lean yes".to_string();
        let mut rng = SmallRng::seed_from_u64(42);
        let tally = resolve_vote(&initiative, &council, 0.0, &mut rng).tally.unwrap();
        assert_eq!(tally.swing.len(), 2);
        assert_eq!(tally.swing[1].member, "R3");
        assert_eq!(tally.swing[1].probability, 0.65);
        assert_eq!(tally.total_cast(), 8);
    }

    #[test]
    fn lead_defaults_to_larger_bloc() {
        let council = assemble(&nine_seats());
        let mut initiative = vote("");
        initiative.lead_faction = None;
        initiative.opposition_faction = None;
        initiative.swing_voter.clear();
        let mut rng = SmallRng::seed_from_u64(1);
        let tally = resolve_vote(&initiative, &council, 0.0, &mut rng).tally.unwrap();
        // 4 progressive yes, 3 reform no, the independent is a coin flip.
        assert!(tally.yes == 4 || tally.yes == 5);
        assert_eq!(tally.total_cast(), 8);
    }

    #[test]
    fn visioning_always_completes() {
        let mut initiative = vote("");
        initiative.kind = InitiativeKind::Visioning;
        let mut rng = SmallRng::seed_from_u64(42);
        let decision = decide(&initiative, &CouncilState::default(), 0.0, &mut rng);
        assert_eq!(decision.status, InitiativeStatus::Resolved);
        assert_eq!(decision.outcome, "Completed");
    }

    #[test]
    fn grants_resolve_with_one_draw() {
        let mut initiative = vote("likely");
        initiative.kind = InitiativeKind::Grant;
        let mut rng = SmallRng::seed_from_u64(42);
        let decision = decide(&initiative, &CouncilState::default(), 0.0, &mut rng);
        assert!(matches!(
            decision.status,
            InitiativeStatus::Passed | InitiativeStatus::Failed
        ));
        assert!(decision.tally.is_none());
    }

    #[test]
    fn auto_advance_by_proximity() {
        let mut initiative = vote("");
        initiative.status = InitiativeStatus::Proposed;
        assert_eq!(auto_advance(&mut initiative, 5), None);
        assert_eq!(auto_advance(&mut initiative, 7), Some(InitiativeStatus::Active));
        assert_eq!(auto_advance(&mut initiative, 8), None);
        assert_eq!(auto_advance(&mut initiative, 9), Some(InitiativeStatus::PendingVote));
        assert_eq!(auto_advance(&mut initiative, 10), None);
    }
}
