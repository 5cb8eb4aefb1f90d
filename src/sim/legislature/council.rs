use crate::model::legislature::{AvailableMember, UnavailableMember};
use crate::model::{CouncilSeat, CouncilState, Faction};

/// Fold the roster into faction counts and availability.
///
/// Non-voting rows are ignored. Incapacitated holders fill their seat but are
/// left out of the faction counts, and are listed with the status code that
/// benched them.
pub fn assemble(roster: &[CouncilSeat]) -> CouncilState {
    let mut state = CouncilState::default();

    for seat in roster.iter().filter(|s| s.voting) {
        state.total_seats += 1;
        if seat.is_vacant() {
            state.vacant += 1;
            continue;
        }
        state.filled += 1;

        let name = seat.holder.trim().to_string();
        if let Some(reason) = seat.incapacity() {
            state.unavailable.push(UnavailableMember {
                name,
                faction: seat.faction,
                reason: reason.to_string(),
            });
            continue;
        }

        let count = state.factions.entry(seat.faction).or_default();
        count.members += 1;
        count.available += 1;
        if seat.faction == Faction::Independent {
            state.independents.push(name.clone());
        }
        state.available.push(AvailableMember {
            name,
            faction: seat.faction,
        });
    }

    state
}

/// The bloc with more available members; ties go to progressive.
pub fn majority_bloc(council: &CouncilState) -> Faction {
    let progressive = council.faction(Faction::Progressive).available;
    let reform = council.faction(Faction::Reform).available;
    if reform > progressive {
        Faction::Reform
    } else {
        Faction::Progressive
    }
}
