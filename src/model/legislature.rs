use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Council
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Faction {
    Progressive,
    Reform,
    #[default]
    Independent,
}

string_enum!(Faction {
    Progressive => "progressive" | "opp",
    Reform => "reform" | "crc",
    Independent => "independent" | "ind" | "",
});

impl Faction {
    /// The other voting bloc; independents have none.
    pub fn rival(self) -> Option<Faction> {
        match self {
            Faction::Progressive => Some(Faction::Reform),
            Faction::Reform => Some(Faction::Progressive),
            Faction::Independent => None,
        }
    }
}

/// Status codes that keep a member from voting.
pub const INCAPACITATING_STATUSES: &[&str] = &[
    "deceased",
    "hospitalized",
    "critical",
    "resigned",
    "recalled",
    "suspended",
    "on-leave",
    "missing",
    "arrested",
];

/// One row of the council roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CouncilSeat {
    pub seat: u32,
    pub district: String,
    /// Empty when the seat is vacant.
    pub holder: String,
    pub status: String,
    pub faction: Faction,
    pub voting: bool,
}

impl Default for CouncilSeat {
    fn default() -> Self {
        Self {
            seat: 0,
            district: String::new(),
            holder: String::new(),
            status: "active".to_string(),
            faction: Faction::Independent,
            voting: true,
        }
    }
}

impl CouncilSeat {
    pub fn is_vacant(&self) -> bool {
        self.holder.trim().is_empty()
    }

    /// The incapacitating status code, if the holder cannot vote.
    pub fn incapacity(&self) -> Option<&'static str> {
        let status = self.status.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        INCAPACITATING_STATUSES
            .iter()
            .find(|code| status.contains(**code))
            .copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FactionCount {
    pub members: u32,
    pub available: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnavailableMember {
    pub name: String,
    pub faction: Faction,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableMember {
    pub name: String,
    pub faction: Faction,
}

/// Council composition derived from the roster each cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CouncilState {
    pub total_seats: u32,
    pub filled: u32,
    pub vacant: u32,
    pub factions: BTreeMap<Faction, FactionCount>,
    pub available: Vec<AvailableMember>,
    pub unavailable: Vec<UnavailableMember>,
    /// Available unaffiliated members, eligible to swing.
    pub independents: Vec<String>,
}

impl CouncilState {
    pub fn available_votes(&self) -> u32 {
        self.available.len() as u32
    }

    pub fn faction(&self, faction: Faction) -> FactionCount {
        self.factions.get(&faction).copied().unwrap_or_default()
    }

    pub fn find_available(&self, name: &str) -> Option<&AvailableMember> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.available
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

// ---------------------------------------------------------------------------
// Initiatives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum InitiativeKind {
    #[default]
    Vote,
    Grant,
    External,
    Visioning,
}

string_enum!(InitiativeKind {
    Vote => "vote" | "council-vote",
    Grant => "grant",
    External => "external",
    Visioning => "visioning",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum InitiativeStatus {
    #[default]
    Proposed,
    Active,
    PendingVote,
    Passed,
    Failed,
    Delayed,
    Resolved,
}

string_enum!(InitiativeStatus {
    Proposed => "proposed",
    Active => "active",
    PendingVote => "pending-vote" | "pending",
    Passed => "passed" | "awarded",
    Failed => "failed" | "denied",
    Delayed => "delayed",
    Resolved => "resolved" | "completed",
});

impl InitiativeStatus {
    /// Open for resolution at its scheduled cycle.
    pub fn is_open(self) -> bool {
        matches!(self, InitiativeStatus::Active | InitiativeStatus::PendingVote)
    }
}

/// One swing member's probabilistic vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingVote {
    pub member: String,
    pub probability: f64,
    pub voted_yes: bool,
}

/// Recorded outcome of a council vote.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes: u32,
    pub no: u32,
    pub required: u32,
    pub available: u32,
    pub swing: Vec<SwingVote>,
}

impl VoteTally {
    pub fn total_cast(&self) -> u32 {
        self.yes + self.no
    }
}

/// A legislative item tracked across cycles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Initiative {
    #[serde(rename = "InitiativeID")]
    pub id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: InitiativeKind,
    pub status: InitiativeStatus,
    pub budget: String,
    /// "5-of-9" style.
    pub vote_requirement: String,
    pub vote_cycle: u32,
    pub projection: String,
    pub lead_faction: Option<Faction>,
    pub opposition_faction: Option<Faction>,
    pub swing_voter: String,
    #[serde(rename = "SwingVoter2")]
    pub swing_voter_2: String,
    #[serde(rename = "SwingVoter2Lean")]
    pub swing_voter_2_lean: String,
    pub outcome: String,
    pub consequences: String,
    pub notes: String,
    pub last_updated: u32,
    #[serde(skip)]
    pub tally: Option<VoteTally>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incapacity_matches_status_codes() {
        let mut seat = CouncilSeat {
            holder: "R. Vega".to_string(),
            ..CouncilSeat::default()
        };
        assert_eq!(seat.incapacity(), None);
        seat.status = "Hospitalized (stable)".to_string();
        assert_eq!(seat.incapacity(), Some("hospitalized"));
        seat.status = "On Leave".to_string();
        assert_eq!(seat.incapacity(), Some("on-leave"));
    }

    #[test]
    fn faction_aliases() {
        assert_eq!(Faction::try_from("OPP".to_string()), Ok(Faction::Progressive));
        assert_eq!(Faction::try_from("CRC".to_string()), Ok(Faction::Reform));
        assert_eq!(Faction::Reform.rival(), Some(Faction::Progressive));
        assert_eq!(Faction::Independent.rival(), None);
    }

    #[test]
    fn initiative_serializes_seventeen_columns() {
        let row = serde_json::to_value(Initiative::default()).unwrap();
        assert_eq!(row.as_object().unwrap().len(), 17);
        assert!(row.get("SwingVoter2Lean").is_some());
    }
}
