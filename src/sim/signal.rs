use serde::{Deserialize, Serialize};

use crate::model::{ArcPhase, ArcType, InitiativeStatus, ResolutionType, RippleTrigger};

/// A signal emitted by one engine during a cycle.
///
/// Signals are collected for the caller (downstream narrative tooling); no
/// engine reacts to another engine's signals inside the same cycle. Engines
/// communicate only through values written to the world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// The cycle in which the signal was emitted.
    pub cycle: u32,
    /// What happened.
    pub kind: SignalKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalKind {
    /// An initiative reached its scheduled cycle and was decided, delayed, or completed.
    InitiativeResolved {
        initiative_id: String,
        name: String,
        status: InitiativeStatus,
        yes: u32,
        no: u32,
    },

    /// City sentiment was nudged by a core engine.
    SentimentShifted { source: String, delta: f64 },

    /// A new economic ripple entered the active set.
    RippleCreated {
        ripple_id: String,
        trigger: RippleTrigger,
        impact: f64,
        primary_district: Option<String>,
    },

    /// A ripple ran its full duration and was dropped.
    RippleExpired {
        ripple_id: String,
        trigger: RippleTrigger,
    },

    /// A new arc was created.
    ArcCreated {
        arc_id: String,
        arc_type: ArcType,
        district: Option<String>,
        tension: f64,
    },

    /// An existing arc was intensified instead of duplicated.
    ArcIntensified { arc_id: String, tension: f64 },

    /// An arc moved to a new non-terminal phase.
    ArcPhaseChanged {
        arc_id: String,
        from: ArcPhase,
        to: ArcPhase,
    },

    /// An arc resolved; carries the narrative resolution seed.
    ArcResolved(ResolutionSeed),
}

/// Input for downstream narrative generation when an arc ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSeed {
    pub arc_id: String,
    pub arc_type: ArcType,
    pub district: Option<String>,
    pub resolution: ResolutionType,
    pub reason: String,
    pub headline: String,
}
