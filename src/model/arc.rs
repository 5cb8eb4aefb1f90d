use serde::{Deserialize, Serialize};

use super::calendar::Season;

/// Upper bound on arc tension.
pub const TENSION_MAX: f64 = 10.0;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ArcType {
    #[default]
    Crisis,
    PatternWave,
    Instability,
    HealthCrisis,
    Infrastructure,
    Community,
    CulturalMoment,
    SafetyConcern,
    BusinessDisruption,
    Rivalry,
    Strain,
    EducationWave,
    NightlifeSurge,
    Festival,
    Celebration,
    SportsFever,
    Parade,
    ArtsWalk,
    Heritage,
}

string_enum!(ArcType {
    Crisis => "crisis",
    PatternWave => "pattern-wave",
    Instability => "instability",
    HealthCrisis => "health-crisis" | "health",
    Infrastructure => "infrastructure",
    Community => "community",
    CulturalMoment => "cultural-moment" | "cultural",
    SafetyConcern => "safety-concern" | "safety",
    BusinessDisruption => "business-disruption" | "business",
    Rivalry => "rivalry",
    Strain => "strain",
    EducationWave => "education-wave" | "education",
    NightlifeSurge => "nightlife-surge" | "nightlife",
    Festival => "festival",
    Celebration => "celebration",
    SportsFever => "sports-fever",
    Parade => "parade",
    ArtsWalk => "arts-walk",
    Heritage => "heritage",
});

impl ArcType {
    pub fn domain(self) -> Domain {
        match self {
            ArcType::Crisis => Domain::Crisis,
            ArcType::HealthCrisis => Domain::Health,
            ArcType::BusinessDisruption => Domain::Economic,
            ArcType::Strain => Domain::Demographic,
            ArcType::SafetyConcern | ArcType::PatternWave | ArcType::Instability => Domain::Safety,
            ArcType::Infrastructure => Domain::Infrastructure,
            ArcType::Community => Domain::Civic,
            ArcType::CulturalMoment
            | ArcType::Festival
            | ArcType::Celebration
            | ArcType::Parade
            | ArcType::ArtsWalk
            | ArcType::Heritage => Domain::Cultural,
            ArcType::SportsFever | ArcType::Rivalry => Domain::Sports,
            ArcType::EducationWave => Domain::Education,
            ArcType::NightlifeSurge => Domain::Nightlife,
        }
    }

    /// Celebratory arcs that do not lose tension passively.
    pub fn is_decay_exempt(self) -> bool {
        matches!(
            self,
            ArcType::Festival | ArcType::Celebration | ArcType::SportsFever
        )
    }

    /// Arcs about crowds, crime, and public order.
    pub fn is_safety_type(self) -> bool {
        matches!(
            self,
            ArcType::SafetyConcern | ArcType::PatternWave | ArcType::Crisis | ArcType::Instability
        )
    }

    pub fn is_celebratory(self) -> bool {
        self.domain() == Domain::Cultural || self.domain() == Domain::Sports
    }
}

/// Coarse category linking an arc to the metrics that can resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Domain {
    Health,
    Economic,
    Demographic,
    Safety,
    Infrastructure,
    Crisis,
    Civic,
    Cultural,
    Sports,
    Education,
    Nightlife,
}

string_enum!(Domain {
    Health => "health",
    Economic => "economic",
    Demographic => "demographic",
    Safety => "safety",
    Infrastructure => "infrastructure",
    Crisis => "crisis",
    Civic => "civic",
    Cultural => "cultural",
    Sports => "sports",
    Education => "education",
    Nightlife => "nightlife",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ArcPhase {
    #[default]
    Early,
    Rising,
    Peak,
    Falling,
    Resolved,
}

string_enum!(ArcPhase {
    Early => "early" | "emerging",
    Rising => "rising",
    Peak => "peak",
    Falling => "falling" | "decline",
    Resolved => "resolved",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ResolutionType {
    Condition,
    Calendar,
    Intervention,
    Timeout,
    Natural,
}

string_enum!(ResolutionType {
    Condition => "resolved-condition" | "condition",
    Calendar => "resolved-calendar" | "calendar",
    Intervention => "resolved-intervention" | "intervention",
    Timeout => "resolved-timeout" | "timeout",
    Natural => "resolved-natural" | "natural",
});

// ---------------------------------------------------------------------------
// Arc
// ---------------------------------------------------------------------------

/// A multi-cycle narrative situation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StoryArc {
    #[serde(rename = "ArcID")]
    pub id: String,
    pub arc_type: ArcType,
    pub phase: ArcPhase,
    pub tension: f64,
    /// `None` means city-wide.
    pub district: Option<String>,
    pub domain: Option<Domain>,
    pub age: u32,
    pub created_cycle: u32,
    pub resolved_cycle: Option<u32>,
    pub resolution: Option<ResolutionType>,
    pub resolution_reason: String,
    /// Holiday or special day that spawned the arc.
    pub calendar_trigger: Option<String>,
    pub season_created: Option<Season>,
    /// Set by a `Hold` intervention; the arc is frozen until released.
    pub held: bool,
    pub last_updated: u32,
}

impl StoryArc {
    pub fn is_resolved(&self) -> bool {
        self.phase == ArcPhase::Resolved
    }

    pub fn effective_domain(&self) -> Domain {
        self.domain.unwrap_or_else(|| self.arc_type.domain())
    }

    pub fn set_tension(&mut self, value: f64) {
        self.tension = value.clamp(0.0, TENSION_MAX);
    }

    /// Terminal transition. A resolved arc is never reopened.
    pub fn resolve(&mut self, cycle: u32, kind: ResolutionType, reason: impl Into<String>) {
        if self.is_resolved() {
            return;
        }
        self.phase = ArcPhase::Resolved;
        self.resolved_cycle = Some(cycle);
        self.resolution = Some(kind);
        self.resolution_reason = reason.into();
        self.last_updated = cycle;
    }

    pub fn shares_district(&self, other: &StoryArc) -> bool {
        match (&self.district, &other.district) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Interventions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum InterventionCommand {
    /// Freeze the arc until released.
    Hold,
    Release,
    ForceResolve { reason: String },
    /// One-shot tension bump.
    Escalate,
}

/// An operator command queued against a single arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcIntervention {
    pub arc_id: String,
    pub command: InterventionCommand,
}

impl ArcIntervention {
    pub fn new(arc_id: &str, command: InterventionCommand) -> Self {
        Self {
            arc_id: arc_id.to_string(),
            command,
        }
    }
}

/// Audit record of an intervention the arc engine applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedIntervention {
    pub cycle: u32,
    pub arc_id: String,
    pub command: InterventionCommand,
    pub applied: bool,
}
