use serde::{Deserialize, Serialize};

/// The single-row city population record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PopulationRecord {
    pub total_population: u64,
    /// Share of residents currently ill, 0..1.
    pub illness_rate: f64,
    /// Written by the economy engine each cycle.
    pub employment_rate: f64,
    /// Net population change reported for the cycle (raw, unnormalized).
    pub migration: i64,
    /// Economy label maintained outside the core ("booming", "stable", "recession", ...).
    pub economy: String,
}

impl Default for PopulationRecord {
    fn default() -> Self {
        Self {
            total_population: 400_000,
            illness_rate: 0.04,
            employment_rate: 0.89,
            migration: 0,
            economy: "stable".to_string(),
        }
    }
}

/// Coarse tier of the external economy label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EconomyLabelTier {
    Booming,
    Growing,
    Stable,
    Weak,
    Recession,
}

impl PopulationRecord {
    pub fn economy_tier(&self) -> EconomyLabelTier {
        let label = self.economy.to_ascii_lowercase();
        if label.contains("boom") || label.contains("thriv") {
            EconomyLabelTier::Booming
        } else if label.contains("grow") || label.contains("strong") {
            EconomyLabelTier::Growing
        } else if label.contains("recess")
            || label.contains("depress")
            || label.contains("collapse")
        {
            EconomyLabelTier::Recession
        } else if label.contains("weak") || label.contains("slow") || label.contains("struggl") {
            EconomyLabelTier::Weak
        } else {
            EconomyLabelTier::Stable
        }
    }
}
