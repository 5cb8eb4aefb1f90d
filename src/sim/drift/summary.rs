use serde::Serialize;

use crate::model::DriftState;

/// Districts moving by more than this are listed as in/outflow highlights.
const HIGHLIGHT_THRESHOLD: f64 = 1.0;
const TOP_FACTORS: usize = 3;

/// Human-readable recap of one cycle's drift.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DriftSummary {
    pub headline: String,
    pub top_factors: Vec<String>,
    /// Strongest first.
    pub inflow: Vec<(String, f64)>,
    pub outflow: Vec<(String, f64)>,
}

impl DriftSummary {
    pub fn from_state(state: &DriftState) -> Self {
        let label = match state.city {
            d if d >= 20.0 => "Strong inflow",
            d if d >= 5.0 => "Modest inflow",
            d if d <= -20.0 => "Strong outflow",
            d if d <= -5.0 => "Modest outflow",
            _ => "Population steady",
        };

        let mut inflow: Vec<(String, f64)> = state
            .districts
            .iter()
            .filter(|(_, v)| **v > HIGHLIGHT_THRESHOLD)
            .map(|(d, v)| (d.clone(), *v))
            .collect();
        inflow.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut outflow: Vec<(String, f64)> = state
            .districts
            .iter()
            .filter(|(_, v)| **v < -HIGHLIGHT_THRESHOLD)
            .map(|(d, v)| (d.clone(), *v))
            .collect();
        outflow.sort_by(|a, b| a.1.total_cmp(&b.1));

        // Stable sort: equal weights keep the order they were applied in.
        let weight = |tag: &String| state.factor_weights.get(tag).map_or(0.0, |w| w.abs());
        let mut ranked: Vec<&String> = state.factors.iter().collect();
        ranked.sort_by(|a, b| weight(*b).total_cmp(&weight(*a)));

        Self {
            headline: format!("{label} ({:+.1})", state.city),
            top_factors: ranked.into_iter().take(TOP_FACTORS).cloned().collect(),
            inflow,
            outflow,
        }
    }
}
