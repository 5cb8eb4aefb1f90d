use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::SportsPhase;

/// Runtime configuration for the cycle engines. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the deterministic generator.
    pub seed: Option<u64>,
    /// Resume token captured at the end of a previous cycle. Wins over `seed`.
    pub rng_state: Option<String>,
    pub feedback: FeedbackConfig,
    /// Overrides the calendar's sports phase.
    pub manual_sports_phase: Option<SportsPhase>,
    /// Multiplier on the sports crowd term, 0..=3.
    pub manual_crowd_intensity: Option<f64>,
    /// District that receives an extra drift bias (e.g. a stadium neighborhood).
    pub manual_district_bias: Option<String>,
    pub district_bias_amount: f64,
    pub arcs: ArcTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            rng_state: None,
            feedback: FeedbackConfig::default(),
            manual_sports_phase: None,
            manual_crowd_intensity: None,
            manual_district_bias: None,
            district_bias_amount: 1.0,
            arcs: ArcTuning::default(),
        }
    }
}

impl SimConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fb = &self.feedback;
        non_negative("feedback.scale", fb.scale)?;
        non_negative("feedback.district_scale", fb.district_scale)?;
        positive("feedback.max_delta", fb.max_delta)?;
        positive("feedback.district_max_delta", fb.district_max_delta)?;
        if let Some(intensity) = self.manual_crowd_intensity {
            if !(0.0..=3.0).contains(&intensity) {
                return Err(ConfigError::Invalid {
                    field: "manual_crowd_intensity",
                    reason: format!("{intensity} is outside 0..=3"),
                });
            }
        }
        self.arcs.validate()
    }

    /// Crowd intensity multiplier applied to the sports drift term.
    pub fn crowd_intensity(&self) -> f64 {
        self.manual_crowd_intensity.unwrap_or(1.0).clamp(0.0, 3.0)
    }

    pub fn sports_phase(&self, calendar_phase: SportsPhase) -> SportsPhase {
        self.manual_sports_phase.unwrap_or(calendar_phase)
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{v} must be a non-negative number"),
        })
    }
}

fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{v} must be greater than zero"),
        })
    }
}

/// Bidirectional drift→economy feedback.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub city_enabled: bool,
    pub district_enabled: bool,
    /// Mood points per point of city drift.
    pub scale: f64,
    pub max_delta: f64,
    /// Mood points per point of district drift.
    pub district_scale: f64,
    pub district_max_delta: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            city_enabled: true,
            district_enabled: true,
            scale: 0.05,
            max_delta: 2.0,
            district_scale: 0.5,
            district_max_delta: 1.5,
        }
    }
}

/// Hand-tuned arc lifecycle constants, kept overridable for game-design review.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArcTuning {
    pub max_active: usize,
    pub initial_tension_min: f64,
    pub initial_tension_max: f64,
    pub passive_decay: f64,
    pub fatigue_start_age: u32,
    pub fatigue_rate: f64,
    pub interference_step: f64,
    pub escalate_amount: f64,
    pub timeout_age: u32,
    pub timeout_tension: f64,
    pub phases: PhaseThresholds,
}

impl Default for ArcTuning {
    fn default() -> Self {
        Self {
            max_active: 10,
            initial_tension_min: 2.0,
            initial_tension_max: 4.0,
            passive_decay: 0.3,
            fatigue_start_age: 10,
            fatigue_rate: 0.2,
            interference_step: 0.5,
            escalate_amount: 2.0,
            timeout_age: 12,
            timeout_tension: 3.0,
            phases: PhaseThresholds::default(),
        }
    }
}

impl ArcTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_tension_min >= self.initial_tension_max {
            return Err(ConfigError::Invalid {
                field: "arcs.initial_tension_min",
                reason: "must be below arcs.initial_tension_max".to_string(),
            });
        }
        if self.initial_tension_min < 0.0 || self.initial_tension_max > 10.0 {
            return Err(ConfigError::Invalid {
                field: "arcs.initial_tension_max",
                reason: "initial tension range must lie within 0..=10".to_string(),
            });
        }
        non_negative("arcs.passive_decay", self.passive_decay)?;
        non_negative("arcs.fatigue_rate", self.fatigue_rate)?;
        non_negative("arcs.interference_step", self.interference_step)
    }
}

/// Tension/age bands for the arc phase machine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    pub rising_tension: f64,
    pub rising_age: u32,
    pub peak_tension: f64,
    pub peak_age: u32,
    pub rising_collapse_tension: f64,
    pub peak_exit_age: u32,
    pub peak_exit_tension: f64,
    pub resolve_age: u32,
    pub resolve_tension: f64,
    pub lenient_tension: f64,
    pub lenient_age: u32,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            rising_tension: 3.0,
            rising_age: 2,
            peak_tension: 6.0,
            peak_age: 4,
            rising_collapse_tension: 3.0,
            peak_exit_age: 7,
            peak_exit_tension: 5.0,
            resolve_age: 10,
            resolve_tension: 2.0,
            lenient_tension: 1.0,
            lenient_age: 5,
        }
    }
}
