use tracing::warn;

// --- Constants ---

/// Clamp applied to every named swing voter's yes-probability.
pub const SWING_MIN: f64 = 0.15;
pub const SWING_MAX: f64 = 0.85;

/// Sentiment weight on the primary swing voter.
const PRIMARY_SENTIMENT_WEIGHT: f64 = 0.10;
/// Sentiment weight on the secondary swing voter.
const SECONDARY_SENTIMENT_WEIGHT: f64 = 0.05;
/// Penalty on the primary swing voter when a supermajority is required.
const SUPERMAJORITY_PENALTY: f64 = 0.05;

/// Sentiment weight on unnamed independents.
const INDEPENDENT_SENTIMENT_WEIGHT: f64 = 0.15;

const GRANT_BAND: f64 = 0.20;
const GRANT_SENTIMENT_WEIGHT: f64 = 0.05;
pub const GRANT_MIN: f64 = 0.25;
pub const GRANT_MAX: f64 = 0.75;

/// Projection keyword tiers, checked in order. Fail tiers come first so
/// "likely to fail" is never read as "likely".
const PROJECTION_TIERS: &[(&[&str], f64)] = &[
    (&["unlikely", "likely fail", "likely to fail", "expected to fail"], 0.30),
    (&["lean fail", "leans fail", "leaning fail"], 0.40),
    (&["likely pass", "likely to pass", "expected to pass"], 0.70),
    (&["lean pass", "leans pass", "leaning pass"], 0.60),
    (&["needs swing", "need swing"], 0.45),
    (&["toss up", "tossup", "uncertain"], 0.50),
];

/// Stated-lean tiers for the secondary swing voter.
const LEAN_TIERS: &[(&[&str], f64)] = &[
    (&["strong no", "likely no", "firm no"], 0.25),
    (&["lean no", "leans no", "leaning no"], 0.35),
    (&["strong yes", "likely yes", "firm yes"], 0.75),
    (&["lean yes", "leans yes", "leaning yes"], 0.65),
    (&["undecided", "neutral", "uncertain"], 0.50),
];

const NEUTRAL: f64 = 0.50;

/// An "N-of-M" vote requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRequirement {
    pub required: u32,
    pub of: u32,
}

impl Default for VoteRequirement {
    fn default() -> Self {
        Self { required: 5, of: 9 }
    }
}

impl VoteRequirement {
    /// Accepts "5-of-9", "5 of 9", "6/9", "majority" and "supermajority".
    pub fn parse(text: &str) -> Option<Self> {
        let text = normalize(text);
        match text.as_str() {
            "majority" | "simple majority" => return Some(Self::default()),
            "supermajority" | "two thirds" => return Some(Self { required: 6, of: 9 }),
            _ => {}
        }
        let (n, m) = text
            .split_once(" of ")
            .or_else(|| text.split_once('/'))?;
        let required = n.trim().parse().ok()?;
        let of = m.trim().parse().ok()?;
        if required == 0 || required > of {
            return None;
        }
        Some(Self { required, of })
    }

    /// Parse, falling back to 5-of-9 with a warning.
    pub fn parse_or_default(initiative_id: &str, text: &str) -> Self {
        Self::parse(text).unwrap_or_else(|| {
            warn!(
                initiative = initiative_id,
                requirement = text,
                "unparseable vote requirement, assuming 5-of-9"
            );
            Self::default()
        })
    }

    /// Two-thirds or more of the seats.
    pub fn is_supermajority(&self) -> bool {
        3 * self.required >= 2 * self.of
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .to_ascii_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn tier(text: &str, tiers: &[(&[&str], f64)]) -> Option<f64> {
    let text = normalize(text);
    tiers
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| text.contains(k)))
        .map(|(_, p)| *p)
}

/// Base probability read from projection text.
pub fn projection_base(projection: &str) -> f64 {
    tier(projection, PROJECTION_TIERS).unwrap_or(NEUTRAL)
}

/// Base probability read from a stated lean.
pub fn lean_base(lean: &str) -> f64 {
    if let Some(p) = tier(lean, LEAN_TIERS) {
        return p;
    }
    match normalize(lean).as_str() {
        "yes" => 0.75,
        "no" => 0.25,
        _ => NEUTRAL,
    }
}

pub fn primary_swing_probability(projection: &str, sentiment: f64, supermajority: bool) -> f64 {
    let mut p = projection_base(projection) + sentiment * PRIMARY_SENTIMENT_WEIGHT;
    if supermajority {
        p -= SUPERMAJORITY_PENALTY;
    }
    p.clamp(SWING_MIN, SWING_MAX)
}

pub fn secondary_swing_probability(lean: &str, sentiment: f64) -> f64 {
    (lean_base(lean) + sentiment * SECONDARY_SENTIMENT_WEIGHT).clamp(SWING_MIN, SWING_MAX)
}

pub fn independent_probability(sentiment: f64) -> f64 {
    (NEUTRAL + sentiment * INDEPENDENT_SENTIMENT_WEIGHT).clamp(0.0, 1.0)
}

/// Single-draw odds for grants and external decisions.
pub fn grant_probability(projection: &str, sentiment: f64) -> f64 {
    let text = normalize(projection);
    let base = if ["unlikely", "long shot", "weak", "deny"]
        .iter()
        .any(|k| text.contains(k))
    {
        NEUTRAL - GRANT_BAND
    } else if ["likely", "strong", "favorable", "award"]
        .iter()
        .any(|k| text.contains(k))
    {
        NEUTRAL + GRANT_BAND
    } else {
        NEUTRAL
    };
    (base + sentiment * GRANT_SENTIMENT_WEIGHT).clamp(GRANT_MIN, GRANT_MAX)
}
