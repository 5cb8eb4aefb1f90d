use std::fmt::Write as _;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::config::SimConfig;
use crate::error::ConfigError;

const TOKEN_PREFIX: &str = "chacha8";

/// Exact position of a seeded generator, restorable at the start of the next cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RngState {
    pub seed: [u8; 32],
    pub stream: u64,
    pub word_pos: u128,
}

impl RngState {
    pub fn capture(rng: &ChaCha8Rng) -> Self {
        Self {
            seed: rng.get_seed(),
            stream: rng.get_stream(),
            word_pos: rng.get_word_pos(),
        }
    }

    pub fn restore(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        rng.set_stream(self.stream);
        rng.set_word_pos(self.word_pos);
        rng
    }

    /// Compact form: `chacha8:<seed hex>:<stream hex>:<word pos hex>`.
    pub fn to_token(&self) -> String {
        let mut seed = String::with_capacity(64);
        for byte in self.seed {
            let _ = write!(seed, "{byte:02x}");
        }
        format!("{TOKEN_PREFIX}:{seed}:{:x}:{:x}", self.stream, self.word_pos)
    }

    pub fn from_token(token: &str) -> Result<Self, ConfigError> {
        let bad = || ConfigError::RngToken(token.to_string());
        let mut parts = token.trim().split(':');
        if parts.next() != Some(TOKEN_PREFIX) {
            return Err(bad());
        }
        let seed_hex = parts.next().ok_or_else(bad)?;
        let stream = parts.next().ok_or_else(bad)?;
        let word_pos = parts.next().ok_or_else(bad)?;
        if parts.next().is_some() || seed_hex.len() != 64 || !seed_hex.is_ascii() {
            return Err(bad());
        }

        let mut seed = [0u8; 32];
        for (i, byte) in seed.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&seed_hex[i * 2..i * 2 + 2], 16).map_err(|_| bad())?;
        }
        Ok(Self {
            seed,
            stream: u64::from_str_radix(stream, 16).map_err(|_| bad())?,
            word_pos: u128::from_str_radix(word_pos, 16).map_err(|_| bad())?,
        })
    }
}

/// The generator every engine draws from, chosen once when a runner is built.
pub enum RandomSource {
    /// Deterministic; state is captured after every cycle.
    Seeded(ChaCha8Rng),
    /// Supplied by the caller. Not capturable.
    Injected(Box<dyn RngCore>),
    /// Non-deterministic last resort.
    Entropy(ChaCha8Rng),
}

impl RandomSource {
    /// Resolve in order: resume token, seed, injected generator, entropy.
    pub fn resolve(config: &SimConfig, injected: Option<Box<dyn RngCore>>) -> Self {
        if let Some(token) = &config.rng_state {
            match RngState::from_token(token) {
                Ok(state) => return RandomSource::Seeded(state.restore()),
                Err(err) => warn!(%err, "ignoring rng resume state"),
            }
        }
        if let Some(seed) = config.seed {
            return RandomSource::Seeded(ChaCha8Rng::seed_from_u64(seed));
        }
        if let Some(rng) = injected {
            return RandomSource::Injected(rng);
        }
        RandomSource::Entropy(ChaCha8Rng::seed_from_u64(rand::random()))
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, RandomSource::Seeded(_))
    }

    pub fn snapshot(&self) -> Option<RngState> {
        match self {
            RandomSource::Seeded(rng) => Some(RngState::capture(rng)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            RandomSource::Seeded(_) => "Seeded",
            RandomSource::Injected(_) => "Injected",
            RandomSource::Entropy(_) => "Entropy",
        };
        f.debug_tuple("RandomSource").field(&kind).finish()
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        match self {
            RandomSource::Seeded(rng) | RandomSource::Entropy(rng) => rng.next_u32(),
            RandomSource::Injected(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            RandomSource::Seeded(rng) | RandomSource::Entropy(rng) => rng.next_u64(),
            RandomSource::Injected(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        match self {
            RandomSource::Seeded(rng) | RandomSource::Entropy(rng) => rng.fill_bytes(dst),
            RandomSource::Injected(rng) => rng.fill_bytes(dst),
        }
    }
}
