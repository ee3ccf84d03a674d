//! Single random stream shared by every generation stage.
//!
//! Seeded runs use a 32-bit linear congruential generator so the whole
//! pipeline is a pure function of the seed and the fixed order in which the
//! stages draw. Unseeded runs draw from ChaCha8 keyed by runtime entropy.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const LCG_MODULUS: f64 = 4_294_967_296.0;

#[derive(Clone)]
enum Source {
    Lcg { state: u32 },
    Entropy(Box<ChaCha8Rng>),
}

#[derive(Clone)]
pub struct LevelRng {
    source: Source,
}

impl LevelRng {
    pub fn seeded(seed: u32) -> Self {
        Self { source: Source::Lcg { state: seed } }
    }

    pub fn from_entropy() -> Self {
        Self { source: Source::Entropy(Box::new(ChaCha8Rng::seed_from_u64(runtime_seed()))) }
    }

    pub fn from_optional_seed(seed: Option<u32>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        match &mut self.source {
            Source::Lcg { state } => {
                *state = state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
                f64::from(*state) / LCG_MODULUS
            }
            Source::Entropy(rng) => (rng.next_u64() >> 11) as f64 / (1_u64 << 53) as f64,
        }
    }

    pub fn float(&mut self, min: f32, max: f32) -> f32 {
        let unit = self.next_f64();
        (f64::from(min) + unit * (f64::from(max) - f64::from(min))) as f32
    }

    /// Inclusive on both ends. An inverted range collapses to `min`.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        let unit = self.next_f64();
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        min + ((unit * span).floor() as i64).min(max - min)
    }

    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.int(0, len as i64 - 1) as usize
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.index(items.len());
        items.get(index)
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Fisher–Yates, walking from the back.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.int(0, i as i64) as usize;
            items.swap(i, j);
        }
    }

    /// Cumulative-sum selection; returns an index into `weights`.
    pub fn weighted_pick(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().filter(|weight| **weight > 0.0).sum();
        let roll = self.next_f64() * total;
        if total <= 0.0 {
            return 0;
        }
        let mut cumulative = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            if roll < cumulative {
                return index;
            }
        }
        weights.iter().rposition(|weight| *weight > 0.0).unwrap_or(0)
    }
}

static RUNTIME_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(process::id());
    let counter = RUNTIME_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
