use crate::error::{Result, SegmError};
use crate::types::{
    DEFAULT_AVE_LEN, DEFAULT_CONCENTRATION, DEFAULT_MAX_LEN, DEFAULT_MIN_LEN, DEFAULT_NUM_CLASS,
    DEFAULT_TRANSITION_PSEUDO_COUNT,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HsmmConfig {
    pub num_class: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub ave_len: f64,
    pub concentration: f64,
    pub transition_pseudo_count: f64,
    pub seed: Option<u64>,
}

impl Default for HsmmConfig {
    fn default() -> Self {
        Self {
            num_class: DEFAULT_NUM_CLASS,
            min_len: DEFAULT_MIN_LEN,
            max_len: DEFAULT_MAX_LEN,
            ave_len: DEFAULT_AVE_LEN,
            concentration: DEFAULT_CONCENTRATION,
            transition_pseudo_count: DEFAULT_TRANSITION_PSEUDO_COUNT,
            seed: None,
        }
    }
}

impl HsmmConfig {
    pub fn new(num_class: usize) -> Self {
        Self {
            num_class,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_class == 0 {
            return Err(SegmError::InvalidConfig(
                "num_class must be greater than or equal to 1.".into(),
            ));
        }
        if self.min_len == 0 {
            return Err(SegmError::InvalidConfig(
                "min_len must be greater than or equal to 1.".into(),
            ));
        }
        if self.max_len < self.min_len {
            return Err(SegmError::InvalidConfig(format!(
                "max_len ({}) must be greater than or equal to min_len ({}).",
                self.max_len, self.min_len
            )));
        }
        // Durations in [min_len, max_len] tile every length >= min_len only
        // when consecutive multiples overlap.
        if self.max_len + 1 < 2 * self.min_len {
            return Err(SegmError::InvalidConfig(format!(
                "max_len ({}) must be at least 2 * min_len - 1 ({}) so every sentence can be segmented.",
                self.max_len,
                2 * self.min_len - 1
            )));
        }

        let positive = |name: &str, value: f64| -> Result<()> {
            if !value.is_finite() {
                return Err(SegmError::InvalidConfig(format!("{name} must be finite.")));
            }
            if value <= 0.0 {
                return Err(SegmError::InvalidConfig(format!(
                    "{name} must be greater than 0."
                )));
            }
            Ok(())
        };
        positive("ave_len", self.ave_len)?;
        positive("concentration", self.concentration)?;
        positive("transition_pseudo_count", self.transition_pseudo_count)?;

        Ok(())
    }

    pub(crate) fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}
