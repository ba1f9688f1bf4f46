use crate::config::HsmmConfig;
use crate::prior::CharacterPrior;
use crate::types::{CharId, ClassId};
use crate::word_counts::WordCounts;

pub(crate) fn ln_factorial(k: usize) -> f64 {
    (2..=k).map(|i| (i as f64).ln()).sum()
}

pub(crate) fn poisson_log_pmf(k: usize, lambda: f64) -> f64 {
    k as f64 * lambda.ln() - lambda - ln_factorial(k)
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct EmissionModel {
    concentration: f64,
    ave_len: f64,
}

impl EmissionModel {
    pub(crate) fn new(config: &HsmmConfig) -> Self {
        Self {
            concentration: config.concentration,
            ave_len: config.ave_len,
        }
    }

    pub(crate) fn log_prior(&self, prior: &CharacterPrior, word: &[CharId]) -> f64 {
        let log_chars = word.iter().map(|ch| prior.log_prob(*ch)).sum::<f64>();
        log_chars + poisson_log_pmf(word.len(), self.ave_len)
    }

    pub(crate) fn score_with_prior(
        &self,
        words: &WordCounts,
        class: ClassId,
        word: &[CharId],
        log_prior: f64,
    ) -> f64 {
        let count = words.count(class, word) as f64;
        let total = words.num_words(class) as f64;
        (count + self.concentration * log_prior.exp()) / (total + self.concentration)
    }

    pub(crate) fn score(
        &self,
        words: &WordCounts,
        prior: &CharacterPrior,
        class: ClassId,
        word: &[CharId],
    ) -> f64 {
        let log_prior = self.log_prior(prior, word);
        self.score_with_prior(words, class, word, log_prior)
    }
}
