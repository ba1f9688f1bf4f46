use crate::types::CharId;

#[derive(Clone, Debug, Default)]
pub(crate) struct CharacterPrior {
    probs: Vec<f64>,
    log_probs: Vec<f64>,
}

impl CharacterPrior {
    pub(crate) fn from_corpus(sentences: &[Vec<CharId>], alphabet_size: usize) -> Self {
        let mut counts = vec![0u64; alphabet_size];
        let mut total = 0u64;
        for sentence in sentences {
            for ch in sentence {
                counts[*ch as usize] += 1;
                total += 1;
            }
        }

        let probs = counts
            .iter()
            .map(|count| {
                if total == 0 {
                    0.0
                } else {
                    *count as f64 / total as f64
                }
            })
            .collect::<Vec<_>>();
        let log_probs = probs.iter().map(|p| p.ln()).collect();

        Self { probs, log_probs }
    }

    pub(crate) fn prob(&self, ch: CharId) -> f64 {
        self.probs[ch as usize]
    }

    pub(crate) fn log_prob(&self, ch: CharId) -> f64 {
        self.log_probs[ch as usize]
    }

    pub(crate) fn len(&self) -> usize {
        self.probs.len()
    }
}
