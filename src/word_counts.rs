use crate::types::{CharId, ClassId, Word};
use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Default)]
pub(crate) struct WordCounts {
    pub(crate) counts: Vec<FxHashMap<Word, i64>>,
    pub(crate) num_words: Vec<i64>,
    pub(crate) num_vocab: Vec<usize>,
}

impl WordCounts {
    pub(crate) fn new(num_class: usize) -> Self {
        Self {
            counts: vec![FxHashMap::default(); num_class],
            num_words: vec![0; num_class],
            num_vocab: vec![0; num_class],
        }
    }

    pub(crate) fn num_class(&self) -> usize {
        self.counts.len()
    }

    pub(crate) fn count(&self, class: ClassId, word: &[CharId]) -> i64 {
        self.counts[class].get(word).copied().unwrap_or(0)
    }

    pub(crate) fn num_words(&self, class: ClassId) -> i64 {
        self.num_words[class]
    }

    pub(crate) fn add(&mut self, class: ClassId, word: &[CharId]) {
        *self.counts[class]
            .entry(Word::from_slice(word))
            .or_insert(0) += 1;
        self.num_words[class] += 1;
    }

    pub(crate) fn remove(&mut self, class: ClassId, word: &[CharId]) {
        let count = self.counts[class]
            .get_mut(word)
            .expect("retracted word missing from its class count table");
        assert!(*count > 0, "word count underflow in class {class}");
        assert!(
            self.num_words[class] > 0,
            "total word count underflow in class {class}"
        );
        *count -= 1;
        self.num_words[class] -= 1;
    }

    pub(crate) fn prune(&mut self) {
        for (class, counts) in self.counts.iter_mut().enumerate() {
            counts.retain(|_, count| *count > 0);
            self.num_vocab[class] = counts.len();
        }
    }

    pub(crate) fn total_vocab(&self) -> usize {
        self.num_vocab.iter().sum()
    }

    pub(crate) fn is_consistent(&self, class: ClassId) -> bool {
        let counts = &self.counts[class];
        counts.values().all(|count| *count >= 0)
            && counts.values().sum::<i64>() == self.num_words[class]
    }
}
