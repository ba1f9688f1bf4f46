use crate::config::HsmmConfig;
use crate::error::{Result, SegmError};
use crate::forward::{forward_filter, Lattice};
use crate::learner::Segmenter;
use crate::types::{CharId, ClassId};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelSnapshot {
    pub config: HsmmConfig,
    pub word_counts: Vec<Vec<(String, i64)>>,
    pub segmentations: Vec<Vec<String>>,
    pub class_paths: Vec<Vec<ClassId>>,
    pub transitions: Vec<Vec<f64>>,
    pub begin: Vec<f64>,
    pub end: Vec<f64>,
    pub num_vocab: Vec<usize>,
}

impl Segmenter {
    fn validate_class(&self, class: ClassId) -> Result<()> {
        let num_class = self.config.num_class;
        if class >= num_class {
            return Err(SegmError::InvalidClass { class, num_class });
        }
        Ok(())
    }

    pub fn word_counts(&self, class: ClassId) -> Result<Vec<(String, i64)>> {
        self.validate_class(class)?;
        let mut table = self.corpus.words.counts[class]
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(word, count)| (self.corpus.interner.ids_to_string(word), *count))
            .collect::<Vec<_>>();
        table.sort_unstable();
        Ok(table)
    }

    pub fn segmentations(&self) -> Vec<Vec<String>> {
        (0..self.corpus.corpus_length())
            .map(|line_ix| {
                self.corpus.segmentations[line_ix]
                    .iter()
                    .map(|segment| {
                        self.corpus
                            .interner
                            .ids_to_string(self.corpus.word(line_ix, *segment))
                    })
                    .collect()
            })
            .collect()
    }

    pub fn class_paths(&self) -> Vec<Vec<ClassId>> {
        (0..self.corpus.corpus_length())
            .map(|line_ix| {
                self.corpus
                    .class_path(line_ix)
                    .map(|path| path.to_vec())
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn class_sequences(&self) -> Vec<Vec<ClassId>> {
        (0..self.corpus.corpus_length())
            .map(|line_ix| {
                let mut sequence = Vec::with_capacity(self.corpus.sentences[line_ix].len());
                for segment in &self.corpus.segmentations[line_ix] {
                    if let Some(class) = self.corpus.class_of(line_ix, *segment) {
                        sequence.extend(std::iter::repeat(class).take(segment.len()));
                    }
                }
                sequence
            })
            .collect()
    }

    pub fn character_prior(&self) -> Vec<(char, f64)> {
        let interner = &self.corpus.interner;
        (0..interner.alphabet_size() as CharId)
            .map(|id| (interner.char_for(id), self.corpus.prior.prob(id)))
            .collect()
    }

    pub fn emission_score(&self, class: ClassId, word: &str) -> Result<f64> {
        self.validate_class(class)?;
        let Some(ids) = word
            .chars()
            .map(|ch| self.corpus.interner.maybe_id_for(ch))
            .collect::<Option<Vec<_>>>()
        else {
            return Ok(0.0);
        };
        Ok(self
            .emission
            .score(&self.corpus.words, &self.corpus.prior, class, &ids))
    }

    pub fn lattice(&self, line_ix: usize) -> Result<Lattice> {
        let len = self.corpus.corpus_length();
        if line_ix >= len {
            return Err(SegmError::InvalidSentence {
                index: line_ix,
                len,
            });
        }
        forward_filter(
            &self.corpus.sentences[line_ix],
            &self.corpus,
            &self.emission,
            &self.transitions,
            &self.config,
        )
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        let word_counts = (0..self.config.num_class)
            .map(|class| self.word_counts(class).unwrap_or_default())
            .collect();

        ModelSnapshot {
            config: self.config.clone(),
            word_counts,
            segmentations: self.segmentations(),
            class_paths: self.class_paths(),
            transitions: self.transitions.matrix(),
            begin: self.transitions.begin_probs().to_vec(),
            end: self.transitions.end_probs().to_vec(),
            num_vocab: self.corpus.words.num_vocab.clone(),
        }
    }
}
