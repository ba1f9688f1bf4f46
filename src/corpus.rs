use crate::config::HsmmConfig;
use crate::error::{Result, SegmError};
use crate::interner::CharInterner;
use crate::prior::CharacterPrior;
use crate::types::{CharId, ClassId, Segment, SegmentKey, Segmentation};
use crate::word_counts::WordCounts;
use rand::Rng;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{info, warn};

pub(crate) type ClassAssignment = FxHashMap<SegmentKey, ClassId>;
pub(crate) type ClassPath = SmallVec<[ClassId; 8]>;

#[derive(Clone, Debug)]
pub(crate) struct CorpusState {
    pub(crate) interner: CharInterner,
    pub(crate) sentences: Vec<Vec<CharId>>,
    pub(crate) segmentations: Vec<Segmentation>,
    pub(crate) assignment: ClassAssignment,
    pub(crate) words: WordCounts,
    pub(crate) prior: CharacterPrior,
}

pub(crate) fn random_segmentation<R: Rng + ?Sized>(
    len: usize,
    min_len: usize,
    max_len: usize,
    rng: &mut R,
) -> Segmentation {
    let mut segmentation = Segmentation::new();
    let mut start = 0usize;
    while start < len {
        let mut length = rng.gen_range(min_len..=max_len);
        if start + length >= len {
            length = len - start;
        }
        segmentation.push(Segment {
            start,
            end: start + length,
        });
        start += length;
    }
    segmentation
}

impl CorpusState {
    pub(crate) fn initialize<R: Rng + ?Sized>(
        sentences: &[String],
        config: &HsmmConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let kept = sentences
            .iter()
            .filter(|sentence| !sentence.is_empty())
            .cloned()
            .collect::<Vec<_>>();
        if kept.len() < sentences.len() {
            warn!(
                skipped = sentences.len() - kept.len(),
                "skipped empty sentences while initializing corpus"
            );
        }
        if kept.is_empty() {
            return Err(SegmError::EmptyCorpus);
        }

        let (interner, corpus_ids) = CharInterner::from_sentences(&kept)?;
        let prior = CharacterPrior::from_corpus(&corpus_ids, interner.alphabet_size());

        let mut state = Self {
            interner,
            sentences: corpus_ids,
            segmentations: Vec::with_capacity(kept.len()),
            assignment: ClassAssignment::default(),
            words: WordCounts::new(config.num_class),
            prior,
        };

        for line_ix in 0..state.sentences.len() {
            let len = state.sentences[line_ix].len();
            let segmentation = random_segmentation(len, config.min_len, config.max_len, rng);
            let path = segmentation
                .iter()
                .map(|segment| (*segment, rng.gen_range(0..config.num_class)))
                .collect::<Vec<_>>();
            state.segmentations.push(Segmentation::new());
            state.commit(line_ix, &path);
        }
        state.words.prune();

        info!(
            sentences = state.sentences.len(),
            characters = state.num_characters(),
            alphabet = state.interner.alphabet_size(),
            "initialized corpus with random segmentation"
        );

        Ok(state)
    }

    pub(crate) fn corpus_length(&self) -> usize {
        self.sentences.len()
    }

    pub(crate) fn num_class(&self) -> usize {
        self.words.num_class()
    }

    pub(crate) fn num_characters(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    pub(crate) fn word(&self, line_ix: usize, segment: Segment) -> &[CharId] {
        &self.sentences[line_ix][segment.start..segment.end]
    }

    pub(crate) fn class_of(&self, line_ix: usize, segment: Segment) -> Option<ClassId> {
        self.assignment
            .get(&SegmentKey::new(line_ix, segment))
            .copied()
    }

    pub(crate) fn class_path(&self, line_ix: usize) -> Option<ClassPath> {
        let segmentation = &self.segmentations[line_ix];
        let first = segmentation.first()?;
        self.class_of(line_ix, *first)?;
        segmentation
            .iter()
            .map(|segment| self.class_of(line_ix, *segment))
            .collect()
    }

    /// Removes the sentence's segments from the statistics and returns the
    /// path they formed. The segmentation itself stays in place, unlabeled,
    /// until the next commit.
    pub(crate) fn retract(&mut self, line_ix: usize) -> Vec<(Segment, ClassId)> {
        let mut previous = Vec::with_capacity(self.segmentations[line_ix].len());
        for segment in self.segmentations[line_ix].iter().copied() {
            let class = self
                .assignment
                .remove(&SegmentKey::new(line_ix, segment))
                .expect("retracted segment has no class assignment");
            let word = &self.sentences[line_ix][segment.start..segment.end];
            self.words.remove(class, word);
            previous.push((segment, class));
        }
        previous
    }

    pub(crate) fn commit(&mut self, line_ix: usize, path: &[(Segment, ClassId)]) {
        let len = self.sentences[line_ix].len();
        let mut expected_start = 0usize;
        for (segment, class) in path {
            assert!(
                segment.start == expected_start && segment.end > segment.start,
                "segments of sentence {line_ix} do not tile it"
            );
            assert!(
                *class < self.num_class(),
                "class {class} out of range while committing sentence {line_ix}"
            );
            expected_start = segment.end;
        }
        assert_eq!(
            expected_start, len,
            "segments of sentence {line_ix} do not cover it"
        );

        let mut segmentation = Segmentation::with_capacity(path.len());
        for (segment, class) in path.iter().copied() {
            self.assignment
                .insert(SegmentKey::new(line_ix, segment), class);
            let word = &self.sentences[line_ix][segment.start..segment.end];
            self.words.add(class, word);
            segmentation.push(segment);
        }
        self.segmentations[line_ix] = segmentation;
    }

    pub(crate) fn check_invariants(&self) -> Result<()> {
        if self.prior.len() != self.interner.alphabet_size() {
            return Err(SegmError::StateInconsistency(format!(
                "character prior covers {} of {} characters",
                self.prior.len(),
                self.interner.alphabet_size()
            )));
        }

        let mut live_segments = 0usize;
        for (line_ix, segmentation) in self.segmentations.iter().enumerate() {
            let mut expected_start = 0usize;
            for segment in segmentation {
                if segment.start != expected_start || segment.is_empty() {
                    return Err(SegmError::StateInconsistency(format!(
                        "segments of sentence {line_ix} do not tile it"
                    )));
                }
                if self.class_of(line_ix, *segment).is_none() {
                    return Err(SegmError::StateInconsistency(format!(
                        "segment {}..{} of sentence {line_ix} has no class",
                        segment.start, segment.end
                    )));
                }
                expected_start = segment.end;
                live_segments += 1;
            }
            if expected_start != self.sentences[line_ix].len() {
                return Err(SegmError::StateInconsistency(format!(
                    "segments of sentence {line_ix} cover {expected_start} of {} characters",
                    self.sentences[line_ix].len()
                )));
            }
        }

        if live_segments != self.assignment.len() {
            return Err(SegmError::StateInconsistency(format!(
                "{} class assignments for {live_segments} live segments",
                self.assignment.len()
            )));
        }

        for class in 0..self.num_class() {
            if !self.words.is_consistent(class) {
                return Err(SegmError::StateInconsistency(format!(
                    "word counts of class {class} do not sum to its total"
                )));
            }
        }

        let total_words = self.words.num_words.iter().sum::<i64>();
        if total_words != live_segments as i64 {
            return Err(SegmError::StateInconsistency(format!(
                "{total_words} counted words for {live_segments} live segments"
            )));
        }

        Ok(())
    }
}
