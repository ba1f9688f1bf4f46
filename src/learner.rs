use crate::config::HsmmConfig;
use crate::corpus::CorpusState;
use crate::emission::EmissionModel;
use crate::error::{Result, SegmError};
use crate::forward::forward_filter;
use crate::interner::sentences_from_documents;
use crate::sampler::backward_sample;
use crate::transition::TransitionProbs;
use crate::types::{DecodeMode, PROB_ATOL};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepStats {
    pub sweep: usize,
    pub num_vocab: Vec<usize>,
    pub total_words: i64,
}

#[cfg_attr(feature = "python", pyo3::pyclass(name = "Segmenter"))]
#[derive(Clone, Debug)]
pub struct Segmenter {
    pub(crate) config: HsmmConfig,
    pub(crate) corpus: CorpusState,
    pub(crate) transitions: TransitionProbs,
    pub(crate) emission: EmissionModel,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) sweep_counter: usize,
}

impl Segmenter {
    pub fn from_sentences(sentences: &[String], config: HsmmConfig) -> Result<Self> {
        let rng = config.rng();
        Self::from_sentences_with_rng(sentences, config, rng)
    }

    pub fn from_sentences_with_rng(
        sentences: &[String],
        config: HsmmConfig,
        mut rng: ChaCha8Rng,
    ) -> Result<Self> {
        config.validate()?;
        let corpus = CorpusState::initialize(sentences, &config, &mut rng)?;
        let transitions = TransitionProbs::reestimate(&corpus, config.transition_pseudo_count);
        let emission = EmissionModel::new(&config);

        Ok(Self {
            config,
            corpus,
            transitions,
            emission,
            rng,
            sweep_counter: 0,
        })
    }

    pub fn from_documents(
        documents: &[String],
        line_delimiter: Option<&str>,
        config: HsmmConfig,
    ) -> Result<Self> {
        let sentences = sentences_from_documents(documents, line_delimiter);
        Self::from_sentences(&sentences, config)
    }

    pub fn config(&self) -> &HsmmConfig {
        &self.config
    }

    pub fn transitions(&self) -> &TransitionProbs {
        &self.transitions
    }

    pub fn corpus_length(&self) -> usize {
        self.corpus.corpus_length()
    }

    pub fn sweeps_completed(&self) -> usize {
        self.sweep_counter
    }

    pub fn num_vocab(&self) -> &[usize] {
        &self.corpus.words.num_vocab
    }

    pub fn check_invariants(&self) -> Result<()> {
        self.corpus.check_invariants()?;

        let close = |value: f64| (value - 1.0).abs() <= PROB_ATOL;
        let rows_ok = (0..self.transitions.num_class())
            .all(|class| close(self.transitions.row(class).iter().sum()));
        if !rows_ok
            || !close(self.transitions.begin_probs().iter().sum())
            || !close(self.transitions.end_probs().iter().sum())
        {
            return Err(SegmError::StateInconsistency(
                "transition probabilities are not normalized".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn refresh_transitions(&mut self) {
        self.transitions =
            TransitionProbs::reestimate(&self.corpus, self.config.transition_pseudo_count);
    }

    /// On an inference error the previous labeled segmentation is restored
    /// before the error is returned.
    pub fn update_sentence(&mut self, line_ix: usize, mode: DecodeMode) -> Result<()> {
        if line_ix >= self.corpus.corpus_length() {
            return Err(SegmError::InvalidSentence {
                index: line_ix,
                len: self.corpus.corpus_length(),
            });
        }

        let previous = self.corpus.retract(line_ix);
        self.refresh_transitions();

        let decoded = forward_filter(
            &self.corpus.sentences[line_ix],
            &self.corpus,
            &self.emission,
            &self.transitions,
            &self.config,
        )
        .and_then(|lattice| backward_sample(&lattice, &self.transitions, mode, &mut self.rng));

        let path = match decoded {
            Ok(path) => path,
            Err(err) => {
                self.corpus.commit(line_ix, &previous);
                self.refresh_transitions();
                return Err(err);
            }
        };

        self.corpus.commit(line_ix, &path);
        self.refresh_transitions();
        self.corpus.words.prune();

        debug!(sentence = line_ix, segments = path.len(), "resampled sentence");
        Ok(())
    }

    pub fn sweep(&mut self, mode: DecodeMode) -> Result<SweepStats> {
        let sweep = self.sweep_counter;
        for line_ix in 0..self.corpus.corpus_length() {
            self.update_sentence(line_ix, mode)
                .map_err(|source| SegmError::SweepFailed {
                    sweep,
                    sentence: line_ix,
                    source: Box::new(source),
                })?;
        }
        self.sweep_counter += 1;

        let stats = SweepStats {
            sweep,
            num_vocab: self.corpus.words.num_vocab.clone(),
            total_words: self.corpus.words.num_words.iter().sum(),
        };
        info!(
            sweep,
            total_vocab = self.corpus.words.total_vocab(),
            num_vocab = ?stats.num_vocab,
            "completed sweep"
        );
        Ok(stats)
    }

    pub fn run(&mut self, sweeps: usize, mode: DecodeMode) -> Result<Vec<SweepStats>> {
        let mut history = Vec::with_capacity(sweeps);
        for _ in 0..sweeps {
            history.push(self.sweep(mode)?);
        }
        Ok(history)
    }
}
