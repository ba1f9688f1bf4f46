use crate::config::HsmmConfig;
use crate::error::SegmError;
use crate::learner::Segmenter;
use crate::types::{
    ClassId, DecodeMode, DEFAULT_AVE_LEN, DEFAULT_CONCENTRATION, DEFAULT_MAX_LEN, DEFAULT_MIN_LEN,
    DEFAULT_NUM_CLASS, DEFAULT_TRANSITION_PSEUDO_COUNT,
};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};

impl From<SegmError> for PyErr {
    fn from(err: SegmError) -> Self {
        match err {
            SegmError::InvalidConfig(_)
            | SegmError::EmptyCorpus
            | SegmError::InvalidClass { .. }
            | SegmError::InvalidSentence { .. }
            | SegmError::AlphabetOverflow(_) => PyValueError::new_err(err.to_string()),
            SegmError::DegenerateLattice { .. }
            | SegmError::SweepFailed { .. }
            | SegmError::StateInconsistency(_) => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

pub(crate) type TransitionTables = (Vec<Vec<f64>>, Vec<f64>, Vec<f64>);

fn panic_payload_to_string(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic payload".to_string()
}

#[pymethods]
impl Segmenter {
    #[new]
    #[pyo3(signature = (
        corpus,
        num_class=DEFAULT_NUM_CLASS,
        min_len=DEFAULT_MIN_LEN,
        max_len=DEFAULT_MAX_LEN,
        ave_len=DEFAULT_AVE_LEN,
        concentration=DEFAULT_CONCENTRATION,
        transition_pseudo_count=DEFAULT_TRANSITION_PSEUDO_COUNT,
        seed=None,
        line_delimiter=Some("\n"),
    ))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        corpus: Vec<String>,
        num_class: usize,
        min_len: usize,
        max_len: usize,
        ave_len: f64,
        concentration: f64,
        transition_pseudo_count: f64,
        seed: Option<u64>,
        line_delimiter: Option<&str>,
    ) -> PyResult<Self> {
        let config = HsmmConfig {
            num_class,
            min_len,
            max_len,
            ave_len,
            concentration,
            transition_pseudo_count,
            seed,
        };
        Ok(Self::from_documents(&corpus, line_delimiter, config)?)
    }

    #[pyo3(name = "corpus_length")]
    fn py_corpus_length(&self) -> usize {
        self.corpus_length()
    }

    /// Runs `iterations` sweeps and returns the per-class vocabulary sizes
    /// recorded after each one.
    #[pyo3(name = "run", signature = (iterations, max_path=false))]
    fn py_run(
        &mut self,
        py: Python<'_>,
        iterations: usize,
        max_path: bool,
    ) -> PyResult<Vec<Vec<usize>>> {
        let mode = DecodeMode::from_max_path(max_path);
        let result = py.allow_threads(|| {
            catch_unwind(AssertUnwindSafe(|| self.run(iterations, mode)))
                .map_err(panic_payload_to_string)
        });
        let history = result.map_err(|message| {
            PyRuntimeError::new_err(format!("segmenter panicked during run(): {message}"))
        })??;
        Ok(history.into_iter().map(|stats| stats.num_vocab).collect())
    }

    #[pyo3(name = "word_counts")]
    fn py_word_counts(&self, class: ClassId) -> PyResult<Vec<(String, i64)>> {
        Ok(self.word_counts(class)?)
    }

    #[pyo3(name = "segmentations")]
    fn py_segmentations(&self) -> Vec<Vec<String>> {
        self.segmentations()
    }

    #[pyo3(name = "class_paths")]
    fn py_class_paths(&self) -> Vec<Vec<ClassId>> {
        self.class_paths()
    }

    #[pyo3(name = "class_sequences")]
    fn py_class_sequences(&self) -> Vec<Vec<ClassId>> {
        self.class_sequences()
    }

    #[pyo3(name = "transitions")]
    fn py_transitions(&self) -> TransitionTables {
        let transitions = self.transitions();
        (
            transitions.matrix(),
            transitions.begin_probs().to_vec(),
            transitions.end_probs().to_vec(),
        )
    }

    #[pyo3(name = "num_vocab")]
    fn py_num_vocab(&self) -> Vec<usize> {
        self.num_vocab().to_vec()
    }

    #[pyo3(name = "emission_score")]
    fn py_emission_score(&self, class: ClassId, word: &str) -> PyResult<f64> {
        Ok(self.emission_score(class, word)?)
    }

    #[pyo3(name = "check_invariants")]
    fn py_check_invariants(&self) -> PyResult<()> {
        Ok(self.check_invariants()?)
    }
}

#[pymodule(gil_used = true)]
fn _core(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<Segmenter>()?;
    module.add("DEFAULT_MIN_LEN", DEFAULT_MIN_LEN)?;
    module.add("DEFAULT_MAX_LEN", DEFAULT_MAX_LEN)?;
    module.add("DEFAULT_AVE_LEN", DEFAULT_AVE_LEN)?;
    module.add("DEFAULT_CONCENTRATION", DEFAULT_CONCENTRATION)?;
    Ok(())
}
