use thiserror::Error;

#[derive(Debug, Error)]
pub enum SegmError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("corpus contains no non-empty sentence")]
    EmptyCorpus,

    #[error("class {class} out of range for {num_class} classes")]
    InvalidClass { class: usize, num_class: usize },

    #[error("sentence {index} out of range for a corpus of {len} sentences")]
    InvalidSentence { index: usize, len: usize },

    #[error("alphabet of {0} characters exceeds CharId capacity (u32)")]
    AlphabetOverflow(usize),

    #[error("degenerate lattice: all weights are zero at position {position}")]
    DegenerateLattice { position: usize },

    #[error("sweep {sweep} failed on sentence {sentence}: {source}")]
    SweepFailed {
        sweep: usize,
        sentence: usize,
        #[source]
        source: Box<SegmError>,
    },

    #[error("state inconsistency: {0}")]
    StateInconsistency(String),
}

pub type Result<T> = std::result::Result<T, SegmError>;
