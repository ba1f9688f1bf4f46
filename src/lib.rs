//! Unsupervised word segmentation with a hidden semi-Markov model.
//!
//! Every sentence is cut into segments, each carrying one of a fixed number
//! of latent classes. A blocked Gibbs sampler repeatedly retracts one
//! sentence, runs forward filtering over (end position, duration, class) and
//! draws a fresh segmentation backwards from the lattice.

mod config;
mod corpus;
mod emission;
mod error;
mod forward;
mod interner;
mod learner;
mod prior;
mod report;
mod sampler;
mod transition;
mod types;
mod word_counts;

#[cfg(feature = "python")]
mod py_bindings;


pub use crate::config::HsmmConfig;
pub use crate::error::{Result, SegmError};
pub use crate::forward::Lattice;
pub use crate::interner::sentences_from_documents;
pub use crate::learner::{Segmenter, SweepStats};
pub use crate::report::ModelSnapshot;
pub use crate::transition::TransitionProbs;
pub use crate::types::{
    CharId, ClassId, DecodeMode, Segment, DEFAULT_AVE_LEN, DEFAULT_CONCENTRATION,
    DEFAULT_MAX_LEN, DEFAULT_MIN_LEN, DEFAULT_NUM_CLASS, DEFAULT_TRANSITION_PSEUDO_COUNT,
};
