use crate::error::{Result, SegmError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub const DEFAULT_NUM_CLASS: usize = 3;
pub const DEFAULT_MIN_LEN: usize = 2;
pub const DEFAULT_MAX_LEN: usize = 6;
pub const DEFAULT_AVE_LEN: f64 = 4.0;
pub const DEFAULT_CONCENTRATION: f64 = 10.0;
pub const DEFAULT_TRANSITION_PSEUDO_COUNT: f64 = 0.1;

pub(crate) const PARALLEL_CLASS_THRESHOLD: usize = 32;
pub(crate) const PROB_ATOL: f64 = 1e-9;

pub type CharId = u32;
pub type ClassId = usize;

pub(crate) type Word = SmallVec<[CharId; DEFAULT_MAX_LEN]>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

pub(crate) type Segmentation = SmallVec<[Segment; 8]>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct SegmentKey {
    pub(crate) sentence: u32,
    pub(crate) start: u32,
    pub(crate) end: u32,
}

impl SegmentKey {
    pub(crate) fn new(sentence: usize, segment: Segment) -> Self {
        Self {
            sentence: sentence as u32,
            start: segment.start as u32,
            end: segment.end as u32,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    Sample,
    MaxPath,
}

impl DecodeMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "sample" => Ok(Self::Sample),
            "max_path" | "maxpath" => Ok(Self::MaxPath),
            _ => Err(SegmError::InvalidConfig(format!(
                "Invalid decode mode {value:?}. Expected one of: 'sample', 'max_path'."
            ))),
        }
    }

    pub fn from_max_path(use_max_path: bool) -> Self {
        if use_max_path {
            Self::MaxPath
        } else {
            Self::Sample
        }
    }
}
