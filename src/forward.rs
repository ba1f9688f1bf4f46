use crate::config::HsmmConfig;
use crate::corpus::CorpusState;
use crate::emission::EmissionModel;
use crate::error::{Result, SegmError};
use crate::transition::TransitionProbs;
use crate::types::{CharId, ClassId, PARALLEL_CLASS_THRESHOLD};
use rayon::prelude::*;
use smallvec::{smallvec, SmallVec};

/// Forward probabilities over (end position, duration index, class).
///
/// Column `t` is stored divided by its own normalizer; the true
/// unnormalized value is `get(t, k, c) * exp(log_scale(t))`. Comparisons
/// inside one column are unaffected by the scaling.
#[derive(Clone, Debug)]
pub struct Lattice {
    pub(crate) len: usize,
    pub(crate) max_len: usize,
    pub(crate) num_class: usize,
    pub(crate) values: Vec<f64>,
    pub(crate) log_scales: Vec<f64>,
}

impl Lattice {
    pub(crate) fn zeros(len: usize, max_len: usize, num_class: usize) -> Self {
        Self {
            len,
            max_len,
            num_class,
            values: vec![0.0; len * max_len * num_class],
            log_scales: vec![f64::NEG_INFINITY; len],
        }
    }

    fn column_width(&self) -> usize {
        self.max_len * self.num_class
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn num_class(&self) -> usize {
        self.num_class
    }

    pub fn get(&self, t: usize, k: usize, c: ClassId) -> f64 {
        self.values[(t * self.max_len + k) * self.num_class + c]
    }

    pub fn unscaled(&self, t: usize, k: usize, c: ClassId) -> f64 {
        self.get(t, k, c) * self.log_scales[t].exp()
    }

    pub fn log_scale(&self, t: usize) -> f64 {
        self.log_scales[t]
    }

    pub fn column(&self, t: usize) -> &[f64] {
        let width = self.column_width();
        &self.values[t * width..(t + 1) * width]
    }

    fn column_mut(&mut self, t: usize) -> &mut [f64] {
        let width = self.column_width();
        &mut self.values[t * width..(t + 1) * width]
    }

    fn cell_mut(&mut self, t: usize, k: usize) -> &mut [f64] {
        let start = (t * self.max_len + k) * self.num_class;
        &mut self.values[start..start + self.num_class]
    }
}

/// Segment durations that may end at `t`. A sentence shorter than
/// `min_len` admits exactly one segment: itself.
pub(crate) fn candidate_durations(
    t: usize,
    len: usize,
    min_len: usize,
    max_len: usize,
) -> SmallVec<[usize; 8]> {
    if len < min_len {
        return if t + 1 == len {
            smallvec![len]
        } else {
            SmallVec::new()
        };
    }
    (min_len..=max_len).filter(|d| *d <= t + 1).collect()
}

pub(crate) fn forward_filter(
    sentence: &[CharId],
    corpus: &CorpusState,
    emission: &EmissionModel,
    transitions: &TransitionProbs,
    config: &HsmmConfig,
) -> Result<Lattice> {
    let len = sentence.len();
    if len == 0 {
        return Err(SegmError::DegenerateLattice { position: 0 });
    }

    let num_class = corpus.num_class();
    let mut lattice = Lattice::zeros(len, config.max_len, num_class);
    // Per-class mass of each finished (scaled) column: sum over durations.
    let mut class_mass = vec![0.0; len * num_class];

    for t in 0..len {
        let durations = candidate_durations(t, len, config.min_len, config.max_len);

        // Sentence-initial segments start from probability 1, i.e. scale 0.
        let reference = durations
            .iter()
            .map(|d| {
                if *d <= t {
                    lattice.log_scales[t - d]
                } else {
                    0.0
                }
            })
            .fold(f64::NEG_INFINITY, f64::max);
        if reference == f64::NEG_INFINITY {
            continue;
        }

        let is_last = t + 1 == len;
        for d in durations {
            let start = t + 1 - d;
            let word = &sentence[start..=t];

            let (predecessor, scale) = if start > 0 {
                let prev = start - 1;
                (
                    Some(&class_mass[prev * num_class..start * num_class]),
                    (lattice.log_scales[prev] - reference).exp(),
                )
            } else {
                (None, (-reference).exp())
            };
            if scale == 0.0 {
                continue;
            }

            let log_prior = emission.log_prior(&corpus.prior, word);
            let compute = |class: ClassId| -> f64 {
                let emit = emission.score_with_prior(&corpus.words, class, word, log_prior);
                let incoming = match predecessor {
                    Some(mass) => mass
                        .iter()
                        .enumerate()
                        .map(|(cc, m)| m * transitions.trans(cc, class))
                        .sum::<f64>(),
                    None => transitions.begin(class),
                };
                let value = emit * incoming * scale;
                if is_last {
                    value * transitions.end(class)
                } else {
                    value
                }
            };

            let cell = lattice.cell_mut(t, d - 1);
            if num_class >= PARALLEL_CLASS_THRESHOLD {
                let values = (0..num_class)
                    .into_par_iter()
                    .map(compute)
                    .collect::<Vec<_>>();
                cell.copy_from_slice(&values);
            } else {
                for (class, slot) in cell.iter_mut().enumerate() {
                    *slot = compute(class);
                }
            }
        }

        let total = lattice.column(t).iter().sum::<f64>();
        if total > 0.0 && total.is_finite() {
            for value in lattice.column_mut(t) {
                *value /= total;
            }
            lattice.log_scales[t] = reference + total.ln();

            let mass = &mut class_mass[t * num_class..(t + 1) * num_class];
            for (ix, value) in lattice.column(t).iter().enumerate() {
                mass[ix % num_class] += value;
            }
        }
    }

    if lattice.log_scales[len - 1] == f64::NEG_INFINITY {
        return Err(SegmError::DegenerateLattice { position: len - 1 });
    }

    Ok(lattice)
}
