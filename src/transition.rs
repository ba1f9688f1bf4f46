use crate::corpus::CorpusState;
use crate::types::ClassId;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionProbs {
    num_class: usize,
    trans: Vec<f64>,
    begin: Vec<f64>,
    end: Vec<f64>,
}

fn normalize(values: &mut [f64]) {
    let total = values.iter().sum::<f64>();
    for value in values.iter_mut() {
        *value /= total;
    }
}

impl TransitionProbs {
    /// Recounts every labeled sentence from scratch. Sentences that are
    /// currently retracted contribute nothing.
    pub(crate) fn reestimate(corpus: &CorpusState, pseudo_count: f64) -> Self {
        let num_class = corpus.num_class();
        let mut trans = vec![pseudo_count; num_class * num_class];
        let mut begin = vec![pseudo_count; num_class];
        let mut end = vec![pseudo_count; num_class];

        for line_ix in 0..corpus.corpus_length() {
            let Some(classes) = corpus.class_path(line_ix) else {
                continue;
            };

            begin[classes[0]] += 1.0;
            for pair in classes.windows(2) {
                trans[pair[0] * num_class + pair[1]] += 1.0;
            }
            end[classes[classes.len() - 1]] += 1.0;
        }

        for row in trans.chunks_mut(num_class) {
            normalize(row);
        }
        normalize(&mut begin);
        normalize(&mut end);

        Self {
            num_class,
            trans,
            begin,
            end,
        }
    }

    pub fn num_class(&self) -> usize {
        self.num_class
    }

    pub fn trans(&self, from: ClassId, to: ClassId) -> f64 {
        self.trans[from * self.num_class + to]
    }

    pub fn begin(&self, class: ClassId) -> f64 {
        self.begin[class]
    }

    pub fn end(&self, class: ClassId) -> f64 {
        self.end[class]
    }

    pub fn row(&self, from: ClassId) -> &[f64] {
        &self.trans[from * self.num_class..(from + 1) * self.num_class]
    }

    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.trans
            .chunks(self.num_class)
            .map(<[f64]>::to_vec)
            .collect()
    }

    pub fn begin_probs(&self) -> &[f64] {
        &self.begin
    }

    pub fn end_probs(&self) -> &[f64] {
        &self.end
    }
}
