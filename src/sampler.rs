use crate::error::{Result, SegmError};
use crate::forward::Lattice;
use crate::transition::TransitionProbs;
use crate::types::{ClassId, DecodeMode, Segment};
use rand::Rng;

pub(crate) fn sample_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let mut cumulative = Vec::with_capacity(weights.len());
    let mut total = 0.0;
    for weight in weights {
        total += weight;
        cumulative.push(total);
    }
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }

    let draw = rng.gen::<f64>() * total;
    cumulative
        .iter()
        .zip(weights)
        .position(|(acc, weight)| draw < *acc && *weight > 0.0)
        .or_else(|| weights.iter().rposition(|weight| *weight > 0.0))
}

pub(crate) fn argmax_index(weights: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (ix, weight) in weights.iter().copied().enumerate() {
        match best {
            Some((_, best_weight)) if weight <= best_weight => {}
            _ if weight > 0.0 => best = Some((ix, weight)),
            _ => {}
        }
    }
    best.map(|(ix, _)| ix)
}

pub(crate) fn backward_sample<R: Rng + ?Sized>(
    lattice: &Lattice,
    transitions: &TransitionProbs,
    mode: DecodeMode,
    rng: &mut R,
) -> Result<Vec<(Segment, ClassId)>> {
    if lattice.is_empty() {
        return Err(SegmError::DegenerateLattice { position: 0 });
    }

    let num_class = lattice.num_class();
    let mut weights = vec![0.0; lattice.max_len() * num_class];
    let mut path = Vec::new();
    let mut next_class: Option<ClassId> = None;
    let mut t = lattice.len() - 1;

    loop {
        for (ix, (weight, forward)) in weights.iter_mut().zip(lattice.column(t)).enumerate() {
            let transition = match next_class {
                Some(next) => transitions.trans(ix % num_class, next),
                None => 1.0,
            };
            *weight = forward * transition;
        }

        let picked = match mode {
            DecodeMode::Sample => sample_index(&weights, rng),
            DecodeMode::MaxPath => argmax_index(&weights),
        };
        let ix = picked.ok_or(SegmError::DegenerateLattice { position: t })?;

        let k = ix / num_class;
        let class = ix % num_class;
        let start = t
            .checked_sub(k)
            .ok_or(SegmError::DegenerateLattice { position: t })?;

        path.push((Segment { start, end: t + 1 }, class));
        if start == 0 {
            break;
        }
        t = start - 1;
        next_class = Some(class);
    }

    path.reverse();
    Ok(path)
}
