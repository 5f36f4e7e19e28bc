// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Dense state-vector primitives for registers of `n` qudits of dimension `d`.
//!
//! A state is an `Array1<Complex<f64>>` of length `d^n`, with qudit 0 as the
//! most significant digit of the basis index: for qubits, `|10⟩` is index 2.
//! An operator is a `d^k × d^k` matrix applied to `k` ordered positions.
//!
//! Measurements are destructive: the measured position is factored out of the
//! state, so the returned state has length `d^(n-1)`.

#[cfg(test)]
mod tests;

use ndarray::{Array1, Array2};
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;

pub type Amplitude = Complex<f64>;

/// Outcome of a destructive measurement.
#[derive(Clone, Debug)]
pub struct Collapse {
    /// The sampled outcome.
    pub outcome: usize,
    /// The probability with which the outcome was sampled.
    pub probability: f64,
    /// The renormalized post-measurement state, with the measured position
    /// removed.
    pub state: Array1<Amplitude>,
}

/// The `|0…0⟩` state of `num_qudits` qudits of dimension `dim`.
#[must_use]
pub fn zero_state(num_qudits: usize, dim: usize) -> Array1<Amplitude> {
    assert!(dim >= 2, "qudit dimension must be at least 2");
    let mut state = Array1::zeros(span(dim, num_qudits));
    state[0] = Amplitude::new(1.0, 0.0);
    state
}

/// Number of qudits in a state of length `len`.
#[must_use]
pub fn num_qudits(len: usize, dim: usize) -> usize {
    let mut remaining = len;
    let mut count = 0;
    while remaining > 1 {
        assert!(
            remaining.is_multiple_of(dim),
            "state length {len} is not a power of {dim}"
        );
        remaining /= dim;
        count += 1;
    }
    count
}

/// Applies a `d^k × d^k` operator to the `k` ordered positions `targets` of
/// `state`, returning the new state.
#[must_use]
pub fn apply(
    state: &Array1<Amplitude>,
    op: &Array2<Amplitude>,
    targets: &[usize],
    dim: usize,
) -> Array1<Amplitude> {
    let n = num_qudits(state.len(), dim);
    let op_span = span(dim, targets.len());
    assert_eq!(
        (op.nrows(), op.ncols()),
        (op_span, op_span),
        "operator shape does not match {} target(s) of dimension {dim}",
        targets.len()
    );
    let strides: Vec<usize> = targets
        .iter()
        .map(|&t| {
            assert!(t < n, "target position {t} out of range for {n} qudits");
            stride_of(t, n, dim)
        })
        .collect();

    let mut out = Array1::zeros(state.len());
    for i in 0..state.len() {
        // The digits of `i` at the target positions form the operator row;
        // `base` is `i` with those digits cleared.
        let mut row = 0;
        let mut base = i;
        for &s in &strides {
            let digit = (i / s) % dim;
            row = row * dim + digit;
            base -= digit * s;
        }
        let mut acc = Amplitude::zero();
        for col in 0..op_span {
            let mut j = base;
            let mut rest = col;
            for &s in strides.iter().rev() {
                j += (rest % dim) * s;
                rest /= dim;
            }
            acc += op[(row, col)] * state[j];
        }
        out[i] = acc;
    }
    out
}

/// Destructive measurement of `target` in the computational basis.
pub fn measure(
    state: &Array1<Amplitude>,
    target: usize,
    dim: usize,
    rng: &mut impl Rng,
) -> Collapse {
    let n = num_qudits(state.len(), dim);
    assert!(target < n, "target position {target} out of range for {n} qudits");
    let stride = stride_of(target, n, dim);

    let mut probabilities = vec![0.0; dim];
    for (i, amp) in state.iter().enumerate() {
        probabilities[(i / stride) % dim] += amp.norm_sqr();
    }
    let outcome = sample(&probabilities, rng);
    let probability = probabilities[outcome];
    let norm = probability.sqrt();

    let mut collapsed = Array1::zeros(state.len() / dim);
    for j in 0..collapsed.len() {
        collapsed[j] = state[embed(j, stride, dim, outcome)] / norm;
    }
    Collapse {
        outcome,
        probability,
        state: collapsed,
    }
}

/// Destructive measurement of `target` in the orthonormal basis given by the
/// columns of the `d × d` matrix `basis`.
pub fn measure_in_basis(
    state: &Array1<Amplitude>,
    basis: &Array2<Amplitude>,
    target: usize,
    dim: usize,
    rng: &mut impl Rng,
) -> Collapse {
    assert_eq!(
        (basis.nrows(), basis.ncols()),
        (dim, dim),
        "measurement basis must be a {dim} × {dim} matrix"
    );
    let branches: Vec<Array1<Amplitude>> = (0..dim)
        .map(|a| project_out(state, target, dim, |k| basis[(k, a)].conj()))
        .collect();
    collapse_into(branches, rng)
}

/// Destructive generalized measurement of `target` through a list of `1 × d`
/// effect operators, each mapping the target subsystem out of the state. The
/// computational and basis measurements are the orthonormal special cases.
pub fn measure_with_effects(
    state: &Array1<Amplitude>,
    effects: &[Array2<Amplitude>],
    target: usize,
    dim: usize,
    rng: &mut impl Rng,
) -> Collapse {
    assert!(!effects.is_empty(), "at least one effect operator is required");
    let branches: Vec<Array1<Amplitude>> = effects
        .iter()
        .map(|effect| {
            assert_eq!(
                (effect.nrows(), effect.ncols()),
                (1, dim),
                "effect operators must be 1 × {dim} matrices"
            );
            project_out(state, target, dim, |k| effect[(0, k)])
        })
        .collect();
    collapse_into(branches, rng)
}

/// Applies the bra `⟨φ|` at `target`, removing that position from the state.
fn project_out(
    state: &Array1<Amplitude>,
    target: usize,
    dim: usize,
    bra: impl Fn(usize) -> Amplitude,
) -> Array1<Amplitude> {
    let n = num_qudits(state.len(), dim);
    assert!(target < n, "target position {target} out of range for {n} qudits");
    let stride = stride_of(target, n, dim);

    let mut reduced = Array1::zeros(state.len() / dim);
    for j in 0..reduced.len() {
        let mut acc = Amplitude::zero();
        for k in 0..dim {
            acc += bra(k) * state[embed(j, stride, dim, k)];
        }
        reduced[j] = acc;
    }
    reduced
}

/// Samples one branch by its squared norm and renormalizes it.
fn collapse_into(branches: Vec<Array1<Amplitude>>, rng: &mut impl Rng) -> Collapse {
    let probabilities: Vec<f64> = branches
        .iter()
        .map(|branch| branch.iter().map(Amplitude::norm_sqr).sum())
        .collect();
    let outcome = sample(&probabilities, rng);
    let probability = probabilities[outcome];
    let norm = probability.sqrt();
    Collapse {
        outcome,
        probability,
        state: branches[outcome].map(|amp| *amp / norm),
    }
}

/// Samples an index proportionally to the given weights.
fn sample(probabilities: &[f64], rng: &mut impl Rng) -> usize {
    let total: f64 = probabilities.iter().sum();
    assert!(total > 0.0, "no outcome has nonzero probability");
    let mut r = rng.gen_range(0.0..1.0) * total;
    for (outcome, &p) in probabilities.iter().enumerate() {
        if r < p {
            return outcome;
        }
        r -= p;
    }
    // Floating-point residue lands on the last outcome with any weight.
    probabilities
        .iter()
        .rposition(|&p| p > 0.0)
        .expect("total probability is positive")
}

/// Index into the full state for reduced index `j` with `digit` inserted at
/// the position whose stride is `stride`.
fn embed(j: usize, stride: usize, dim: usize, digit: usize) -> usize {
    (j / stride) * stride * dim + digit * stride + j % stride
}

/// Stride of the digit at `position` in a big-endian index over `n` qudits.
fn stride_of(position: usize, n: usize, dim: usize) -> usize {
    span(dim, n - 1 - position)
}

/// `dim^count`.
fn span(dim: usize, count: usize) -> usize {
    dim.pow(u32::try_from(count).expect("qudit count fits in u32"))
}
