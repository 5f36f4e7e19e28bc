// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::circuit::MeasureKind;
use ndarray::{Array1, Array2};
use qudit_simulators::Amplitude;
use rand::{SeedableRng, rngs::StdRng};

/// Result of a backend measurement.
#[derive(Clone, Debug)]
pub struct Measured {
    /// The sampled outcome, in `[0, d)` for the projective and basis kinds,
    /// or an index into the effect list for the generalized kind.
    pub outcome: usize,
    /// The probability with which the outcome was sampled.
    pub probability: f64,
    /// The collapsed state, with the measured position factored out.
    pub state: Array1<Amplitude>,
}

/// The numeric capability a circuit is interpreted against.
///
/// The circuit owns the state; the backend is pure with respect to it — every
/// call returns a replacement state rather than mutating in place.
pub trait Backend {
    /// Applies `op` to the `targets` positions of `state`, each of dimension
    /// `dim`, returning the new state.
    fn apply(
        &mut self,
        state: &Array1<Amplitude>,
        op: &Array2<Amplitude>,
        targets: &[usize],
        dim: usize,
    ) -> Array1<Amplitude>;

    /// Measures the position `target` of `state` with the given payload,
    /// returning the sampled outcome, its probability, and the collapsed
    /// state.
    fn measure(
        &mut self,
        state: &Array1<Amplitude>,
        kind: &MeasureKind,
        target: usize,
        dim: usize,
    ) -> Measured;
}

/// Reference backend over the dense state-vector primitives of
/// `qudit_simulators`.
pub struct DenseBackend {
    rng: StdRng,
}

impl DenseBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A backend whose measurement sampling is reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for DenseBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for DenseBackend {
    fn apply(
        &mut self,
        state: &Array1<Amplitude>,
        op: &Array2<Amplitude>,
        targets: &[usize],
        dim: usize,
    ) -> Array1<Amplitude> {
        qudit_simulators::apply(state, op, targets, dim)
    }

    fn measure(
        &mut self,
        state: &Array1<Amplitude>,
        kind: &MeasureKind,
        target: usize,
        dim: usize,
    ) -> Measured {
        let collapse = match kind {
            MeasureKind::Projective => qudit_simulators::measure(state, target, dim, &mut self.rng),
            MeasureKind::Basis(basis) => {
                qudit_simulators::measure_in_basis(state, basis, target, dim, &mut self.rng)
            }
            MeasureKind::Kraus(effects) => {
                qudit_simulators::measure_with_effects(state, effects, target, dim, &mut self.rng)
            }
        };
        Measured {
            outcome: collapse.outcome,
            probability: collapse.probability,
            state: collapse.state,
        }
    }
}
