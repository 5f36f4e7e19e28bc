// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn real(rows: &[&[f64]]) -> Array2<Amplitude> {
    Array2::from_shape_fn((rows.len(), rows[0].len()), |(i, j)| {
        Amplitude::new(rows[i][j], 0.0)
    })
}

fn x2() -> Array2<Amplitude> {
    real(&[&[0., 1.], &[1., 0.]])
}

fn h2() -> Array2<Amplitude> {
    let f = 0.5_f64.sqrt();
    real(&[&[f, f], &[f, -f]])
}

fn cx() -> Array2<Amplitude> {
    real(&[
        &[1., 0., 0., 0.],
        &[0., 1., 0., 0.],
        &[0., 0., 0., 1.],
        &[0., 0., 1., 0.],
    ])
}

/// Cyclic shift on a qutrit: `|k⟩ → |k+1 mod 3⟩`.
fn shift3() -> Array2<Amplitude> {
    real(&[&[0., 0., 1.], &[1., 0., 0.], &[0., 1., 0.]])
}

fn assert_close(actual: &Array1<Amplitude>, expected: &[Amplitude]) {
    assert_eq!(actual.len(), expected.len(), "state lengths differ");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).norm() < 1e-12, "expected {expected:?}, got {actual:?}");
    }
}

fn amp(re: f64) -> Amplitude {
    Amplitude::new(re, 0.0)
}

#[test]
fn zero_state_is_origin_basis_vector() {
    let state = zero_state(2, 3);
    assert_eq!(state.len(), 9);
    let mut expected = vec![amp(0.0); 9];
    expected[0] = amp(1.0);
    assert_close(&state, &expected);
}

#[test]
fn qudit_zero_is_most_significant_digit() {
    // X on qudit 0 of two qubits: |00⟩ → |10⟩, which is index 2.
    let state = apply(&zero_state(2, 2), &x2(), &[0], 2);
    assert_close(&state, &[amp(0.), amp(0.), amp(1.), amp(0.)]);
}

#[test]
fn controlled_gate_follows_target_order() {
    // CX on (0, 1): |10⟩ → |11⟩.
    let flipped = apply(&zero_state(2, 2), &x2(), &[0], 2);
    let state = apply(&flipped, &cx(), &[0, 1], 2);
    assert_close(&state, &[amp(0.), amp(0.), amp(0.), amp(1.)]);

    // CX on (1, 0): |01⟩ → |11⟩ — the control digit is now position 1.
    let flipped = apply(&zero_state(2, 2), &x2(), &[1], 2);
    let state = apply(&flipped, &cx(), &[1, 0], 2);
    assert_close(&state, &[amp(0.), amp(0.), amp(0.), amp(1.)]);
}

#[test]
fn qutrit_shift_advances_the_digit() {
    let state = apply(&zero_state(1, 3), &shift3(), &[0], 3);
    assert_close(&state, &[amp(0.), amp(1.), amp(0.)]);
    let state = apply(&state, &shift3(), &[0], 3);
    assert_close(&state, &[amp(0.), amp(0.), amp(1.)]);
}

#[test]
fn measuring_a_determinate_qudit_is_certain() {
    let mut rng = StdRng::seed_from_u64(0);
    let state = apply(&zero_state(2, 2), &x2(), &[0], 2);
    let collapse = measure(&state, 0, 2, &mut rng);
    assert_eq!(collapse.outcome, 1);
    assert!((collapse.probability - 1.0).abs() < 1e-12);
    // The measured qudit is factored out; |10⟩ leaves |0⟩ behind.
    assert_close(&collapse.state, &[amp(1.), amp(0.)]);
}

#[test]
fn measuring_a_superposition_renormalizes_the_survivor() {
    // (|00⟩ + |11⟩)/√2, measure qudit 0: either branch leaves the partner
    // qudit in the matching renormalized basis state.
    let bell = {
        let plus = apply(&zero_state(2, 2), &h2(), &[0], 2);
        apply(&plus, &cx(), &[0, 1], 2)
    };
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        let collapse = measure(&bell, 0, 2, &mut rng);
        assert!((collapse.probability - 0.5).abs() < 1e-12);
        let mut expected = vec![amp(0.0); 2];
        expected[collapse.outcome] = amp(1.0);
        assert_close(&collapse.state, &expected);
    }
}

#[test]
fn basis_measurement_diagonalizes_a_superposition() {
    // |+⟩ measured in the Hadamard basis is outcome 0 with certainty.
    let plus = apply(&zero_state(1, 2), &h2(), &[0], 2);
    let mut rng = StdRng::seed_from_u64(3);
    let collapse = measure_in_basis(&plus, &h2(), 0, 2, &mut rng);
    assert_eq!(collapse.outcome, 0);
    assert!((collapse.probability - 1.0).abs() < 1e-12);
    assert_eq!(collapse.state.len(), 1);
}

#[test]
fn computational_effects_match_the_computational_measurement() {
    let effects = vec![real(&[&[1., 0.]]), real(&[&[0., 1.]])];
    let state = apply(&zero_state(2, 2), &h2(), &[1], 2);
    for seed in 0..8 {
        let direct = measure(&state, 1, 2, &mut StdRng::seed_from_u64(seed));
        let general =
            measure_with_effects(&state, &effects, 1, 2, &mut StdRng::seed_from_u64(seed));
        assert_eq!(direct.outcome, general.outcome);
        assert!((direct.probability - general.probability).abs() < 1e-12);
        for (a, b) in direct.state.iter().zip(general.state.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }
}

#[test]
fn num_qudits_inverts_state_length() {
    assert_eq!(num_qudits(1, 2), 0);
    assert_eq!(num_qudits(8, 2), 3);
    assert_eq!(num_qudits(27, 3), 3);
}

#[test]
#[should_panic(expected = "not a power of")]
fn num_qudits_rejects_ragged_lengths() {
    num_qudits(6, 4);
}
