// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use criterion::{Criterion, criterion_group, criterion_main};
use ndarray::Array2;
use qudit_circuit::{Amplitude, DenseBackend, QuditCircuit};

fn hadamard() -> Array2<Amplitude> {
    let f = 0.5_f64.sqrt();
    Array2::from_shape_fn((2, 2), |(i, j)| {
        Amplitude::new(if (i, j) == (1, 1) { -f } else { f }, 0.0)
    })
}

fn layered_run(c: &mut Criterion) {
    const QUBITS: usize = 10;
    let targets: Vec<usize> = (0..QUBITS).collect();

    c.bench_function("run 10-qubit layered circuit", |b| {
        b.iter(|| {
            let mut circuit = QuditCircuit::new(QUBITS, QUBITS, 2);
            for _ in 0..4 {
                circuit.gate_fan(hadamard(), &targets, Some("H"));
            }
            for q in 0..QUBITS {
                circuit.measure(q, q, None).expect("scheduling is valid");
            }
            let mut backend = DenseBackend::with_seed(7);
            circuit.run(&mut backend).expect("run succeeds");
        });
    });
}

criterion_group!(benches, layered_run);
criterion_main!(benches);
