// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while scheduling measurements or interpreting a circuit.
///
/// Measurement scheduling validates eagerly; gate appends never validate, so
/// an inconsistent gate step only surfaces here when the engine resolves its
/// labels during a run.
#[derive(Clone, Debug, Diagnostic, Error, Eq, PartialEq)]
pub enum Error {
    /// A qudit label at or beyond the circuit's qudit count.
    #[error("qudit label {label} is out of range for a circuit of {num_qudits} qudits")]
    #[diagnostic(code(qudit_circuit::qudit_out_of_range))]
    QuditOutOfRange { label: usize, num_qudits: usize },

    /// A classical register label at or beyond the circuit's register count.
    #[error(
        "classical register {register} is out of range for a circuit with {num_registers} registers"
    )]
    #[diagnostic(code(qudit_circuit::register_out_of_range))]
    RegisterOutOfRange {
        register: usize,
        num_registers: usize,
    },

    /// A qudit that has already been measured was named again, either in a
    /// scheduling call or by a step resolved during a run.
    #[error("qudit {label} has already been measured")]
    #[diagnostic(code(qudit_circuit::already_measured))]
    AlreadyMeasured { label: usize },

    /// A recorded step whose kind has no run-time interpretation was executed.
    #[error("gate '{gate}' at step {step} has no run-time interpretation")]
    #[diagnostic(
        code(qudit_circuit::unsupported),
        help("controlled and classically-controlled steps are recorded but not yet interpreted")
    )]
    Unsupported { step: usize, gate: String },
}
