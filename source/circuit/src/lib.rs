// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Instruction model and execution engine for circuits of d-dimensional
//! qudits with mid-circuit destructive measurements.
//!
//! A [`QuditCircuit`] records unitary-gate and measurement steps addressed by
//! *original* qudit labels, then interprets them against a live state through
//! the [`Backend`] capability. Because every executed measurement factors its
//! target out of the state, the circuit keeps a [`WireMap`] that resolves an
//! original label to its current position in the shrunken state at the moment
//! each step executes.

mod backend;
mod circuit;
mod error;
mod wire_map;

pub use backend::{Backend, DenseBackend, Measured};
pub use circuit::{
    GateKind, GateShape, GateStep, MeasureKind, MeasureStep, QuditCircuit, Step,
};
pub use error::Error;
pub use qudit_simulators::Amplitude;
pub use wire_map::{Slot, WireMap};
