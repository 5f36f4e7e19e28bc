// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Classical reversible-circuit simulation over a runtime-sized bit vector.
//!
//! [`Bitset`] is the storage; [`BitCircuit`] holds a bitset and applies the
//! reversible boolean gates NOT, CNOT, TOFFOLI, SWAP, and FREDKIN to it while
//! counting how often each gate is used.

mod bitset;
mod circuit;

pub use bitset::Bitset;
pub use circuit::{BitCircuit, GateCounts};
