// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Bitset;
use std::fmt::{self, Display, Formatter};

/// How many times each reversible gate has been applied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GateCounts {
    pub not: usize,
    pub cnot: usize,
    pub swap: usize,
    pub toffoli: usize,
    pub fredkin: usize,
}

/// A classical reversible circuit over a [`Bitset`].
///
/// Each gate reads and writes the held bitset and increments exactly its own
/// usage counter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BitCircuit {
    bits: Bitset,
    counts: GateCounts,
}

impl BitCircuit {
    /// Creates a circuit over `len` bits, all zero.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self::from_bits(Bitset::new(len))
    }

    /// Creates a circuit over an existing bitset.
    #[must_use]
    pub fn from_bits(bits: Bitset) -> Self {
        Self {
            bits,
            counts: GateCounts::default(),
        }
    }

    /// Read access to the bit storage.
    #[must_use]
    pub fn bits(&self) -> &Bitset {
        &self.bits
    }

    /// The per-gate usage counters.
    #[must_use]
    pub fn counts(&self) -> GateCounts {
        self.counts
    }

    /// Inverts the bit at `pos`.
    pub fn not(&mut self, pos: usize) {
        self.bits.flip(pos);
        self.counts.not += 1;
    }

    /// Inverts `target` if `control` is set.
    pub fn cnot(&mut self, control: usize, target: usize) {
        if self.bits.get(control) {
            self.bits.flip(target);
        }
        self.counts.cnot += 1;
    }

    /// Inverts `target` if both controls are set.
    pub fn toffoli(&mut self, control0: usize, control1: usize, target: usize) {
        if self.bits.get(control0) && self.bits.get(control1) {
            self.bits.flip(target);
        }
        self.counts.toffoli += 1;
    }

    /// Exchanges the bits at `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) {
        if self.bits.get(a) != self.bits.get(b) {
            self.bits.flip(a);
            self.bits.flip(b);
        }
        self.counts.swap += 1;
    }

    /// Exchanges the bits at `a` and `b` if `control` is set.
    pub fn fredkin(&mut self, control: usize, a: usize, b: usize) {
        if self.bits.get(control) && self.bits.get(a) != self.bits.get(b) {
            self.bits.flip(a);
            self.bits.flip(b);
        }
        self.counts.fredkin += 1;
    }

    /// Clears the usage counters. The bits are left untouched.
    pub fn reset_counts(&mut self) {
        self.counts = GateCounts::default();
    }
}

impl Display for BitCircuit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.bits.fmt(f)
    }
}
