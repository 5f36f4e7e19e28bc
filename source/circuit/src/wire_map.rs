// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Error;
use std::fmt::{self, Display, Formatter};

/// One entry of the relabeling table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot {
    /// The label currently resolves to this position in the live state.
    Active(usize),
    /// The label has been measured out of the state.
    Measured,
}

/// Maps original qudit labels to positions in a state that shrinks as qudits
/// are measured out.
///
/// Invariant: an active label's position is its label minus the number of
/// retired labels strictly below it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WireMap {
    slots: Vec<Slot>,
}

impl WireMap {
    /// The identity map over `len` labels.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        Self {
            slots: (0..len).map(Slot::Active).collect(),
        }
    }

    /// Number of labels, active or retired.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether `label` has been retired.
    #[must_use]
    pub fn is_retired(&self, label: usize) -> bool {
        matches!(self.slots.get(label), Some(Slot::Measured))
    }

    /// Number of labels still active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Active(_)))
            .count()
    }

    /// The current position of `label` in the live state.
    pub fn resolve(&self, label: usize) -> Result<usize, Error> {
        match self.slots.get(label) {
            Some(Slot::Active(position)) => Ok(*position),
            Some(Slot::Measured) => Err(Error::AlreadyMeasured { label }),
            None => Err(Error::QuditOutOfRange {
                label,
                num_qudits: self.slots.len(),
            }),
        }
    }

    /// Resolves each label, in order.
    pub fn resolve_all(&self, labels: &[usize]) -> Result<Vec<usize>, Error> {
        labels.iter().map(|&label| self.resolve(label)).collect()
    }

    /// Retires `label`: marks it measured and shifts every active position
    /// above its former position down by one. A failed attempt leaves the
    /// table unchanged.
    pub fn retire(&mut self, label: usize) -> Result<(), Error> {
        let retired = self.resolve(label)?;
        self.slots[label] = Slot::Measured;
        for slot in &mut self.slots {
            if let Slot::Active(position) = slot {
                if *position > retired {
                    *position -= 1;
                }
            }
        }
        Ok(())
    }

    /// The raw table, for diagnostics.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

impl Display for WireMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (label, slot) in self.slots.iter().enumerate() {
            if label > 0 {
                write!(f, ", ")?;
            }
            match slot {
                Slot::Active(position) => write!(f, "{label} -> {position}")?,
                Slot::Measured => write!(f, "{label} -> measured")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_the_identity() {
        let map = WireMap::identity(4);
        for label in 0..4 {
            assert_eq!(map.resolve(label), Ok(label));
            assert!(!map.is_retired(label));
        }
        assert_eq!(map.active_count(), 4);
    }

    #[test]
    fn active_positions_drop_by_the_retired_count_below() {
        let mut map = WireMap::identity(6);
        for label in [4, 1, 2] {
            map.retire(label).expect("label is active");
        }
        // Active labels: 0, 3, 5. Retired below them: 0, 2, 3 respectively.
        assert_eq!(map.resolve(0), Ok(0));
        assert_eq!(map.resolve(3), Ok(1));
        assert_eq!(map.resolve(5), Ok(2));
        assert_eq!(map.active_count(), 3);
        for label in [1, 2, 4] {
            assert_eq!(map.resolve(label), Err(Error::AlreadyMeasured { label }));
        }
    }

    #[test]
    fn retiring_twice_fails_and_leaves_the_table_unchanged() {
        let mut map = WireMap::identity(3);
        map.retire(1).expect("label is active");
        let before = map.clone();
        assert_eq!(map.retire(1), Err(Error::AlreadyMeasured { label: 1 }));
        assert_eq!(map, before);
    }

    #[test]
    fn out_of_range_labels_are_rejected() {
        let map = WireMap::identity(2);
        assert_eq!(
            map.resolve(2),
            Err(Error::QuditOutOfRange {
                label: 2,
                num_qudits: 2
            })
        );
    }

    #[test]
    fn resolve_all_keeps_the_label_order() {
        let mut map = WireMap::identity(5);
        map.retire(0).expect("label is active");
        assert_eq!(map.resolve_all(&[4, 1, 3]), Ok(vec![3, 0, 2]));
        assert_eq!(
            map.resolve_all(&[4, 0]),
            Err(Error::AlreadyMeasured { label: 0 })
        );
    }

    #[test]
    fn renders_as_text() {
        let mut map = WireMap::identity(3);
        map.retire(1).expect("label is active");
        assert_eq!(map.to_string(), "0 -> 0, 1 -> measured, 2 -> 1");
    }
}
