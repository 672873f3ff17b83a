//! Slot deck: the ordered, write-once result of a scheduling run.

use crate::error::ScheduleError;
use crate::types::{Fingerprint, GeneratorId};
use serde::Serialize;

/// Content committed to one slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommittedSlot<C> {
    pub slot_index: usize,
    pub generator: GeneratorId,
    pub seed: String,
    pub fingerprints: Vec<Fingerprint>,
    pub content: C,
}

#[derive(Debug, Clone)]
pub struct SlotDeck<C> {
    cells: Vec<Option<CommittedSlot<C>>>,
}

impl<C> SlotDeck<C> {
    pub fn new(total_slots: usize) -> Self {
        Self {
            cells: (0..total_slots).map(|_| None).collect(),
        }
    }

    pub fn total_slots(&self) -> usize {
        self.cells.len()
    }

    pub fn committed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_committed(&self, slot_index: usize) -> bool {
        matches!(self.cells.get(slot_index), Some(Some(_)))
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Indices not yet committed, ascending.
    pub fn pending(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn get(&self, slot_index: usize) -> Option<&CommittedSlot<C>> {
        self.cells.get(slot_index).and_then(Option::as_ref)
    }

    /// Write a slot exactly once. A second write, or an out-of-range index,
    /// is a scheduler bug.
    pub fn commit(&mut self, slot: CommittedSlot<C>) -> Result<(), ScheduleError> {
        let slot_index = slot.slot_index;
        let total = self.cells.len();
        let cell = self.cells.get_mut(slot_index).ok_or_else(|| {
            ScheduleError::InvariantViolation(format!(
                "slot {slot_index} is outside a deck of {total} slots"
            ))
        })?;
        if cell.is_some() {
            return Err(ScheduleError::InvariantViolation(format!(
                "slot {slot_index} is already committed"
            )));
        }
        *cell = Some(slot);
        Ok(())
    }

    /// Committed slots in index order. Fails unless every slot is committed.
    pub fn iter(&self) -> Result<impl Iterator<Item = &CommittedSlot<C>>, ScheduleError> {
        self.ensure_complete()?;
        Ok(self.cells.iter().flatten())
    }

    pub fn into_slots(self) -> Result<Vec<CommittedSlot<C>>, ScheduleError> {
        self.ensure_complete()?;
        Ok(self.cells.into_iter().flatten().collect())
    }

    fn ensure_complete(&self) -> Result<(), ScheduleError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ScheduleError::InvariantViolation(format!(
                "deck read before completion; pending slots {:?}",
                self.pending()
            )))
        }
    }
}
