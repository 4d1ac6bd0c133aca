use serde::{Deserialize, Serialize};
use tessera_types::Amount;

/// Ordered business-state slots owned by the delegate.
///
/// The slot order is the storage contract shared by every module version:
/// a new version may append slots, never reorder or retype existing ones.
/// Violating that corrupts state silently, so compatibility is a
/// deployment-time contract — there is no runtime layout check.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SlotStorage {
    slots: Vec<Amount>,
}

impl SlotStorage {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Read a slot. Slots never written read as zero.
    pub fn read(&self, slot: usize) -> Amount {
        self.slots.get(slot).copied().unwrap_or(0)
    }

    /// Write a slot, growing the layout with zero slots as needed.
    pub fn write(&mut self, slot: usize, value: Amount) {
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, 0);
        }
        self.slots[slot] = value;
    }

    /// Number of materialized slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
