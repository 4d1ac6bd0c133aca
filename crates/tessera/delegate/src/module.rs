use crate::storage::SlotStorage;
use serde::{Deserialize, Serialize};
use std::fmt;
use tessera_types::Amount;

/// Slot assignments shared by every module version. Additive-only: a new
/// version may claim the next free index, never repurpose an existing one.
pub const VALUE_SLOT: usize = 0;
pub const WRITE_COUNT_SLOT: usize = 1;

/// Version identifier for a logic module.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleVersion(pub String);

impl ModuleVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A versioned bundle of business logic over the delegate's slot layout.
///
/// Modules are immutable once deployed — a new version is a new module,
/// never an in-place edit. The same module value may serve many delegate
/// instances, which is why it holds no owner and no state of its own.
pub trait LogicModule: Send + Sync {
    fn version(&self) -> ModuleVersion;

    /// Write the business value into the delegate's storage.
    fn set_value(&self, storage: &mut SlotStorage, value: Amount);

    /// Read the business value from the delegate's storage.
    fn get_value(&self, storage: &SlotStorage) -> Amount;

    /// Hook invoked once this module has become the active one. The
    /// delegate finalizes the pointer swap before calling it, so any
    /// re-entrant call from here observes the completed upgrade.
    fn on_install(&self, _storage: &mut SlotStorage) {}
}

/// First-generation value module: a single value slot.
pub struct ValueModuleV1;

impl LogicModule for ValueModuleV1 {
    fn version(&self) -> ModuleVersion {
        ModuleVersion::new("v1")
    }

    fn set_value(&self, storage: &mut SlotStorage, value: Amount) {
        storage.write(VALUE_SLOT, value);
    }

    fn get_value(&self, storage: &SlotStorage) -> Amount {
        storage.read(VALUE_SLOT)
    }
}

/// Second-generation value module: keeps the value slot where v1 put it
/// and appends a write counter in the next slot.
pub struct ValueModuleV2;

impl ValueModuleV2 {
    /// Number of writes performed since this module (or a successor
    /// sharing the slot) started counting.
    pub fn write_count(storage: &SlotStorage) -> Amount {
        storage.read(WRITE_COUNT_SLOT)
    }
}

impl LogicModule for ValueModuleV2 {
    fn version(&self) -> ModuleVersion {
        ModuleVersion::new("v2")
    }

    fn set_value(&self, storage: &mut SlotStorage, value: Amount) {
        storage.write(VALUE_SLOT, value);
        let count = storage.read(WRITE_COUNT_SLOT);
        storage.write(WRITE_COUNT_SLOT, count + 1);
    }

    fn get_value(&self, storage: &SlotStorage) -> Amount {
        storage.read(VALUE_SLOT)
    }
}
