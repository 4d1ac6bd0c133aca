use crate::error::DelegateError;
use crate::module::{LogicModule, ModuleVersion};
use crate::storage::SlotStorage;
use std::sync::{Arc, RwLock};
use tessera_types::{Address, Amount, Principal};

/// Control-plane state: the active module pointer, the owning principal,
/// and the one-shot initialization flag. Kept behind a single lock so a
/// guard check and the write it guards commit together.
struct ControlState {
    active: Arc<dyn LogicModule>,
    owner: Option<Principal>,
    initialized: bool,
}

/// A stable-address indirection over a swappable logic module.
///
/// The delegate owns the business storage; modules only ever operate on
/// storage lent to them per call. Swapping the module leaves every slot
/// in place, which is what makes state survive upgrades.
pub struct Delegate {
    address: Address,
    control: RwLock<ControlState>,
    storage: RwLock<SlotStorage>,
}

impl Delegate {
    /// Deploy a delegate with its initial module, not yet initialized.
    pub fn new(address: Address, initial_module: Arc<dyn LogicModule>) -> Self {
        Self {
            address,
            control: RwLock::new(ControlState {
                active: initial_module,
                owner: None,
                initialized: false,
            }),
            storage: RwLock::new(SlotStorage::new()),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// One-shot setup: record the owning principal.
    ///
    /// Separate from construction because delegate storage must exist
    /// before any module writes into it, and because one module value
    /// serves many delegates — it cannot carry a baked-in owner.
    pub fn initialize(&self, owner: Principal) -> Result<(), DelegateError> {
        let mut control = self.control.write().expect("lock not poisoned");
        if control.initialized {
            return Err(DelegateError::AlreadyInitialized);
        }
        control.owner = Some(owner);
        control.initialized = true;
        tracing::debug!(delegate = %self.address, owner = %owner, "delegate initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.control.read().expect("lock not poisoned").initialized
    }

    pub fn owner(&self) -> Option<Principal> {
        self.control.read().expect("lock not poisoned").owner
    }

    /// Version of the currently active module.
    pub fn module_version(&self) -> ModuleVersion {
        self.control.read().expect("lock not poisoned").active.version()
    }

    /// Forwarded business write.
    pub fn set_value(&self, value: Amount) {
        let module = self.active_module();
        let mut storage = self.storage.write().expect("lock not poisoned");
        module.set_value(&mut storage, value);
    }

    /// Forwarded business read.
    pub fn get_value(&self) -> Amount {
        let module = self.active_module();
        let storage = self.storage.read().expect("lock not poisoned");
        module.get_value(&storage)
    }

    /// Run a module-specific read against the delegate's storage.
    pub fn inspect<R>(&self, f: impl FnOnce(&SlotStorage) -> R) -> R {
        let storage = self.storage.read().expect("lock not poisoned");
        f(&storage)
    }

    /// Swap the active module. Owner-gated; repeatable; storage untouched.
    ///
    /// The pointer write is finalized and the control lock released before
    /// `on_install` runs, so module code that calls back into the delegate
    /// observes only the committed swap.
    pub fn upgrade(
        &self,
        caller: Principal,
        new_module: Arc<dyn LogicModule>,
    ) -> Result<(), DelegateError> {
        let installed = {
            let mut control = self.control.write().expect("lock not poisoned");
            match control.owner {
                Some(owner) if owner == caller => {}
                _ => return Err(DelegateError::AccessDenied { caller }),
            }
            control.active = Arc::clone(&new_module);
            control.active.version()
        };

        {
            let mut storage = self.storage.write().expect("lock not poisoned");
            new_module.on_install(&mut storage);
        }

        tracing::info!(delegate = %self.address, version = %installed, "module swapped");
        Ok(())
    }

    fn active_module(&self) -> Arc<dyn LogicModule> {
        Arc::clone(&self.control.read().expect("lock not poisoned").active)
    }
}
