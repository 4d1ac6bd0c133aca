use crate::error::FactoryError;
use crate::token::AssetToken;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tessera_types::{Address, Amount, ContextId, Principal};

/// Creation notification emitted once per deployed instance. The only
/// discovery mechanism besides polling the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDeployed {
    pub address: Address,
}

/// Owner-gated factory over an append-only token registry.
///
/// Registry order is strictly insertion order; indices are assigned at
/// append time and never reused. Two instances sharing a name or ticker
/// are both kept — addresses, not names, identify tokens.
pub struct TokenFactory {
    address: Address,
    owner: Principal,
    context: ContextId,
    tokens: RwLock<Vec<Arc<AssetToken>>>,
    by_address: RwLock<HashMap<Address, Arc<AssetToken>>>,
    events: RwLock<Vec<TokenDeployed>>,
}

impl TokenFactory {
    /// Deploy a factory owned by the given principal.
    pub fn new(owner: Principal, context: ContextId) -> Self {
        Self::with_address(Address::ephemeral(), owner, context)
    }

    pub fn with_address(address: Address, owner: Principal, context: ContextId) -> Self {
        Self {
            address,
            owner,
            context,
            tokens: RwLock::new(Vec::new()),
            by_address: RwLock::new(HashMap::new()),
            events: RwLock::new(Vec::new()),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Principal {
        self.owner
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Create a new token instance, credit the full supply to the caller,
    /// and append it to the registry. Instance, registry entry, and
    /// deployment event are recorded together.
    pub fn deploy_token(
        &self,
        caller: Principal,
        name: &str,
        ticker: &str,
        supply: Amount,
    ) -> Result<Address, FactoryError> {
        if caller != self.owner {
            return Err(FactoryError::AccessDenied { caller });
        }

        let mut tokens = self.tokens.write().expect("lock not poisoned");
        let mut by_address = self.by_address.write().expect("lock not poisoned");
        let mut events = self.events.write().expect("lock not poisoned");

        let index = tokens.len();
        let address = self.token_address(index, name);
        let token = Arc::new(AssetToken::new(
            address,
            name,
            ticker,
            self.context,
            caller,
            supply,
        ));

        tokens.push(Arc::clone(&token));
        by_address.insert(address, token);
        events.push(TokenDeployed { address });

        tracing::info!(
            factory = %self.address,
            token = %address,
            name,
            ticker,
            supply,
            index,
            "token deployed"
        );
        Ok(address)
    }

    /// Current registry length.
    pub fn token_count(&self) -> usize {
        self.tokens.read().expect("lock not poisoned").len()
    }

    /// Address at a registry index.
    pub fn token_at(&self, index: usize) -> Result<Address, FactoryError> {
        let tokens = self.tokens.read().expect("lock not poisoned");
        tokens
            .get(index)
            .map(|t| t.address())
            .ok_or(FactoryError::NotFound {
                index,
                length: tokens.len(),
            })
    }

    /// Look up an instance by address.
    pub fn token(&self, address: &Address) -> Option<Arc<AssetToken>> {
        let by_address = self.by_address.read().expect("lock not poisoned");
        by_address.get(address).cloned()
    }

    /// Deployment events, oldest first.
    pub fn events(&self) -> Vec<TokenDeployed> {
        self.events.read().expect("lock not poisoned").clone()
    }

    /// Deterministic instance address: factory address, registry index,
    /// and name, in that order.
    fn token_address(&self, index: usize, name: &str) -> Address {
        let mut material = Vec::with_capacity(32 + 8 + name.len());
        material.extend_from_slice(self.address.as_bytes());
        material.extend_from_slice(&(index as u64).to_le_bytes());
        material.extend_from_slice(name.as_bytes());
        Address::derive(&material)
    }
}
