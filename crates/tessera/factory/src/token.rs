use crate::error::TokenError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use tessera_crypto::GrantSignature;
use tessera_ledger::{AuthorizationLedger, PermitError};
use tessera_types::{Address, Amount, ContextId, Principal};

/// An independently-owned token instance.
///
/// Name, symbol, and owning principal are fixed at construction and never
/// reassigned. Each instance carries its own permit ledger, so allowances
/// and nonces are scoped to this token's address — a grant signed for one
/// token never verifies on another.
pub struct AssetToken {
    address: Address,
    name: String,
    symbol: String,
    decimals: u8,
    owner: Principal,
    total_supply: RwLock<Amount>,
    balances: RwLock<HashMap<Principal, Amount>>,
    permits: AuthorizationLedger,
}

impl AssetToken {
    /// Construct with the full initial supply credited to the owner.
    pub(crate) fn new(
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        context: ContextId,
        owner: Principal,
        supply: Amount,
    ) -> Self {
        let name = name.into();
        let mut balances = HashMap::new();
        balances.insert(owner, supply);
        Self {
            permits: AuthorizationLedger::new(name.clone(), "1", context, address),
            address,
            name,
            symbol: symbol.into(),
            decimals: 18,
            owner,
            total_supply: RwLock::new(supply),
            balances: RwLock::new(balances),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn owner(&self) -> Principal {
        self.owner
    }

    pub fn total_supply(&self) -> Amount {
        *self.total_supply.read().expect("lock not poisoned")
    }

    /// Balance for a principal (zero-default).
    pub fn balance_of(&self, principal: &Principal) -> Amount {
        let balances = self.balances.read().expect("lock not poisoned");
        balances.get(principal).copied().unwrap_or(0)
    }

    /// Owner-gated issuance: credit `to` and grow the supply together.
    pub fn mint(&self, caller: Principal, to: Principal, amount: Amount) -> Result<(), TokenError> {
        if caller != self.owner {
            return Err(TokenError::AccessDenied { caller });
        }
        let mut supply = self.total_supply.write().expect("lock not poisoned");
        let mut balances = self.balances.write().expect("lock not poisoned");
        *supply += amount;
        *balances.entry(to).or_insert(0) += amount;
        tracing::debug!(token = %self.address, to = %to, amount, "minted");
        Ok(())
    }

    /// Move balance between principals; debit and credit land together.
    pub fn transfer(
        &self,
        from: Principal,
        to: Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let mut balances = self.balances.write().expect("lock not poisoned");
        let available = balances.get(&from).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        balances.insert(from, available - amount);
        *balances.entry(to).or_insert(0) += amount;
        tracing::debug!(token = %self.address, from = %from, to = %to, amount, "transferred");
        Ok(())
    }

    /// Direct-call allowance path.
    pub fn approve(&self, owner: Principal, spender: Principal, amount: Amount) {
        self.permits.approve(owner, spender, amount);
    }

    pub fn allowance(&self, owner: &Principal, spender: &Principal) -> Amount {
        self.permits.allowance(owner, spender)
    }

    /// Current permit nonce for a principal on this token.
    pub fn nonce_of(&self, owner: &Principal) -> u64 {
        self.permits.nonce_of(owner)
    }

    /// Consume an off-path signed grant against this token's domain.
    pub fn permit(
        &self,
        owner: Principal,
        spender: Principal,
        value: Amount,
        deadline: DateTime<Utc>,
        signature: &GrantSignature,
    ) -> Result<(), PermitError> {
        self.permits.permit(owner, spender, value, deadline, signature)
    }

    /// The domain grants for this token must be signed under.
    pub fn permit_domain(&self) -> &tessera_crypto::DomainSeparator {
        self.permits.domain()
    }

    /// Spend an allowance and move the balance. The allowance check and
    /// the balance writes happen under the balance lock, so a shortfall
    /// on either side aborts with nothing changed.
    pub fn transfer_from(
        &self,
        spender: Principal,
        owner: Principal,
        to: Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let mut balances = self.balances.write().expect("lock not poisoned");
        let available = balances.get(&owner).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.permits.spend_allowance(&owner, &spender, amount)?;
        balances.insert(owner, available - amount);
        *balances.entry(to).or_insert(0) += amount;
        tracing::debug!(
            token = %self.address,
            spender = %spender,
            owner = %owner,
            to = %to,
            amount,
            "transferred from allowance"
        );
        Ok(())
    }
}
