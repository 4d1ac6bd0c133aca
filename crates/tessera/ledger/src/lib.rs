//! Tessera authorization ledger.
//!
//! Lets a principal grant another principal an allowance without submitting
//! the call themselves: the owner signs a domain-separated grant off-path,
//! and anyone may present it to `permit`. Consuming a grant increments the
//! owner's nonce, so each signature is good for at most one consumption —
//! a replay reconstructs against the new nonce and fails recovery.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use tessera_crypto::{
    DomainSeparator, Ed25519Verifier, GrantMessage, GrantSignature, GrantVerifier,
};
use tessera_types::{Address, Amount, ContextId, Principal};
use thiserror::Error;

/// Per-principal nonce counters and allowances, guarded by signed grants.
///
/// Owns its maps exclusively; no other component writes them. Every entry
/// point runs to completion — an operation either commits all of its writes
/// or none of them.
pub struct AuthorizationLedger {
    domain: DomainSeparator,
    verifier: Box<dyn GrantVerifier>,
    nonces: RwLock<HashMap<Principal, u64>>,
    allowances: RwLock<HashMap<(Principal, Principal), Amount>>,
}

impl AuthorizationLedger {
    /// Create a ledger verifying grants under the given domain.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        context: ContextId,
        address: Address,
    ) -> Self {
        Self {
            domain: DomainSeparator::new(name, version, context, address),
            verifier: Box::new(Ed25519Verifier),
            nonces: RwLock::new(HashMap::new()),
            allowances: RwLock::new(HashMap::new()),
        }
    }

    /// Swap in a different signature scheme.
    pub fn with_verifier(mut self, verifier: impl GrantVerifier + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    /// The domain grants must be signed under to verify here.
    pub fn domain(&self) -> &DomainSeparator {
        &self.domain
    }

    /// Current nonce for a principal (zero before any grant is consumed).
    ///
    /// This is the value an owner must sign over for their next grant.
    pub fn nonce_of(&self, owner: &Principal) -> u64 {
        let nonces = self.nonces.read().expect("lock not poisoned");
        nonces.get(owner).copied().unwrap_or(0)
    }

    /// Current allowance for a (owner, spender) pair (zero-default).
    pub fn allowance(&self, owner: &Principal, spender: &Principal) -> Amount {
        let allowances = self.allowances.read().expect("lock not poisoned");
        allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Consume a signed grant: set the allowance, advance the nonce.
    ///
    /// The grant is reconstructed with the owner's *current* nonce; the
    /// increment lands together with the allowance write, after every
    /// check has passed.
    pub fn permit(
        &self,
        owner: Principal,
        spender: Principal,
        value: Amount,
        deadline: DateTime<Utc>,
        signature: &GrantSignature,
    ) -> Result<(), PermitError> {
        if Utc::now() > deadline {
            return Err(PermitError::ExpiredSignature { deadline });
        }

        let nonce = self.nonce_of(&owner);
        let message = GrantMessage {
            owner,
            spender,
            value,
            nonce,
            deadline,
        };

        let recovered = self
            .verifier
            .recover(&self.domain, &message, signature)
            .map_err(|e| PermitError::InvalidSignature(e.to_string()))?;
        if recovered != owner {
            return Err(PermitError::InvalidSignature(
                "recovered signer does not match owner".into(),
            ));
        }

        // Both writes commit together; nothing was mutated before this point.
        let mut allowances = self.allowances.write().expect("lock not poisoned");
        let mut nonces = self.nonces.write().expect("lock not poisoned");
        allowances.insert((owner, spender), value);
        *nonces.entry(owner).or_insert(0) += 1;

        tracing::debug!(
            owner = %owner,
            spender = %spender,
            value,
            nonce,
            "grant consumed"
        );
        Ok(())
    }

    /// Direct-call allowance path: same write, no signature, caller is the
    /// owner by construction. Last writer wins; values do not accumulate.
    pub fn approve(&self, owner: Principal, spender: Principal, value: Amount) {
        let mut allowances = self.allowances.write().expect("lock not poisoned");
        allowances.insert((owner, spender), value);
        tracing::debug!(owner = %owner, spender = %spender, value, "allowance set");
    }

    /// Deduct from an allowance, failing before any write on shortfall.
    pub fn spend_allowance(
        &self,
        owner: &Principal,
        spender: &Principal,
        amount: Amount,
    ) -> Result<(), PermitError> {
        let mut allowances = self.allowances.write().expect("lock not poisoned");
        let available = allowances.get(&(*owner, *spender)).copied().unwrap_or(0);
        if available < amount {
            return Err(PermitError::InsufficientAllowance {
                needed: amount,
                available,
            });
        }
        allowances.insert((*owner, *spender), available - amount);
        Ok(())
    }
}

/// Errors from the permit protocol.
#[derive(Debug, Error)]
pub enum PermitError {
    #[error("signature expired: deadline {deadline} has passed")]
    ExpiredSignature { deadline: DateTime<Utc> },
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: Amount, available: Amount },
}
