//! Tessera cryptographic verifier.
//!
//! Stateless signature machinery for the authorization ledger: Ed25519
//! keypairs, domain-separated grant digests, and signer recovery. The
//! verifier is a capability (`GrantVerifier`) so the ledger stays
//! independent of the concrete scheme.
//!
//! Ed25519 has no key recovery, so a `GrantSignature` carries the signer's
//! verifying key alongside the signature; "recovery" verifies against that
//! key and derives the principal from it. A forged key yields a different
//! principal and fails the ledger's owner comparison.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tessera_types::{Address, Amount, ContextId, Principal};
use zeroize::Zeroize;

/// An Ed25519 signing pair owned by one principal.
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the system RNG.
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut seed);
        let signing = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Self { signing }
    }

    /// Deterministic keypair from a 32-byte seed. The seed copy is wiped.
    pub fn from_seed(mut seed: [u8; 32]) -> Self {
        let signing = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Self { signing }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }

    /// The principal this keypair acts as.
    pub fn principal(&self) -> Principal {
        principal_of(&self.verifying_key())
    }
}

/// Derive the principal identity for an Ed25519 verifying key.
///
/// The principal is the tagged BLAKE3 hash of the key, not the key itself.
pub fn principal_of(key: &VerifyingKey) -> Principal {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"tessera-principal-v1:");
    hasher.update(b"ed25519:");
    hasher.update(key.as_bytes());
    Principal::from_bytes(*hasher.finalize().as_bytes())
}

/// Binding data mixed into every grant digest.
///
/// Scopes a signature to exactly one verifying component: same fields,
/// different ledger address — different digest, different signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSeparator {
    /// System name (for a token ledger, the token name).
    pub name: String,
    /// Version string of the signing scheme ("1" unless re-keyed).
    pub version: String,
    /// Execution-context identifier.
    pub context: ContextId,
    /// Address of the component that verifies grants under this domain.
    pub verifying_address: Address,
}

impl DomainSeparator {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        context: ContextId,
        verifying_address: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            context,
            verifying_address,
        }
    }

    /// Tagged BLAKE3 hash of the domain fields.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tessera-domain-v1:");
        // Strings are length-prefixed so field boundaries cannot collide.
        hasher.update(&(self.name.len() as u32).to_le_bytes());
        hasher.update(self.name.as_bytes());
        hasher.update(&(self.version.len() as u32).to_le_bytes());
        hasher.update(self.version.as_bytes());
        hasher.update(&self.context.0.to_le_bytes());
        hasher.update(self.verifying_address.as_bytes());
        *hasher.finalize().as_bytes()
    }
}

/// The structured message a grant signature covers.
///
/// Field order is fixed: owner, spender, value, nonce, deadline. The nonce
/// is the owner's counter value at signing time; consuming the grant
/// increments it, which is what makes the signature single-use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantMessage {
    pub owner: Principal,
    pub spender: Principal,
    pub value: Amount,
    pub nonce: u64,
    pub deadline: DateTime<Utc>,
}

impl GrantMessage {
    /// Tagged BLAKE3 digest of the message under a domain.
    pub fn digest(&self, domain: &DomainSeparator) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tessera-grant-v1:");
        hasher.update(&domain.hash());
        hasher.update(self.owner.as_bytes());
        hasher.update(self.spender.as_bytes());
        hasher.update(&self.value.to_le_bytes());
        hasher.update(&self.nonce.to_le_bytes());
        hasher.update(&self.deadline.timestamp().to_le_bytes());
        *hasher.finalize().as_bytes()
    }
}

/// A detached grant signature: the signer's verifying key plus the Ed25519
/// signature over the grant digest, both hex-encoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSignature {
    pub public_key: String,
    pub signature: String,
}

/// Sign a grant off-path with the owner's keypair.
pub fn sign_grant(
    keypair: &Keypair,
    domain: &DomainSeparator,
    message: &GrantMessage,
) -> GrantSignature {
    let signature = keypair.signing.sign(&message.digest(domain));
    GrantSignature {
        public_key: hex_encode(keypair.verifying_key().as_bytes()),
        signature: hex_encode(signature.to_bytes().as_slice()),
    }
}

/// Verifier capability: recover a signer identity from a structured message
/// and a signature, or fail.
pub trait GrantVerifier: Send + Sync {
    fn recover(
        &self,
        domain: &DomainSeparator,
        message: &GrantMessage,
        signature: &GrantSignature,
    ) -> Result<Principal, SignatureError>;
}

/// The default Ed25519 verifier.
pub struct Ed25519Verifier;

impl GrantVerifier for Ed25519Verifier {
    fn recover(
        &self,
        domain: &DomainSeparator,
        message: &GrantMessage,
        signature: &GrantSignature,
    ) -> Result<Principal, SignatureError> {
        let pk_bytes = hex_decode(&signature.public_key)
            .map_err(|_| SignatureError::MalformedKey)?;
        let sig_bytes = hex_decode(&signature.signature)
            .map_err(|_| SignatureError::MalformedSignature)?;

        let pk_array: [u8; 32] = pk_bytes
            .as_slice()
            .try_into()
            .map_err(|_| SignatureError::MalformedKey)?;
        let sig_array: [u8; 64] = sig_bytes
            .as_slice()
            .try_into()
            .map_err(|_| SignatureError::MalformedSignature)?;

        let verifying_key =
            VerifyingKey::from_bytes(&pk_array).map_err(|_| SignatureError::MalformedKey)?;
        let sig = Signature::from_bytes(&sig_array);

        verifying_key
            .verify(&message.digest(domain), &sig)
            .map_err(|_| SignatureError::VerificationFailed)?;

        Ok(principal_of(&verifying_key))
    }
}

/// Errors from signature recovery.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("malformed verifying key")]
    MalformedKey,
    #[error("malformed signature")]
    MalformedSignature,
    #[error("signature verification failed")]
    VerificationFailed,
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    if hex.len() % 2 != 0 {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}
