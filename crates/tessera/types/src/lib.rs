//! Tessera shared types — principals, component addresses, amounts.
//!
//! Identity is hash-shaped on purpose: a `Principal` is derived from key
//! material, never the raw key, and an `Address` names one component
//! instance (a delegate, a ledger, a factory, a token) for its lifetime.

#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value amounts, in minor units. Wide enough for 18-decimal supplies.
pub type Amount = u128;

/// Execution-context identifier bound into every signing domain.
///
/// Two contexts never share signatures: a grant signed for context 1
/// does not verify in context 2 even against the same ledger fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(pub u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx:{}", self.0)
    }
}

/// A principal — an opaque identity key (BLAKE3, 32 bytes).
///
/// Derived from identity material (an Ed25519 verifying key under a domain
/// tag) by `tessera-crypto`. Identity equality only; no mutable attributes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal(pub [u8; 32]);

impl Principal {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, IdParseError> {
        Ok(Self(hex_decode(hex)?))
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", &self.to_hex()[..12])
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pr:{}", &self.to_hex()[..16])
    }
}

impl Serialize for Principal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Principal::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// A component-instance address (BLAKE3, 32 bytes).
///
/// Stable for the lifetime of the instance it names. Derived addresses are
/// deterministic in their material; ephemeral addresses are deploy-time
/// random and never collide in practice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive an address from arbitrary material under the address tag.
    pub fn derive(material: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tessera-address-v1:");
        hasher.update(material);
        Self(*hasher.finalize().as_bytes())
    }

    /// Deploy-time random address. Each call produces a distinct value.
    pub fn ephemeral() -> Self {
        let mut material = [0u8; 32];
        material[..16].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
        material[16..].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
        Self::derive(&material)
    }

    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, IdParseError> {
        Ok(Self(hex_decode(hex)?))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_hex()[..12])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ad:{}", &self.to_hex()[..16])
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Address::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid hex length: {0} (expected 64)")]
    InvalidLength(usize),
    #[error("invalid hex character")]
    InvalidHex,
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(hex: &str) -> Result<[u8; 32], IdParseError> {
    if hex.len() != 64 {
        return Err(IdParseError::InvalidLength(hex.len()));
    }
    let mut bytes = [0u8; 32];
    for i in 0..32 {
        bytes[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| IdParseError::InvalidHex)?;
    }
    Ok(bytes)
}
