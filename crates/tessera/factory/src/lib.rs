#![deny(unsafe_code)]
//! # tessera-factory
//!
//! Creates independently-owned asset token instances and makes them
//! discoverable through an append-only, index-addressable registry.
//!
//! Enforces:
//! - **Owner-gated creation** — only the factory's configured principal
//!   may deploy
//! - **Insertion order** — registry indices are assigned at append time
//!   and never reused or reordered
//! - **Atomic creation** — instance, registry entry, and deployment event
//!   are recorded together

pub mod error;
pub mod factory;
pub mod token;

pub use error::{FactoryError, TokenError};
pub use factory::{TokenDeployed, TokenFactory};
pub use token::AssetToken;
