#![deny(unsafe_code)]
//! # tessera-delegate
//!
//! A stable-address indirection whose behavior is that of the currently
//! installed logic module, while persistent state lives in the delegate's
//! own storage and survives module swaps.
//!
//! Enforces:
//! - **One-shot setup** — `initialize` succeeds exactly once per delegate
//! - **Owner-gated swap** — only the owning principal may replace the module
//! - **Swap atomicity** — the module pointer write is finalized before any
//!   module code runs; no partial upgrades
//! - **Layout continuity** — slot order is the storage contract shared by
//!   every module version; evolution is additive-only

pub mod delegate;
pub mod error;
pub mod module;
pub mod storage;

pub use delegate::Delegate;
pub use error::DelegateError;
pub use module::{LogicModule, ModuleVersion, ValueModuleV1, ValueModuleV2};
pub use storage::SlotStorage;
