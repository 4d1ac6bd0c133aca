use tessera_ledger::PermitError;
use tessera_types::{Amount, Principal};

/// Errors from the factory's guarded entry points.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("access denied: {caller} is not the factory owner")]
    AccessDenied { caller: Principal },
    #[error("no token at index {index} (registry length {length})")]
    NotFound { index: usize, length: usize },
}

/// Errors from individual token instances.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("access denied: {caller} is not the token owner")]
    AccessDenied { caller: Principal },
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },
    #[error(transparent)]
    Permit(#[from] PermitError),
}
