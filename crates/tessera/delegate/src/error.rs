use tessera_types::Principal;

/// Errors from the delegate's guarded transitions.
#[derive(Debug, thiserror::Error)]
pub enum DelegateError {
    #[error("already initialized")]
    AlreadyInitialized,
    #[error("access denied: {caller} is not the owning principal")]
    AccessDenied { caller: Principal },
}
