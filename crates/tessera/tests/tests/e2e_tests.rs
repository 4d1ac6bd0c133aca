#[path = "e2e/delegate_lifecycle.rs"]
mod delegate_lifecycle;

#[path = "e2e/permit_lifecycle.rs"]
mod permit_lifecycle;

#[path = "e2e/factory_lifecycle.rs"]
mod factory_lifecycle;
