#[path = "property/nonce_monotonicity.rs"]
mod nonce_monotonicity;

#[path = "property/registry_order.rs"]
mod registry_order;
