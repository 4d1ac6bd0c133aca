//! End-to-end test: factory deployment, registry discovery, and the full
//! permit-then-spend path on a factory-deployed token.

use chrono::{Duration, Utc};
use tessera_crypto::{sign_grant, GrantMessage, Keypair};
use tessera_factory::{FactoryError, TokenFactory};
use tessera_types::ContextId;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn units(n: u128) -> u128 {
    n * 10u128.pow(18)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn two_deployments_registry_and_balances_agree() {
    let owner = Keypair::generate().principal();
    let factory = TokenFactory::new(owner, ContextId(31337));

    let a = factory
        .deploy_token(owner, "TokenA", "TKNA", units(500))
        .unwrap();
    let b = factory
        .deploy_token(owner, "TokenB", "TKNB", units(1000))
        .unwrap();

    assert_eq!(factory.token_count(), 2);
    assert_eq!(factory.token_at(0).unwrap(), a);
    assert_eq!(factory.token_at(1).unwrap(), b);
    assert_ne!(a, b);

    let token_a = factory.token(&a).unwrap();
    let token_b = factory.token(&b).unwrap();
    assert_eq!(token_a.balance_of(&owner), units(500));
    assert_eq!(token_b.balance_of(&owner), units(1000));

    // Every deployment event points at a registry entry, newest last.
    let events = factory.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].address, factory.token_at(factory.token_count() - 1).unwrap());
}

#[test]
fn non_owner_deployment_denied_without_side_effects() {
    let owner = Keypair::generate().principal();
    let outsider = Keypair::generate().principal();
    let factory = TokenFactory::new(owner, ContextId(31337));

    let result = factory.deploy_token(outsider, "UnauthorizedToken", "UNAUTH", units(1000));
    assert!(matches!(result, Err(FactoryError::AccessDenied { .. })));
    assert_eq!(factory.token_count(), 0);
    assert!(factory.events().is_empty());
}

#[test]
fn index_past_the_registry_is_not_found() {
    let owner = Keypair::generate().principal();
    let factory = TokenFactory::new(owner, ContextId(31337));
    factory.deploy_token(owner, "Solo", "SOLO", 1).unwrap();

    assert!(matches!(
        factory.token_at(1),
        Err(FactoryError::NotFound { index: 1, length: 1 })
    ));
}

#[test]
fn permit_and_spend_on_a_factory_token() {
    let owner = Keypair::generate();
    let spender = Keypair::generate();
    let recipient = Keypair::generate().principal();
    let factory = TokenFactory::new(owner.principal(), ContextId(31337));

    let address = factory
        .deploy_token(owner.principal(), "Degen", "DEGEN", units(1_000_000))
        .unwrap();
    let token = factory.token(&address).unwrap();

    let value = units(500);
    let deadline = Utc::now() + Duration::seconds(3600);
    let message = GrantMessage {
        owner: owner.principal(),
        spender: spender.principal(),
        value,
        nonce: token.nonce_of(&owner.principal()),
        deadline,
    };
    let sig = sign_grant(&owner, token.permit_domain(), &message);

    token
        .permit(owner.principal(), spender.principal(), value, deadline, &sig)
        .unwrap();
    assert_eq!(
        token.allowance(&owner.principal(), &spender.principal()),
        value
    );

    token
        .transfer_from(spender.principal(), owner.principal(), recipient, value)
        .unwrap();
    assert_eq!(token.balance_of(&recipient), value);
    assert_eq!(
        token.balance_of(&owner.principal()),
        units(1_000_000) - value
    );
    assert_eq!(token.allowance(&owner.principal(), &spender.principal()), 0);
}

#[test]
fn grants_do_not_cross_between_sibling_tokens() {
    let owner = Keypair::generate();
    let spender = Keypair::generate().principal();
    let factory = TokenFactory::new(owner.principal(), ContextId(31337));

    let a = factory
        .deploy_token(owner.principal(), "Twin", "TWN", units(100))
        .unwrap();
    let b = factory
        .deploy_token(owner.principal(), "Twin", "TWN", units(100))
        .unwrap();
    let token_a = factory.token(&a).unwrap();
    let token_b = factory.token(&b).unwrap();

    let deadline = Utc::now() + Duration::seconds(3600);
    let message = GrantMessage {
        owner: owner.principal(),
        spender,
        value: units(10),
        nonce: 0,
        deadline,
    };
    let sig = sign_grant(&owner, token_a.permit_domain(), &message);

    // Same name, same context, same fields — different token address.
    assert!(token_b
        .permit(owner.principal(), spender, units(10), deadline, &sig)
        .is_err());
    assert!(token_a
        .permit(owner.principal(), spender, units(10), deadline, &sig)
        .is_ok());
}

#[test]
fn mint_on_a_deployed_token_is_owner_gated() {
    let owner = Keypair::generate().principal();
    let outsider = Keypair::generate().principal();
    let factory = TokenFactory::new(owner, ContextId(31337));

    let address = factory
        .deploy_token(owner, "Mintable", "MNT", units(1))
        .unwrap();
    let token = factory.token(&address).unwrap();

    token.mint(owner, outsider, units(5)).unwrap();
    assert_eq!(token.balance_of(&outsider), units(5));
    assert_eq!(token.total_supply(), units(6));

    assert!(token.mint(outsider, outsider, units(5)).is_err());
    assert_eq!(token.total_supply(), units(6));
}
