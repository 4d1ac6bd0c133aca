//! Property tests: the registry is append-only — indices are exactly
//! insertion order, and every lookup past the end is a named failure.

use proptest::prelude::*;
use tessera_crypto::Keypair;
use tessera_factory::{FactoryError, TokenFactory};
use tessera_types::{Amount, ContextId};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_deployment() -> impl Strategy<Value = (String, String, Amount)> {
    ("[A-Z][a-z]{2,9}", "[A-Z]{3,5}", 1u128..1_000_000_000)
}

fn arb_deployments() -> impl Strategy<Value = Vec<(String, String, Amount)>> {
    prop::collection::vec(arb_deployment(), 1..10)
}

proptest! {
    #[test]
    fn indices_are_insertion_order(deployments in arb_deployments()) {
        let owner = Keypair::from_seed([7u8; 32]).principal();
        let factory = TokenFactory::new(owner, ContextId(31337));

        let mut addresses = Vec::new();
        for (name, ticker, supply) in &deployments {
            let address = factory.deploy_token(owner, name, ticker, *supply).unwrap();
            addresses.push(address);
        }

        prop_assert_eq!(factory.token_count(), deployments.len());
        for (index, address) in addresses.iter().enumerate() {
            prop_assert_eq!(factory.token_at(index).unwrap(), *address);
            let token = factory.token(address).unwrap();
            prop_assert_eq!(token.name(), deployments[index].0.as_str());
            prop_assert_eq!(token.balance_of(&owner), deployments[index].2);
        }

        // Events mirror the registry, oldest first.
        let events = factory.events();
        prop_assert_eq!(events.len(), addresses.len());
        for (event, address) in events.iter().zip(&addresses) {
            prop_assert_eq!(event.address, *address);
        }

        let past_end = factory.token_at(deployments.len());
        let is_not_found = matches!(past_end, Err(FactoryError::NotFound { .. }));
        prop_assert!(is_not_found);
    }

    #[test]
    fn addresses_are_unique_across_any_sequence(deployments in arb_deployments()) {
        let owner = Keypair::from_seed([8u8; 32]).principal();
        let factory = TokenFactory::new(owner, ContextId(31337));

        let mut addresses = Vec::new();
        for (name, ticker, supply) in &deployments {
            addresses.push(factory.deploy_token(owner, name, ticker, *supply).unwrap());
        }
        let mut deduped = addresses.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), addresses.len());
    }
}
