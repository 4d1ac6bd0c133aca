//! Property tests: a principal's nonce advances by exactly one per
//! consumed grant — failed submissions never move it.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use tessera_crypto::{sign_grant, GrantMessage, Keypair};
use tessera_ledger::AuthorizationLedger;
use tessera_types::{Address, Amount, ContextId};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// One submission: the granted value, and whether the grant is unexpired.
fn arb_submission() -> impl Strategy<Value = (Amount, bool)> {
    (1u128..1_000_000_000, any::<bool>())
}

fn arb_submissions() -> impl Strategy<Value = Vec<(Amount, bool)>> {
    prop::collection::vec(arb_submission(), 1..12)
}

proptest! {
    #[test]
    fn nonce_counts_exactly_the_successful_grants(
        seed in any::<[u8; 32]>(),
        submissions in arb_submissions(),
    ) {
        let ledger = AuthorizationLedger::new(
            "Degen",
            "1",
            ContextId(31337),
            Address::derive(b"property-ledger"),
        );
        let owner = Keypair::from_seed(seed);
        let spender = Keypair::from_seed([0xA5u8; 32]).principal();

        let mut successes = 0u64;
        for (value, unexpired) in submissions {
            let deadline = if unexpired {
                Utc::now() + Duration::hours(1)
            } else {
                Utc::now() - Duration::hours(1)
            };
            let message = GrantMessage {
                owner: owner.principal(),
                spender,
                value,
                nonce: ledger.nonce_of(&owner.principal()),
                deadline,
            };
            let sig = sign_grant(&owner, ledger.domain(), &message);
            let result = ledger.permit(owner.principal(), spender, value, deadline, &sig);

            if unexpired {
                prop_assert!(result.is_ok());
                successes += 1;
                prop_assert_eq!(ledger.allowance(&owner.principal(), &spender), value);
            } else {
                prop_assert!(result.is_err());
            }
            prop_assert_eq!(ledger.nonce_of(&owner.principal()), successes);
        }
    }

    #[test]
    fn consumed_grants_never_replay(
        seed in any::<[u8; 32]>(),
        values in prop::collection::vec(1u128..1_000_000_000, 1..6),
    ) {
        let ledger = AuthorizationLedger::new(
            "Degen",
            "1",
            ContextId(31337),
            Address::derive(b"replay-ledger"),
        );
        let owner = Keypair::from_seed(seed);
        let spender = Keypair::from_seed([0x5Au8; 32]).principal();
        let deadline = Utc::now() + Duration::hours(1);

        let mut consumed = Vec::new();
        for value in values {
            let message = GrantMessage {
                owner: owner.principal(),
                spender,
                value,
                nonce: ledger.nonce_of(&owner.principal()),
                deadline,
            };
            let sig = sign_grant(&owner, ledger.domain(), &message);
            prop_assert!(ledger
                .permit(owner.principal(), spender, value, deadline, &sig)
                .is_ok());
            consumed.push((value, sig));
        }

        let nonce_after = ledger.nonce_of(&owner.principal());
        for (value, sig) in consumed {
            prop_assert!(ledger
                .permit(owner.principal(), spender, value, deadline, &sig)
                .is_err());
        }
        prop_assert_eq!(ledger.nonce_of(&owner.principal()), nonce_after);
    }
}
