use proptest::prelude::*;

use duo_store::{Account, AccountStatistics, MemoryStore, Membership, ObjectStore, UndoableStore};
use duo_types::{AccountId, AssetAmount, AssetId};

#[derive(Clone, Debug)]
enum Change {
    CreateAccount,
    Credit(u64, i64),
    Upgrade(u64),
    Remove(u64),
    Budget(i64),
}

fn change() -> impl Strategy<Value = Change> {
    prop_oneof![
        Just(Change::CreateAccount),
        (0u64..6, 1i64..1_000).prop_map(|(i, n)| Change::Credit(i, n)),
        (0u64..6).prop_map(Change::Upgrade),
        (0u64..6).prop_map(Change::Remove),
        (0i64..1_000).prop_map(Change::Budget),
    ]
}

fn apply(store: &mut MemoryStore, change: &Change) {
    match change {
        Change::CreateAccount => {
            let owner = AccountId::new(store.ids::<Account>().len() as u64);
            let statistics = store.create(|id| AccountStatistics::new(id, owner));
            store.create(|id| Account {
                id,
                name: format!("acct{}", id.instance()),
                statistics,
                membership: Membership::Basic,
            });
        }
        Change::Credit(i, n) => {
            let id = duo_types::AccountStatisticsId::new(*i);
            let _ = store.try_modify(id, |s: &mut AccountStatistics| s.adjust_balance(AssetAmount::core(*n)));
        }
        Change::Upgrade(i) => {
            let _ = store.modify::<Account>(AccountId::new(*i), |a| a.membership = Membership::Lifetime);
        }
        Change::Remove(i) => {
            let _ = store.remove::<Account>(AccountId::new(*i));
        }
        Change::Budget(n) => store.modify_dynamic_properties(|d| d.witness_budget = *n),
    }
}

fn snapshot(store: &MemoryStore) -> (Vec<Account>, Vec<(u64, i64)>, i64) {
    let accounts = store
        .ids::<Account>()
        .into_iter()
        .filter_map(|id| store.find::<Account>(id).cloned())
        .collect();
    let balances = store
        .ids::<AccountStatistics>()
        .into_iter()
        .filter_map(|id| store.find::<AccountStatistics>(id))
        .map(|s| (s.id.instance(), s.balance(AssetId::CORE)))
        .collect();
    (accounts, balances, store.dynamic_properties().witness_budget)
}

proptest! {
    /// Rolling back a session restores exactly the state before it began.
    #[test]
    fn rollback_restores_snapshot(
        before in prop::collection::vec(change(), 0..10),
        during in prop::collection::vec(change(), 0..20),
    ) {
        let mut store = MemoryStore::new();
        for c in &before {
            apply(&mut store, c);
        }
        let expected = snapshot(&store);

        store.begin_session();
        for c in &during {
            apply(&mut store, c);
        }
        store.rollback_session().unwrap();

        prop_assert_eq!(snapshot(&store), expected);
        prop_assert_eq!(store.session_depth(), 0);
    }

    /// Committing an inner session then rolling back the outer one also
    /// restores the original state.
    #[test]
    fn outer_rollback_undoes_committed_inner(
        outer in prop::collection::vec(change(), 0..10),
        inner in prop::collection::vec(change(), 0..10),
    ) {
        let mut store = MemoryStore::new();
        apply(&mut store, &Change::CreateAccount);
        let expected = snapshot(&store);

        store.begin_session();
        for c in &outer {
            apply(&mut store, c);
        }
        store.begin_session();
        for c in &inner {
            apply(&mut store, c);
        }
        store.commit_session().unwrap();
        store.rollback_session().unwrap();

        prop_assert_eq!(snapshot(&store), expected);
    }
}
