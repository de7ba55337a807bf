//! Typed object tables.

use crate::account::{Account, AccountStatistics};
use crate::objects::{Asset, Witness};
use duo_types::{AccountId, AccountStatisticsId, AssetId, ObjectId, VestingBalanceId, WitnessId};
use duo_vesting::VestingBalance;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// An entity kept in its own table, keyed by a typed id.
pub trait StoredObject: Clone + Debug + 'static {
    type Id: Copy + Ord + Debug + From<u64> + Into<ObjectId> + 'static;

    fn id(&self) -> Self::Id;

    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;
}

/// One table: objects in id order plus the next instance number to hand out.
#[derive(Clone, Debug)]
pub struct Table<T: StoredObject> {
    pub objects: BTreeMap<T::Id, T>,
    pub next_instance: u64,
}

impl<T: StoredObject> Default for Table<T> {
    fn default() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_instance: 0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub accounts: Table<Account>,
    pub statistics: Table<AccountStatistics>,
    pub assets: Table<Asset>,
    pub vesting_balances: Table<VestingBalance>,
    pub witnesses: Table<Witness>,
}

macro_rules! stored_object {
    ($ty:ty, $id:ty, $field:ident) => {
        impl StoredObject for $ty {
            type Id = $id;

            fn id(&self) -> $id {
                self.id
            }

            fn table(tables: &Tables) -> &Table<Self> {
                &tables.$field
            }

            fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
                &mut tables.$field
            }
        }
    };
}

stored_object!(Account, AccountId, accounts);
stored_object!(AccountStatistics, AccountStatisticsId, statistics);
stored_object!(Asset, AssetId, assets);
stored_object!(VestingBalance, VestingBalanceId, vesting_balances);
stored_object!(Witness, WitnessId, witnesses);
