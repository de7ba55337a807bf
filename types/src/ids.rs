//! Object identifiers.
//!
//! Every ledger entity is addressed by a typed instance number. The display
//! form is `space.type.instance`, so an account prints as `1.2.17` and its
//! statistics record as `2.6.17`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident, $space:literal, $type_id:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub const SPACE: u8 = $space;
            pub const TYPE_ID: u8 = $type_id;

            pub const fn new(instance: u64) -> Self {
                Self(instance)
            }

            pub const fn instance(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(instance: u64) -> Self {
                Self(instance)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", $space, $type_id, self.0)
            }
        }
    };
}

object_id!(
    /// A registered account.
    AccountId, 1, 2
);
object_id!(
    /// An asset definition. Instances 0 and 1 are reserved for CORE and SDR.
    AssetId, 1, 3
);
object_id!(
    /// A block-producing witness.
    WitnessId, 1, 6
);
object_id!(
    /// A vesting balance escrow.
    VestingBalanceId, 1, 13
);
object_id!(
    /// The fee and balance bookkeeping record owned by an account.
    AccountStatisticsId, 2, 6
);

impl AccountId {
    /// The committee account, created first at genesis.
    pub const COMMITTEE: Self = Self(0);
}

impl AssetId {
    /// The primary network asset, in which `fee` is denominated.
    pub const CORE: Self = Self(0);
    /// The fixed secondary settlement asset, in which `ufee` is denominated.
    pub const SDR: Self = Self(1);
}

/// A reference to any stored object, used for operation results and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectId {
    Account(AccountId),
    AccountStatistics(AccountStatisticsId),
    Asset(AssetId),
    VestingBalance(VestingBalanceId),
    Witness(WitnessId),
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(id) => id.fmt(f),
            Self::AccountStatistics(id) => id.fmt(f),
            Self::Asset(id) => id.fmt(f),
            Self::VestingBalance(id) => id.fmt(f),
            Self::Witness(id) => id.fmt(f),
        }
    }
}

impl From<AccountId> for ObjectId {
    fn from(id: AccountId) -> Self {
        Self::Account(id)
    }
}

impl From<AssetId> for ObjectId {
    fn from(id: AssetId) -> Self {
        Self::Asset(id)
    }
}

impl From<VestingBalanceId> for ObjectId {
    fn from(id: VestingBalanceId) -> Self {
        Self::VestingBalance(id)
    }
}

impl From<WitnessId> for ObjectId {
    fn from(id: WitnessId) -> Self {
        Self::Witness(id)
    }
}

impl From<AccountStatisticsId> for ObjectId {
    fn from(id: AccountStatisticsId) -> Self {
        Self::AccountStatistics(id)
    }
}
