//! Ledger primitives for the duo chain.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: object ids, asset amounts, dual fees, timestamps and the chain
//! parameters. Nothing in here touches the object store.

pub mod amount;
pub mod error;
pub mod ids;
pub mod params;
pub mod time;

pub use amount::{AssetAmount, DualFee, ShareType, BLOCKCHAIN_PRECISION, MAX_SHARE_SUPPLY};
pub use error::AmountError;
pub use ids::{AccountId, AccountStatisticsId, AssetId, ObjectId, VestingBalanceId, WitnessId};
pub use params::{ChainParameters, HUNDRED_PERCENT};
pub use time::{Clock, SystemClock, Timestamp};
