//! Asset amounts and the dual fee pair.
//!
//! Amounts are signed 64-bit share counts in the asset's smallest unit.
//! Arithmetic between amounts of different assets is refused rather than
//! silently mixed.

use crate::error::AmountError;
use crate::ids::AssetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw share count.
pub type ShareType = i64;

/// Upper bound on the supply of any asset, and on any single fee.
pub const MAX_SHARE_SUPPLY: ShareType = 1_000_000_000_000_000;

/// Smallest units per whole CORE.
pub const BLOCKCHAIN_PRECISION: ShareType = 100_000;

/// An amount of a specific asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetAmount {
    pub amount: ShareType,
    pub asset_id: AssetId,
}

impl AssetAmount {
    pub const fn new(amount: ShareType, asset_id: AssetId) -> Self {
        Self { amount, asset_id }
    }

    /// An amount of the primary network asset.
    pub const fn core(amount: ShareType) -> Self {
        Self::new(amount, AssetId::CORE)
    }

    /// An amount of the secondary settlement asset.
    pub const fn sdr(amount: ShareType) -> Self {
        Self::new(amount, AssetId::SDR)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn checked_add(self, other: Self) -> Result<Self, AmountError> {
        self.same_asset(&other)?;
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::new(amount, self.asset_id))
            .ok_or(AmountError::Overflow)
    }

    pub fn checked_sub(self, other: Self) -> Result<Self, AmountError> {
        self.same_asset(&other)?;
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Self::new(amount, self.asset_id))
            .ok_or(AmountError::Overflow)
    }

    fn same_asset(&self, other: &Self) -> Result<(), AmountError> {
        if self.asset_id != other.asset_id {
            return Err(AmountError::AssetMismatch {
                left: self.asset_id,
                right: other.asset_id,
            });
        }
        Ok(())
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.amount, self.asset_id)
    }
}

/// A charge expressed in both denominations at once.
///
/// `fee` is in the primary asset (CORE), `ufee` in the secondary settlement
/// asset (SDR). The two components are computed and settled independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DualFee {
    pub fee: ShareType,
    pub ufee: ShareType,
}

impl DualFee {
    pub const ZERO: Self = Self { fee: 0, ufee: 0 };

    pub const fn new(fee: ShareType, ufee: ShareType) -> Self {
        Self { fee, ufee }
    }

    pub fn is_zero(&self) -> bool {
        self.fee == 0 && self.ufee == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self {
            fee: self.fee.checked_add(other.fee)?,
            ufee: self.ufee.checked_add(other.ufee)?,
        })
    }

    /// Component-wise `>=`: does this payment cover `required`?
    pub fn covers(&self, required: &Self) -> bool {
        self.fee >= required.fee && self.ufee >= required.ufee
    }

    /// The fee as a CORE amount.
    pub fn fee_amount(&self) -> AssetAmount {
        AssetAmount::core(self.fee)
    }

    /// The ufee as an SDR amount.
    pub fn ufee_amount(&self) -> AssetAmount {
        AssetAmount::sdr(self.ufee)
    }
}

impl fmt::Display for DualFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{fee: {}, ufee: {}}}", self.fee, self.ufee)
    }
}
