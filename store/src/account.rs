//! Accounts and their fee/balance bookkeeping records.

use crate::error::StoreError;
use duo_types::{AccountId, AccountStatisticsId, AssetAmount, AssetId, DualFee, ShareType, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Membership tier bought through an account upgrade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Membership {
    #[default]
    Basic,
    Annual { expires: Timestamp },
    Lifetime,
}

impl Membership {
    pub fn is_lifetime(&self) -> bool {
        matches!(self, Self::Lifetime)
    }

    /// Whether membership benefits apply at `now`.
    pub fn is_member(&self, now: Timestamp) -> bool {
        match self {
            Self::Basic => false,
            Self::Annual { expires } => now < *expires,
            Self::Lifetime => true,
        }
    }
}

/// Account identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub statistics: AccountStatisticsId,
    pub membership: Membership,
}

/// Per-account balances and fee accounting.
///
/// Mutated by the evaluator's fee payment and by operation side effects;
/// drained of pending fees at each maintenance boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatistics {
    pub id: AccountStatisticsId,
    pub owner: AccountId,
    pub balances: BTreeMap<AssetId, ShareType>,
    /// CORE fees paid since the last maintenance.
    pub pending_fees: ShareType,
    /// SDR fees paid since the last maintenance.
    pub pending_ufees: ShareType,
    pub lifetime_fees_paid: ShareType,
    pub lifetime_ufees_paid: ShareType,
    /// Operations this account has paid fees for.
    pub total_ops: u64,
}

impl AccountStatistics {
    pub fn new(id: AccountStatisticsId, owner: AccountId) -> Self {
        Self {
            id,
            owner,
            balances: BTreeMap::new(),
            pending_fees: 0,
            pending_ufees: 0,
            lifetime_fees_paid: 0,
            lifetime_ufees_paid: 0,
            total_ops: 0,
        }
    }

    pub fn balance(&self, asset: AssetId) -> ShareType {
        self.balances.get(&asset).copied().unwrap_or(0)
    }

    /// Add `delta` (which may be negative) to the balance of its asset.
    pub fn adjust_balance(&mut self, delta: AssetAmount) -> Result<(), StoreError> {
        let current = self.balance(delta.asset_id);
        let updated = current
            .checked_add(delta.amount)
            .ok_or(StoreError::Overflow)?;
        if updated < 0 {
            return Err(StoreError::NegativeBalance {
                account: self.owner,
                asset: delta.asset_id,
            });
        }
        if updated == 0 {
            self.balances.remove(&delta.asset_id);
        } else {
            self.balances.insert(delta.asset_id, updated);
        }
        Ok(())
    }

    /// Debit the dual fee from balances and book it as pending.
    ///
    /// Either every field changes or none does.
    pub fn pay_fee(&mut self, fee: DualFee) -> Result<(), StoreError> {
        let mut next = self.clone();
        next.adjust_balance(AssetAmount::core(-fee.fee))?;
        next.adjust_balance(AssetAmount::sdr(-fee.ufee))?;
        next.pending_fees = add(next.pending_fees, fee.fee)?;
        next.pending_ufees = add(next.pending_ufees, fee.ufee)?;
        next.lifetime_fees_paid = add(next.lifetime_fees_paid, fee.fee)?;
        next.lifetime_ufees_paid = add(next.lifetime_ufees_paid, fee.ufee)?;
        next.total_ops = next.total_ops.saturating_add(1);
        *self = next;
        Ok(())
    }
}

fn add(a: ShareType, b: ShareType) -> Result<ShareType, StoreError> {
    a.checked_add(b).ok_or(StoreError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> AccountStatistics {
        AccountStatistics::new(AccountStatisticsId::new(1), AccountId::new(1))
    }

    #[test]
    fn adjust_balance_refuses_negative() {
        let mut s = stats();
        s.adjust_balance(AssetAmount::core(10)).unwrap();
        assert_eq!(
            s.adjust_balance(AssetAmount::core(-11)),
            Err(StoreError::NegativeBalance {
                account: AccountId::new(1),
                asset: AssetId::CORE
            })
        );
        assert_eq!(s.balance(AssetId::CORE), 10);
        s.adjust_balance(AssetAmount::core(-10)).unwrap();
        assert!(s.balances.is_empty());
    }

    #[test]
    fn pay_fee_moves_both_denominations() {
        let mut s = stats();
        s.adjust_balance(AssetAmount::core(100)).unwrap();
        s.adjust_balance(AssetAmount::sdr(10)).unwrap();
        s.pay_fee(DualFee::new(30, 4)).unwrap();
        assert_eq!(s.balance(AssetId::CORE), 70);
        assert_eq!(s.balance(AssetId::SDR), 6);
        assert_eq!((s.pending_fees, s.pending_ufees), (30, 4));
        assert_eq!((s.lifetime_fees_paid, s.lifetime_ufees_paid), (30, 4));
        assert_eq!(s.total_ops, 1);
    }

    #[test]
    fn pay_fee_is_all_or_nothing() {
        let mut s = stats();
        s.adjust_balance(AssetAmount::core(100)).unwrap();
        let before = s.clone();
        // Enough CORE but no SDR.
        assert!(s.pay_fee(DualFee::new(30, 1)).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn annual_membership_expires() {
        let m = Membership::Annual {
            expires: Timestamp::new(100),
        };
        assert!(m.is_member(Timestamp::new(99)));
        assert!(!m.is_member(Timestamp::new(100)));
        assert!(Membership::Lifetime.is_member(Timestamp::MAX));
        assert!(!Membership::Basic.is_member(Timestamp::EPOCH));
    }
}
