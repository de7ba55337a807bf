//! Membership upgrades.

use crate::error::ValidationError;
use crate::fee::{check_fee_fields, fee_with_surcharge};
use crate::{Operation, OperationBody, OperationKind};
use duo_types::{AccountId, AssetAmount, DualFee, BLOCKCHAIN_PRECISION};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountUpgradeFeeParameters {
    pub membership_annual_fee: u64,
    pub membership_lifetime_fee: u64,
    pub ufee: u64,
}

impl Default for AccountUpgradeFeeParameters {
    fn default() -> Self {
        let precision = BLOCKCHAIN_PRECISION as u64;
        Self {
            membership_annual_fee: 2000 * precision,
            membership_lifetime_fee: 10_000 * precision,
            ufee: 0,
        }
    }
}

/// Buy an annual or lifetime membership for an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpgradeOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub account_to_upgrade: AccountId,
    pub upgrade_to_lifetime_member: bool,
}

impl OperationBody for AccountUpgradeOperation {
    type FeeParameters = AccountUpgradeFeeParameters;
    const KIND: OperationKind = OperationKind::AccountUpgrade;

    fn fee(&self) -> AssetAmount {
        self.fee
    }

    fn ufee(&self) -> AssetAmount {
        self.ufee
    }

    fn set_fee(&mut self, fee: DualFee) {
        self.fee = fee.fee_amount();
        self.ufee = fee.ufee_amount();
    }

    fn fee_payer(&self) -> AccountId {
        self.account_to_upgrade
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_fee_fields(&self.fee, &self.ufee)
    }

    fn calculate_fee(&self, params: &AccountUpgradeFeeParameters) -> DualFee {
        let base = if self.upgrade_to_lifetime_member {
            params.membership_lifetime_fee
        } else {
            params.membership_annual_fee
        };
        DualFee::new(fee_with_surcharge(base, 0), fee_with_surcharge(params.ufee, 0))
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::AccountUpgrade(body) => Some(body),
            _ => None,
        }
    }
}
