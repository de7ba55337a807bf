//! Opening and drawing down vesting balances.

use crate::error::ValidationError;
use crate::fee::{check_fee_fields, fee_with_surcharge};
use crate::{Operation, OperationBody, OperationKind};
use duo_types::{AccountId, AssetAmount, DualFee, VestingBalanceId, BLOCKCHAIN_PRECISION};
use duo_vesting::VestingPolicyInitializer;
use serde::{Deserialize, Serialize};

/// Flat fee shape for operations with no variable-size payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatFeeParameters {
    pub fee: u64,
    pub ufee: u64,
}

impl Default for FlatFeeParameters {
    fn default() -> Self {
        Self {
            fee: BLOCKCHAIN_PRECISION as u64,
            ufee: 0,
        }
    }
}

impl FlatFeeParameters {
    pub fn dual_fee(&self) -> DualFee {
        DualFee::new(fee_with_surcharge(self.fee, 0), fee_with_surcharge(self.ufee, 0))
    }
}

/// Escrow `amount` from `creator` into a new vesting balance owned by `owner`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingBalanceCreateOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub creator: AccountId,
    pub owner: AccountId,
    pub amount: AssetAmount,
    pub policy: VestingPolicyInitializer,
}

impl OperationBody for VestingBalanceCreateOperation {
    type FeeParameters = FlatFeeParameters;
    const KIND: OperationKind = OperationKind::VestingBalanceCreate;

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
        self.creator
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_fee_fields(&self.fee, &self.ufee)?;
        if self.amount.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        self.policy
            .validate()
            .map_err(|e| ValidationError::InvalidVestingPolicy(e.to_string()))
    }

    fn calculate_fee(&self, params: &FlatFeeParameters) -> DualFee {
        params.dual_fee()
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::VestingBalanceCreate(body) => Some(body),
            _ => None,
        }
    }
}

/// Withdraw vested funds back into the owner's account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingBalanceWithdrawOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub vesting_balance: VestingBalanceId,
    pub owner: AccountId,
    pub amount: AssetAmount,
}

impl OperationBody for VestingBalanceWithdrawOperation {
    type FeeParameters = FlatFeeParameters;
    const KIND: OperationKind = OperationKind::VestingBalanceWithdraw;

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
        self.owner
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_fee_fields(&self.fee, &self.ufee)?;
        if self.amount.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(())
    }

    fn calculate_fee(&self, params: &FlatFeeParameters) -> DualFee {
        params.dual_fee()
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::VestingBalanceWithdraw(body) => Some(body),
            _ => None,
        }
    }
}
