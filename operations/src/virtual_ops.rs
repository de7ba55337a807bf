//! Virtual operations: settlement records produced by the ledger itself.
//!
//! They appear in history so observers can see what happened, but carry no
//! payer-initiated charge and are refused if ever submitted by a user.

use crate::error::ValidationError;
use crate::{Operation, OperationBody, OperationKind};
use duo_types::{AccountId, AssetAmount, DualFee};
use serde::{Deserialize, Serialize};

/// Fee shape of a virtual operation: nothing to configure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyFeeParameters {}

/// A market order was (partially) filled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOrderOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub order_id: u64,
    pub account_id: AccountId,
    pub pays: AssetAmount,
    pub receives: AssetAmount,
}

/// An open order or bid request reached its expiration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExpiredOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub order_id: u64,
    pub fee_paying_account: AccountId,
}

/// A fee moved between accounts by the ledger on someone's behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePayOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub paid_fee: AssetAmount,
    pub paid_ufee: AssetAmount,
    pub fee_from_account: AccountId,
    pub fee_to_account: AccountId,
}

impl OperationBody for FillOrderOperation {
    type FeeParameters = EmptyFeeParameters;
    const KIND: OperationKind = OperationKind::FillOrder;

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
        self.account_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Err(ValidationError::VirtualOperation { kind: Self::KIND })
    }

    fn calculate_fee(&self, _params: &EmptyFeeParameters) -> DualFee {
        DualFee::ZERO
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::FillOrder(body) => Some(body),
            _ => None,
        }
    }
}

impl OperationBody for OrderExpiredOperation {
    type FeeParameters = EmptyFeeParameters;
    const KIND: OperationKind = OperationKind::OrderExpired;

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
        self.fee_paying_account
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Err(ValidationError::VirtualOperation { kind: Self::KIND })
    }

    fn calculate_fee(&self, _params: &EmptyFeeParameters) -> DualFee {
        DualFee::ZERO
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::OrderExpired(body) => Some(body),
            _ => None,
        }
    }
}

impl OperationBody for FeePayOperation {
    type FeeParameters = EmptyFeeParameters;
    const KIND: OperationKind = OperationKind::FeePay;

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
        self.fee_from_account
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Err(ValidationError::VirtualOperation { kind: Self::KIND })
    }

    fn calculate_fee(&self, _params: &EmptyFeeParameters) -> DualFee {
        DualFee::ZERO
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::FeePay(body) => Some(body),
            _ => None,
        }
    }
}
