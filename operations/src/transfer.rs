//! Transfers between accounts, including issuer-forced transfers.

use crate::error::ValidationError;
use crate::fee::{calculate_data_fee, check_fee_fields, fee_with_surcharge, serialized_size};
use crate::{Operation, OperationBody, OperationKind};
use duo_types::{AccountId, AssetAmount, DualFee, BLOCKCHAIN_PRECISION};
use serde::{Deserialize, Serialize};

/// An opaque note attached to a transfer. Priced by its encoded size.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub nonce: u64,
    pub message: Vec<u8>,
}

/// Fee shape shared by transfer-like operations: base fees plus a
/// per-kilobyte memo surcharge in each denomination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferFeeParameters {
    pub fee: u64,
    pub ufee: u64,
    pub price_per_kbyte: u64,
    pub ufee_pkb: u64,
}

impl Default for TransferFeeParameters {
    fn default() -> Self {
        Self {
            fee: 20 * BLOCKCHAIN_PRECISION as u64,
            ufee: 0,
            price_per_kbyte: 10 * BLOCKCHAIN_PRECISION as u64,
            ufee_pkb: 0,
        }
    }
}

impl TransferFeeParameters {
    /// Base fees plus `ceil(memo_bytes / 1024)` times each kilobyte rate.
    pub fn fee_for_memo(&self, memo: Option<&Memo>) -> DualFee {
        let bytes = memo.map(serialized_size).unwrap_or(0);
        DualFee::new(
            fee_with_surcharge(self.fee, calculate_data_fee(bytes, self.price_per_kbyte)),
            fee_with_surcharge(self.ufee, calculate_data_fee(bytes, self.ufee_pkb)),
        )
    }
}

/// Move `amount` from `from` to `to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: AssetAmount,
    pub memo: Option<Memo>,
}

impl TransferOperation {
    pub fn new(from: AccountId, to: AccountId, amount: AssetAmount) -> Self {
        Self {
            fee: AssetAmount::core(0),
            ufee: AssetAmount::sdr(0),
            from,
            to,
            amount,
            memo: None,
        }
    }
}

impl OperationBody for TransferOperation {
    type FeeParameters = TransferFeeParameters;
    const KIND: OperationKind = OperationKind::Transfer;

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
        self.from
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_fee_fields(&self.fee, &self.ufee)?;
        if self.from == self.to {
            return Err(ValidationError::SelfTransfer);
        }
        if self.amount.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(())
    }

    fn calculate_fee(&self, params: &TransferFeeParameters) -> DualFee {
        params.fee_for_memo(self.memo.as_ref())
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::Transfer(body) => Some(body),
            _ => None,
        }
    }
}

/// The issuer of an asset with override authority moves it out of a
/// holder's account without the holder's consent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideTransferOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub issuer: AccountId,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: AssetAmount,
    pub memo: Option<Memo>,
}

impl OperationBody for OverrideTransferOperation {
    type FeeParameters = TransferFeeParameters;
    const KIND: OperationKind = OperationKind::OverrideTransfer;

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
        self.issuer
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_fee_fields(&self.fee, &self.ufee)?;
        if self.from == self.to {
            return Err(ValidationError::SelfTransfer);
        }
        if self.amount.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.issuer == self.from {
            return Err(ValidationError::IssuerIsSender);
        }
        Ok(())
    }

    fn calculate_fee(&self, params: &TransferFeeParameters) -> DualFee {
        params.fee_for_memo(self.memo.as_ref())
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::OverrideTransfer(body) => Some(body),
            _ => None,
        }
    }
}
