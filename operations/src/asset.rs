//! Asset creation and issuance.

use crate::error::ValidationError;
use crate::fee::{calculate_data_fee, check_fee_fields, fee_with_surcharge, serialized_size};
use crate::transfer::{Memo, TransferFeeParameters};
use crate::{Operation, OperationBody, OperationKind};
use duo_types::{AccountId, AssetAmount, AssetId, DualFee, ShareType, BLOCKCHAIN_PRECISION, MAX_SHARE_SUPPLY};
use serde::{Deserialize, Serialize};

pub const MIN_SYMBOL_LENGTH: usize = 3;
pub const MAX_SYMBOL_LENGTH: usize = 16;
pub const MAX_PRECISION: u8 = 12;

/// Symbols are 3..=16 characters of `A-Z0-9`, starting with a letter.
pub fn is_valid_symbol(symbol: &str) -> bool {
    let len = symbol.len();
    if !(MIN_SYMBOL_LENGTH..=MAX_SYMBOL_LENGTH).contains(&len) {
        return false;
    }
    let mut chars = symbol.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Short symbols are scarce and priced higher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetCreateFeeParameters {
    pub symbol3: u64,
    pub symbol4: u64,
    pub long_symbol: u64,
    pub ufee: u64,
    pub price_per_kbyte: u64,
}

impl Default for AssetCreateFeeParameters {
    fn default() -> Self {
        let precision = BLOCKCHAIN_PRECISION as u64;
        Self {
            symbol3: 5000 * precision,
            symbol4: 3000 * precision,
            long_symbol: 500 * precision,
            ufee: 0,
            price_per_kbyte: 10 * precision,
        }
    }
}

/// Register a new user-issued asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCreateOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub issuer: AccountId,
    pub symbol: String,
    pub precision: u8,
    pub max_supply: ShareType,
    /// Lets the issuer move the asset out of holders' accounts.
    pub override_authority: bool,
}

impl OperationBody for AssetCreateOperation {
    type FeeParameters = AssetCreateFeeParameters;
    const KIND: OperationKind = OperationKind::AssetCreate;

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
        if !is_valid_symbol(&self.symbol) {
            return Err(ValidationError::InvalidSymbol(self.symbol.clone()));
        }
        if self.precision > MAX_PRECISION {
            return Err(ValidationError::PrecisionTooHigh(self.precision));
        }
        if self.max_supply <= 0 || self.max_supply > MAX_SHARE_SUPPLY {
            return Err(ValidationError::InvalidMaxSupply);
        }
        Ok(())
    }

    fn calculate_fee(&self, params: &AssetCreateFeeParameters) -> DualFee {
        let base = match self.symbol.len() {
            3 => params.symbol3,
            4 => params.symbol4,
            _ => params.long_symbol,
        };
        let surcharge = calculate_data_fee(serialized_size(self), params.price_per_kbyte);
        DualFee::new(
            fee_with_surcharge(base, surcharge),
            fee_with_surcharge(params.ufee, 0),
        )
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::AssetCreate(body) => Some(body),
            _ => None,
        }
    }
}

/// The issuer mints new supply of its asset into an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIssueOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub issuer: AccountId,
    pub asset_to_issue: AssetAmount,
    pub issue_to_account: AccountId,
    pub memo: Option<Memo>,
}

impl OperationBody for AssetIssueOperation {
    type FeeParameters = TransferFeeParameters;
    const KIND: OperationKind = OperationKind::AssetIssue;

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
        if self.asset_to_issue.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        let asset = self.asset_to_issue.asset_id;
        if asset == AssetId::CORE || asset == AssetId::SDR {
            return Err(ValidationError::ReservedAsset(asset));
        }
        Ok(())
    }

    fn calculate_fee(&self, params: &TransferFeeParameters) -> DualFee {
        params.fee_for_memo(self.memo.as_ref())
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::AssetIssue(body) => Some(body),
            _ => None,
        }
    }
}
