//! Arbitrary application data carried on chain.

use crate::error::ValidationError;
use crate::fee::{calculate_data_fee, check_fee_assets, fee_with_surcharge, serialized_size};
use crate::transfer::TransferFeeParameters;
use crate::{Operation, OperationBody, OperationKind};
use duo_types::{AccountId, AssetAmount, DualFee, BLOCKCHAIN_PRECISION};
use serde::{Deserialize, Serialize};

/// Default custom-data fee shape: a small base fee plus one unit per kilobyte.
pub fn default_custom_fee_parameters() -> TransferFeeParameters {
    let precision = BLOCKCHAIN_PRECISION as u64;
    TransferFeeParameters {
        fee: 3 * precision,
        ufee: 0,
        price_per_kbyte: 10 * precision,
        ufee_pkb: 0,
    }
}

/// Opaque data with an application-chosen `id`. The ledger interprets nothing
/// beyond the payer and the listed authorities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOperation {
    pub fee: AssetAmount,
    pub ufee: AssetAmount,
    pub payer: AccountId,
    pub required_auths: Vec<AccountId>,
    pub id: u16,
    pub data: Vec<u8>,
}

impl OperationBody for CustomOperation {
    type FeeParameters = TransferFeeParameters;
    const KIND: OperationKind = OperationKind::Custom;

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
        self.payer
    }

    /// Custom data is never free: the primary fee must be strictly positive.
    fn validate(&self) -> Result<(), ValidationError> {
        check_fee_assets(&self.fee, &self.ufee)?;
        if self.fee.amount <= 0 {
            return Err(ValidationError::NonPositiveFee);
        }
        if self.ufee.amount < 0 {
            return Err(ValidationError::NegativeFee);
        }
        Ok(())
    }

    fn calculate_fee(&self, params: &TransferFeeParameters) -> DualFee {
        let bytes = serialized_size(self);
        DualFee::new(
            fee_with_surcharge(params.fee, calculate_data_fee(bytes, params.price_per_kbyte)),
            fee_with_surcharge(params.ufee, calculate_data_fee(bytes, params.ufee_pkb)),
        )
    }

    fn from_operation(op: &Operation) -> Option<&Self> {
        match op {
            Operation::Custom(body) => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(data_len: usize) -> CustomOperation {
        CustomOperation {
            fee: AssetAmount::core(1),
            ufee: AssetAmount::sdr(0),
            payer: AccountId::new(9),
            required_auths: vec![],
            id: 7,
            data: vec![0; data_len],
        }
    }

    #[test]
    fn zero_fee_is_invalid() {
        let mut op = custom(0);
        assert!(op.validate().is_ok());
        op.fee = AssetAmount::core(0);
        assert_eq!(op.validate(), Err(ValidationError::NonPositiveFee));
    }

    #[test]
    fn surcharge_covers_the_whole_operation() {
        let params = TransferFeeParameters {
            fee: 10,
            ufee: 1,
            price_per_kbyte: 100,
            ufee_pkb: 2,
        };
        // Header fields push a 1000-byte payload past one kilobyte.
        let op = custom(1000);
        assert!(serialized_size(&op) > 1024);
        assert_eq!(op.calculate_fee(&params), DualFee::new(210, 5));
    }
}
