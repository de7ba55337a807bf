//! Shared fee arithmetic and fee-field validation.

use crate::error::ValidationError;
use duo_types::{AssetAmount, AssetId, ShareType, MAX_SHARE_SUPPLY};
use serde::Serialize;

pub const BYTES_PER_KBYTE: u128 = 1024;

/// Canonical encoded length of `value`, used to price variable-size payloads.
///
/// Encoding a plain data type cannot fail; if it ever did, the size saturates
/// so the payload is priced at the cap rather than for free.
pub fn serialized_size<T: Serialize + ?Sized>(value: &T) -> usize {
    bincode::serialized_size(value)
        .ok()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(usize::MAX)
}

/// `ceil(bytes / 1024) × price_per_kbyte`, saturated at `MAX_SHARE_SUPPLY`.
pub fn calculate_data_fee(bytes: usize, price_per_kbyte: u64) -> ShareType {
    let kbytes = (bytes as u128).div_ceil(BYTES_PER_KBYTE);
    clamp_fee(kbytes.saturating_mul(u128::from(price_per_kbyte)))
}

/// Base fee plus a surcharge, saturated at `MAX_SHARE_SUPPLY`.
pub fn fee_with_surcharge(base: u64, surcharge: ShareType) -> ShareType {
    let surcharge = u128::try_from(surcharge).unwrap_or(0);
    clamp_fee(u128::from(base).saturating_add(surcharge))
}

pub fn clamp_fee(value: u128) -> ShareType {
    // MAX_SHARE_SUPPLY fits in i64, so the narrowing cast is exact.
    value.min(MAX_SHARE_SUPPLY as u128) as ShareType
}

/// The `fee` field must be non-negative CORE and `ufee` non-negative SDR.
pub fn check_fee_fields(fee: &AssetAmount, ufee: &AssetAmount) -> Result<(), ValidationError> {
    check_fee_assets(fee, ufee)?;
    if fee.amount < 0 || ufee.amount < 0 {
        return Err(ValidationError::NegativeFee);
    }
    Ok(())
}

pub(crate) fn check_fee_assets(fee: &AssetAmount, ufee: &AssetAmount) -> Result<(), ValidationError> {
    if fee.asset_id != AssetId::CORE {
        return Err(ValidationError::WrongFeeAsset {
            field: "fee",
            expected: AssetId::CORE,
            got: fee.asset_id,
        });
    }
    if ufee.asset_id != AssetId::SDR {
        return Err(ValidationError::WrongFeeAsset {
            field: "ufee",
            expected: AssetId::SDR,
            got: ufee.asset_id,
        });
    }
    Ok(())
}
