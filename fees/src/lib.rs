//! The dual fee schedule.
//!
//! Holds one [`FeeParameters`] entry per operation kind and prices operations
//! in both denominations. A global `scale` (basis points) multiplies every
//! computed fee, rounding up, so the committee can re-price the whole network
//! without touching individual entries.

use duo_operations::{FeeParameters, Operation, OperationKind};
use duo_types::{DualFee, ShareType, HUNDRED_PERCENT, MAX_SHARE_SUPPLY};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Multiplier in basis points of [`HUNDRED_PERCENT`].
    pub scale: u32,
    /// At most one entry per kind. Kinds without an entry use their defaults.
    pub parameters: Vec<FeeParameters>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            scale: HUNDRED_PERCENT,
            parameters: OperationKind::ALL
                .iter()
                .map(|kind| FeeParameters::default_for(*kind))
                .collect(),
        }
    }
}

impl FeeSchedule {
    /// A schedule that charges nothing for anything.
    pub fn free() -> Self {
        Self {
            scale: 0,
            parameters: Vec::new(),
        }
    }

    /// The entry for `kind`, or the kind's default shape.
    pub fn get(&self, kind: OperationKind) -> FeeParameters {
        self.parameters
            .iter()
            .find(|p| p.kind() == kind)
            .cloned()
            .unwrap_or_else(|| FeeParameters::default_for(kind))
    }

    /// Replace the entry of the same kind, or add it.
    pub fn set(&mut self, params: FeeParameters) {
        let kind = params.kind();
        match self.parameters.iter_mut().find(|p| p.kind() == kind) {
            Some(slot) => *slot = params,
            None => self.parameters.push(params),
        }
    }

    /// Price `op` under this schedule, scale applied.
    ///
    /// Has no side effects, so it is safe for fee estimation.
    pub fn calculate_fee(&self, op: &Operation) -> DualFee {
        let kind = op.kind();
        let raw = match self.parameters.iter().find(|p| p.kind() == kind) {
            Some(params) => op.calculate_fee(params),
            None => op.calculate_fee(&FeeParameters::default_for(kind)),
        };
        DualFee::new(self.scaled(raw.fee), self.scaled(raw.ufee))
    }

    /// Write the computed fee into the operation's fee fields.
    pub fn set_fee(&self, op: &mut Operation) -> DualFee {
        let fee = self.calculate_fee(op);
        op.set_fee(fee);
        fee
    }

    /// `ceil(amount × scale / 100%)`, saturated at `MAX_SHARE_SUPPLY`.
    fn scaled(&self, amount: ShareType) -> ShareType {
        let amount = u128::try_from(amount).unwrap_or(0);
        let scaled = (amount * u128::from(self.scale)).div_ceil(u128::from(HUNDRED_PERCENT));
        // MAX_SHARE_SUPPLY fits in i64, so the narrowing cast is exact.
        scaled.min(MAX_SHARE_SUPPLY as u128) as ShareType
    }
}
