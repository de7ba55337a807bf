//! All duo operation types, their fee parameter shapes and stateless checks.
//!
//! User operations:
//! - **Transfer** / **OverrideTransfer**: move an asset between accounts
//! - **AssetCreate** / **AssetIssue**: register a user asset and mint supply
//! - **AccountUpgrade**: buy an annual or lifetime membership
//! - **VestingBalanceCreate** / **VestingBalanceWithdraw**: escrow and release
//! - **Custom**: opaque application data
//!
//! Virtual operations (**FillOrder**, **OrderExpired**, **FeePay**) are records
//! the ledger emits itself. They are free and never pass `validate`.
//!
//! Every operation carries a dual fee: `fee` in CORE and `ufee` in SDR.

pub mod account;
pub mod asset;
pub mod custom;
pub mod error;
pub mod fee;
pub mod transaction;
pub mod transfer;
pub mod vesting;
pub mod virtual_ops;

pub use account::{AccountUpgradeFeeParameters, AccountUpgradeOperation};
pub use asset::{AssetCreateFeeParameters, AssetCreateOperation, AssetIssueOperation};
pub use custom::CustomOperation;
pub use error::ValidationError;
pub use fee::{calculate_data_fee, serialized_size};
pub use transaction::Transaction;
pub use transfer::{Memo, OverrideTransferOperation, TransferFeeParameters, TransferOperation};
pub use vesting::{FlatFeeParameters, VestingBalanceCreateOperation, VestingBalanceWithdrawOperation};
pub use virtual_ops::{
    EmptyFeeParameters, FeePayOperation, FillOrderOperation, OrderExpiredOperation,
};

use duo_types::{AccountId, AssetAmount, DualFee};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behaviour every operation body provides.
pub trait OperationBody: Serialize {
    /// The fee schedule entry this kind is priced with.
    type FeeParameters;

    const KIND: OperationKind;

    fn fee(&self) -> AssetAmount;

    fn ufee(&self) -> AssetAmount;

    fn set_fee(&mut self, fee: DualFee);

    /// The account charged for this operation.
    fn fee_payer(&self) -> AccountId;

    /// Pure, stateless well-formedness check.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Fee owed under `params`, before schedule scaling.
    fn calculate_fee(&self, params: &Self::FeeParameters) -> DualFee;

    /// Downcast from the closed operation enum.
    fn from_operation(op: &Operation) -> Option<&Self>;
}

/// Discriminant of [`Operation`], used to key fee parameters and evaluators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Transfer,
    OverrideTransfer,
    AssetCreate,
    AssetIssue,
    AccountUpgrade,
    VestingBalanceCreate,
    VestingBalanceWithdraw,
    Custom,
    FillOrder,
    OrderExpired,
    FeePay,
}

impl OperationKind {
    pub const ALL: [OperationKind; 11] = [
        Self::Transfer,
        Self::OverrideTransfer,
        Self::AssetCreate,
        Self::AssetIssue,
        Self::AccountUpgrade,
        Self::VestingBalanceCreate,
        Self::VestingBalanceWithdraw,
        Self::Custom,
        Self::FillOrder,
        Self::OrderExpired,
        Self::FeePay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::OverrideTransfer => "override_transfer",
            Self::AssetCreate => "asset_create",
            Self::AssetIssue => "asset_issue",
            Self::AccountUpgrade => "account_upgrade",
            Self::VestingBalanceCreate => "vesting_balance_create",
            Self::VestingBalanceWithdraw => "vesting_balance_withdraw",
            Self::Custom => "custom",
            Self::FillOrder => "fill_order",
            Self::OrderExpired => "order_expired",
            Self::FeePay => "fee_pay",
        }
    }

    /// Ledger-internal settlement records that users may not submit.
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::FillOrder | Self::OrderExpired | Self::FeePay)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fee parameters for one operation kind, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeeParameters {
    Transfer(TransferFeeParameters),
    OverrideTransfer(TransferFeeParameters),
    AssetCreate(AssetCreateFeeParameters),
    AssetIssue(TransferFeeParameters),
    AccountUpgrade(AccountUpgradeFeeParameters),
    VestingBalanceCreate(FlatFeeParameters),
    VestingBalanceWithdraw(FlatFeeParameters),
    Custom(TransferFeeParameters),
    FillOrder(EmptyFeeParameters),
    OrderExpired(EmptyFeeParameters),
    FeePay(EmptyFeeParameters),
}

impl FeeParameters {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Transfer(_) => OperationKind::Transfer,
            Self::OverrideTransfer(_) => OperationKind::OverrideTransfer,
            Self::AssetCreate(_) => OperationKind::AssetCreate,
            Self::AssetIssue(_) => OperationKind::AssetIssue,
            Self::AccountUpgrade(_) => OperationKind::AccountUpgrade,
            Self::VestingBalanceCreate(_) => OperationKind::VestingBalanceCreate,
            Self::VestingBalanceWithdraw(_) => OperationKind::VestingBalanceWithdraw,
            Self::Custom(_) => OperationKind::Custom,
            Self::FillOrder(_) => OperationKind::FillOrder,
            Self::OrderExpired(_) => OperationKind::OrderExpired,
            Self::FeePay(_) => OperationKind::FeePay,
        }
    }

    /// The network's default parameters for `kind`.
    pub fn default_for(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Transfer => Self::Transfer(TransferFeeParameters::default()),
            OperationKind::OverrideTransfer => {
                Self::OverrideTransfer(TransferFeeParameters::default())
            }
            OperationKind::AssetCreate => Self::AssetCreate(AssetCreateFeeParameters::default()),
            OperationKind::AssetIssue => Self::AssetIssue(TransferFeeParameters::default()),
            OperationKind::AccountUpgrade => {
                Self::AccountUpgrade(AccountUpgradeFeeParameters::default())
            }
            OperationKind::VestingBalanceCreate => {
                Self::VestingBalanceCreate(FlatFeeParameters::default())
            }
            OperationKind::VestingBalanceWithdraw => {
                Self::VestingBalanceWithdraw(FlatFeeParameters::default())
            }
            OperationKind::Custom => Self::Custom(custom::default_custom_fee_parameters()),
            OperationKind::FillOrder => Self::FillOrder(EmptyFeeParameters::default()),
            OperationKind::OrderExpired => Self::OrderExpired(EmptyFeeParameters::default()),
            OperationKind::FeePay => Self::FeePay(EmptyFeeParameters::default()),
        }
    }
}

/// The closed set of operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Transfer(TransferOperation),
    OverrideTransfer(OverrideTransferOperation),
    AssetCreate(AssetCreateOperation),
    AssetIssue(AssetIssueOperation),
    AccountUpgrade(AccountUpgradeOperation),
    VestingBalanceCreate(VestingBalanceCreateOperation),
    VestingBalanceWithdraw(VestingBalanceWithdrawOperation),
    Custom(CustomOperation),
    FillOrder(FillOrderOperation),
    OrderExpired(OrderExpiredOperation),
    FeePay(FeePayOperation),
}

macro_rules! dispatch {
    ($op:expr, $body:ident => $e:expr) => {
        match $op {
            Operation::Transfer($body) => $e,
            Operation::OverrideTransfer($body) => $e,
            Operation::AssetCreate($body) => $e,
            Operation::AssetIssue($body) => $e,
            Operation::AccountUpgrade($body) => $e,
            Operation::VestingBalanceCreate($body) => $e,
            Operation::VestingBalanceWithdraw($body) => $e,
            Operation::Custom($body) => $e,
            Operation::FillOrder($body) => $e,
            Operation::OrderExpired($body) => $e,
            Operation::FeePay($body) => $e,
        }
    };
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        dispatch!(self, op => operation_kind(op))
    }

    pub fn is_virtual(&self) -> bool {
        self.kind().is_virtual()
    }

    pub fn fee(&self) -> AssetAmount {
        dispatch!(self, op => op.fee())
    }

    pub fn ufee(&self) -> AssetAmount {
        dispatch!(self, op => op.ufee())
    }

    /// The declared `{fee, ufee}` pair.
    pub fn declared_fee(&self) -> DualFee {
        DualFee::new(self.fee().amount, self.ufee().amount)
    }

    pub fn set_fee(&mut self, fee: DualFee) {
        dispatch!(self, op => op.set_fee(fee))
    }

    pub fn fee_payer(&self) -> AccountId {
        dispatch!(self, op => op.fee_payer())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        dispatch!(self, op => op.validate())
    }

    /// Fee owed under `params`.
    ///
    /// Parameters of a different kind are ignored and this kind's defaults
    /// are used instead.
    pub fn calculate_fee(&self, params: &FeeParameters) -> DualFee {
        match (self, params) {
            (Self::Transfer(op), FeeParameters::Transfer(p)) => op.calculate_fee(p),
            (Self::OverrideTransfer(op), FeeParameters::OverrideTransfer(p)) => op.calculate_fee(p),
            (Self::AssetCreate(op), FeeParameters::AssetCreate(p)) => op.calculate_fee(p),
            (Self::AssetIssue(op), FeeParameters::AssetIssue(p)) => op.calculate_fee(p),
            (Self::AccountUpgrade(op), FeeParameters::AccountUpgrade(p)) => op.calculate_fee(p),
            (Self::VestingBalanceCreate(op), FeeParameters::VestingBalanceCreate(p)) => {
                op.calculate_fee(p)
            }
            (Self::VestingBalanceWithdraw(op), FeeParameters::VestingBalanceWithdraw(p)) => {
                op.calculate_fee(p)
            }
            (Self::Custom(op), FeeParameters::Custom(p)) => op.calculate_fee(p),
            (Self::FillOrder(_), _) | (Self::OrderExpired(_), _) | (Self::FeePay(_), _) => {
                DualFee::ZERO
            }
            (op, _) => op.calculate_fee(&FeeParameters::default_for(op.kind())),
        }
    }
}

fn operation_kind<T: OperationBody>(_: &T) -> OperationKind {
    T::KIND
}

macro_rules! impl_from_body {
    ($($variant:ident($body:ty)),* $(,)?) => {
        $(
            impl From<$body> for Operation {
                fn from(body: $body) -> Self {
                    Operation::$variant(body)
                }
            }
        )*
    };
}

impl_from_body!(
    Transfer(TransferOperation),
    OverrideTransfer(OverrideTransferOperation),
    AssetCreate(AssetCreateOperation),
    AssetIssue(AssetIssueOperation),
    AccountUpgrade(AccountUpgradeOperation),
    VestingBalanceCreate(VestingBalanceCreateOperation),
    VestingBalanceWithdraw(VestingBalanceWithdrawOperation),
    Custom(CustomOperation),
    FillOrder(FillOrderOperation),
    OrderExpired(OrderExpiredOperation),
    FeePay(FeePayOperation),
);
