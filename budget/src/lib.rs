//! Witness budget accounting.
//!
//! Collected fees flow through three places:
//!
//! - per-account `pending_fees`, filled by every fee payment
//! - at each maintenance boundary, the network share moves into the
//!   `accumulated_fees` pool and the rest is retired into the reserve fund
//! - a slice of the pool, sized by the cycle rate and the time since the
//!   previous budget, becomes the interval's `witness_budget`, which block
//!   producers draw down one block at a time
//!
//! The budget is replaced, never accumulated: whatever the last interval did
//! not pay out goes back to the pool first.

pub mod error;
pub mod maintenance;
pub mod pay;

pub use error::BudgetError;
pub use maintenance::{
    ceil_shift, distribute_fees, next_maintenance_after, run_maintenance, BudgetRecord, FeeDistribution,
};
pub use pay::pay_block_producer;
