//! Chain driver for the duo ledger.
//!
//! Wires genesis, the evaluator, fee schedule and budget engine into a
//! [`Chain`] that applies blocks in order:
//!
//! ```text
//! block ─► transactions (each all-or-nothing) ─► head update
//!       ─► witness pay ─► maintenance when due ─► commit
//! ```
//!
//! Configuration is read from TOML ([`ChainConfig`]) and logs go through
//! `tracing` ([`init_logging`]).

pub mod block;
pub mod chain;
pub mod config;
pub mod error;
pub mod genesis;
pub mod logging;

pub use block::{Block, BlockOutcome};
pub use chain::Chain;
pub use config::ChainConfig;
pub use error::ChainError;
pub use genesis::{GenesisAccount, GenesisState, COMMITTEE_ACCOUNT_NAME};
pub use logging::{init_logging, LogFormat};
