//! Nullable infrastructure: deterministic stand-ins for the outside world,
//! used by tests and simulations.

pub mod clock;

pub use clock::NullClock;
