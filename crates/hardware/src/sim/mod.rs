//! Simulation driver.
//!
//! Couples a [`Cpu`](crate::core::Cpu) with its instruction and data ports and
//! runs it with a cycle budget.

/// Cycle loop and run-until helpers.
pub mod simulator;

pub use simulator::{SimError, Simulator};
