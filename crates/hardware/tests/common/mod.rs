//! Shared test infrastructure.

/// Instruction encoders and pipeline record builders.
pub mod builder;

/// Simulation harness.
pub mod harness;
