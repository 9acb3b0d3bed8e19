//! Core processor implementation.
//!
//! This module contains the CPU implementation: the instruction pipeline, the
//! execution units, the architectural state and the orchestrator that
//! advances them one cycle at a time.

/// Architecture-specific components (CSR file, privilege modes).
pub mod arch;

/// CPU core and cycle orchestration.
pub mod cpu;

/// Instruction pipeline implementation (stages, latches, hazards, control, signals).
pub mod pipeline;

/// Execution units (ALU, multiplier, divider, LSU, static predictor).
pub mod units;

pub use self::cpu::{Cpu, RetireEvent};
