//! Cycle-level model of an in-order RV64 execution core.
//!
//! This crate implements the control and execution core of a small single-issue
//! RISC-V processor:
//! 1. **Fetch:** PC sequencing, static branch prediction and a depth-1 skid buffer.
//! 2. **Execute:** Decode handoff with register read, execute-1 bypass and branch
//!    resolution, execute-2 functional-unit arbitration and trap assembly.
//! 3. **Control:** The writeback redirect priority encoder and the
//!    `Normal` / `MispredictDrain` / `ExceptionDrain` squash state machine.
//! 4. **Collaborators:** A reference decoder, CSR file and the memory port traits
//!    the core talks to.
//! 5. **Simulation:** Configuration, statistics and a cycle loop.

/// Common types and constants (registers, traps, errors).
pub mod common;
/// Core configuration (defaults, JSON loading, validation).
pub mod config;
/// CPU core (pipeline, arch state, units).
pub mod core;
/// Instruction set tables, immediates and compressed expansion.
pub mod isa;
/// Simulation driver.
pub mod sim;
/// Memory port interfaces.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Main CPU type; owns the pipeline, register file and CSR file.
pub use crate::core::Cpu;
/// Core plus ports; the usual entry point.
pub use crate::sim::Simulator;
