//! Execution units.
//!
//! The functional units execute-1 and execute-2 dispatch to: the single-cycle
//! ALU and branch comparator, the static predictor used by fetch, the
//! multi-cycle multiplier and divider, and the load/store request builder.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Static branch prediction.
pub mod bru;

/// Divide/remainder unit.
pub mod div;

/// Load/Store Unit request construction.
pub mod lsu;

/// Multiply unit.
pub mod mul;
