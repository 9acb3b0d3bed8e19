//! Data Hazard Resolution (bypass network).
//!
//! This module resolves register operands for execute-1 against results that
//! have not reached the register file yet. It provides:
//! 1. **Candidate Sources:** Each in-flight producer with its destination and,
//!    once known, its value.
//! 2. **Ordered Search:** The first candidate writing the register decides;
//!    if its value is not available yet the consumer stalls.
//!
//! Execute-1 searches `[execute-2 in-flight, execute-1 pending]` and falls back
//! to the value captured at decode handoff.

/// A producer that may supply a register value to execute-1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BypassSource {
    /// Destination register of the producer (0 never matches).
    pub rd: usize,
    /// The produced value, or `None` while the unit is still computing it.
    pub value: Option<u64>,
}

impl BypassSource {
    /// A producer whose result is already known.
    pub const fn ready(rd: usize, value: u64) -> Self {
        Self {
            rd,
            value: Some(value),
        }
    }

    /// A producer that will write `rd` but has no result yet.
    pub const fn pending(rd: usize) -> Self {
        Self { rd, value: None }
    }
}

/// Resolves one source operand.
///
/// # Arguments
///
/// * `reg` - Source register index.
/// * `register_value` - Value read from the register file (already refreshed by writeback).
/// * `candidates` - Bypass sources in priority order.
///
/// # Returns
///
/// `Some(value)` when the operand is available, `None` when the consumer must stall.
pub fn resolve_operand<'a>(
    reg: usize,
    register_value: u64,
    candidates: impl IntoIterator<Item = &'a BypassSource>,
) -> Option<u64> {
    if reg == 0 {
        return Some(0);
    }
    candidates
        .into_iter()
        .find(|c| c.rd == reg)
        .map_or(Some(register_value), |c| c.value)
}
