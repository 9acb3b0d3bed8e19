//! Integer register file.
//!
//! This module provides the `RegisterFile` struct, the architectural `x0`..`x31`
//! storage written only by execute-2 commit. It provides:
//! 1. **Storage:** 32 × 64-bit general-purpose registers.
//! 2. **Hardwired Zero:** Reads of `x0` return zero and writes to it are dropped.
//! 3. **Observability:** A `tracing` dump of the register state.

use tracing::debug;

use super::constants::NUM_REGISTERS;

/// ABI names used when dumping register state.
const ABI_NAMES: [&str; NUM_REGISTERS] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// General-purpose register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u64; NUM_REGISTERS],
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a value from a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Register `x0` always returns 0.
    ///
    /// # Returns
    ///
    /// The 64-bit value stored in the specified register.
    #[inline(always)]
    pub fn read(&self, idx: usize) -> u64 {
        if idx == 0 {
            0
        } else {
            self.regs[idx & (NUM_REGISTERS - 1)]
        }
    }

    /// Writes a value to a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Writes to `x0` are ignored.
    /// * `val` - The 64-bit value to write.
    #[inline(always)]
    pub fn write(&mut self, idx: usize, val: u64) {
        if idx != 0 {
            self.regs[idx & (NUM_REGISTERS - 1)] = val;
        }
    }

    /// Emits every non-zero register as a `debug` event.
    pub fn dump(&self) {
        for (idx, (name, val)) in ABI_NAMES.iter().zip(self.regs.iter()).enumerate() {
            if *val != 0 {
                debug!(target: "WB", "x{idx:<2} ({name:>4}) = {val:#018x}");
            }
        }
    }
}
