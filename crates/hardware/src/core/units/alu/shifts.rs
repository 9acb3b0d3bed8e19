//! ALU shift operations.
//!
//! Shift amounts are masked to 6 bits (0–63) for RV64 and 5 bits (0–31)
//! for the word forms. All 32-bit results are sign-extended from bit 31.

use crate::core::pipeline::signals::AluOp;

/// Bit mask for shift amount in RV64 (6 bits: 0-63).
const SHAMT_MASK_RV64: u64 = 0x3f;

/// Bit mask for shift amount of the word forms (5 bits: 0-31).
const SHAMT_MASK_WORD: u64 = 0x1f;

/// Executes `Sll`, `Srl` or `Sra`; other operations return 0.
pub fn execute(op: AluOp, a: u64, b: u64, is32: bool) -> u64 {
    if is32 {
        let sh = (b & SHAMT_MASK_WORD) as u32;
        let word = match op {
            AluOp::Sll => (a as u32) << sh,
            AluOp::Srl => (a as u32) >> sh,
            AluOp::Sra => ((a as i32) >> sh) as u32,
            _ => return 0,
        };
        return word as i32 as i64 as u64;
    }
    let sh = (b & SHAMT_MASK_RV64) as u32;
    match op {
        AluOp::Sll => a << sh,
        AluOp::Srl => a >> sh,
        AluOp::Sra => ((a as i64) >> sh) as u64,
        _ => 0,
    }
}
