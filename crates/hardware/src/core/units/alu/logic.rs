//! ALU logical and comparison operations.
//!
//! Bitwise OR, AND, XOR, set-less-than and the branch comparator. Logical
//! operations ignore `is32`: the word forms only exist for add, sub and shifts.

use crate::core::pipeline::signals::{AluOp, CmpOp};

/// Executes a logical or set-less-than operation; other operations return 0.
pub fn execute(op: AluOp, a: u64, b: u64) -> u64 {
    match op {
        AluOp::Or => a | b,
        AluOp::And => a & b,
        AluOp::Xor => a ^ b,
        AluOp::Slt => ((a as i64) < (b as i64)) as u64,
        AluOp::Sltu => (a < b) as u64,
        _ => 0,
    }
}

/// Evaluates a branch condition.
///
/// # Arguments
///
/// * `op` - Comparison function.
/// * `a` - `rs1` value.
/// * `b` - `rs2` value.
///
/// # Returns
///
/// `true` when the branch is taken.
pub fn compare(op: CmpOp, a: u64, b: u64) -> bool {
    match op {
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
        CmpOp::Lt => (a as i64) < (b as i64),
        CmpOp::Ge => (a as i64) >= (b as i64),
        CmpOp::Ltu => a < b,
        CmpOp::Geu => a >= b,
    }
}
