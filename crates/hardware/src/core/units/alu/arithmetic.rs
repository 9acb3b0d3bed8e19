//! Integer arithmetic.
//!
//! Add and subtract for the ALU, plus the M-extension multiply and divide
//! kernels used by the multi-cycle units. All 32-bit (`is32 == true`) results
//! are sign-extended from bit 31 to 64 bits.

use crate::core::pipeline::signals::{AluOp, DivOp, MulOp};

/// Number of bits in XLEN for RV64 (used for high-multiply shift).
const XLEN_BITS: u32 = 64;

/// Executes `Add` or `Sub`; other operations return 0.
pub fn execute(op: AluOp, a: u64, b: u64, is32: bool) -> u64 {
    match (op, is32) {
        (AluOp::Add, true) => (a as i32).wrapping_add(b as i32) as i64 as u64,
        (AluOp::Add, false) => a.wrapping_add(b),
        (AluOp::Sub, true) => (a as i32).wrapping_sub(b as i32) as i64 as u64,
        (AluOp::Sub, false) => a.wrapping_sub(b),
        _ => 0,
    }
}

/// Computes a multiply result.
///
/// # Arguments
///
/// * `op` - Which half of the product, and operand signedness.
/// * `a`, `b` - Operands.
/// * `is32` - `MULW` (only `Mul` has a word form).
pub fn multiply(op: MulOp, a: u64, b: u64, is32: bool) -> u64 {
    if is32 {
        return (a as i32).wrapping_mul(b as i32) as i64 as u64;
    }
    match op {
        MulOp::Mul => a.wrapping_mul(b),
        // Sign-extend through i64 so negative operands stay negative in i128.
        MulOp::Mulh => (((a as i64 as i128) * (b as i64 as i128)) >> XLEN_BITS) as u64,
        MulOp::Mulhsu => (((a as i64 as i128) * (b as u128 as i128)) >> XLEN_BITS) as u64,
        MulOp::Mulhu => (((a as u128) * (b as u128)) >> XLEN_BITS) as u64,
    }
}

/// Computes a divide or remainder result.
///
/// Division by zero yields all ones (quotient) or the dividend (remainder);
/// signed overflow yields the dividend (quotient) or zero (remainder). No trap
/// is raised in either case.
pub fn divide(op: DivOp, a: u64, b: u64, is32: bool) -> u64 {
    if is32 {
        let (a32, b32) = (a as u32, b as u32);
        let r = match op {
            DivOp::Div if b32 == 0 => u32::MAX,
            DivOp::Div => (a32 as i32).wrapping_div(b32 as i32) as u32,
            DivOp::Divu if b32 == 0 => u32::MAX,
            DivOp::Divu => a32 / b32,
            DivOp::Rem if b32 == 0 => a32,
            DivOp::Rem => (a32 as i32).wrapping_rem(b32 as i32) as u32,
            DivOp::Remu if b32 == 0 => a32,
            DivOp::Remu => a32 % b32,
        };
        return r as i32 as i64 as u64;
    }
    match op {
        DivOp::Div if b == 0 => u64::MAX,
        DivOp::Div => (a as i64).wrapping_div(b as i64) as u64,
        DivOp::Divu if b == 0 => u64::MAX,
        DivOp::Divu => a / b,
        DivOp::Rem if b == 0 => a,
        DivOp::Rem => (a as i64).wrapping_rem(b as i64) as u64,
        DivOp::Remu if b == 0 => a,
        DivOp::Remu => a % b,
    }
}
