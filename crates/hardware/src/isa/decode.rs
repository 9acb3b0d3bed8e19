//! Immediate extraction.
//!
//! Sign-extended immediates for the I, S, B, U and J formats, plus the two
//! compressed control-flow formats (CJ and CB) needed to predict compressed
//! jumps and branches without expanding them first.

/// Total width of a RISC-V instruction in bits.
const INSTRUCTION_WIDTH: u32 = 32;

/// Bit shift for the I-Type immediate (bits 20-31).
const I_IMM_SHIFT: u32 = 20;

/// Bit mask for the U-Type immediate (bits 12-31).
const U_IMM_MASK: u32 = 0xFFFF_F000;

/// Width of the S-Type immediate.
const S_IMM_BITS: u32 = 12;

/// Width of the B-Type immediate.
const B_IMM_BITS: u32 = 13;

/// Width of the J-Type immediate.
const J_IMM_BITS: u32 = 21;

/// Width of the CJ-format immediate (C.J, C.JAL).
const CJ_IMM_BITS: u32 = 12;

/// Width of the CB-format branch immediate (C.BEQZ, C.BNEZ).
const CB_IMM_BITS: u32 = 9;

/// Decodes the I-Type immediate (`imm[11:0] | rs1 | funct3 | rd | opcode`).
#[inline]
pub const fn i_imm(inst: u32) -> i64 {
    ((inst as i32) >> I_IMM_SHIFT) as i64
}

/// Decodes the S-Type immediate (`imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`).
#[inline]
pub const fn s_imm(inst: u32) -> i64 {
    let low = (inst >> 7) & 0x1F;
    let high = (inst >> 25) & 0x7F;
    sign_extend((high << 5) | low, S_IMM_BITS)
}

/// Decodes the B-Type immediate.
///
/// `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`.
/// The result is always even.
#[inline]
pub const fn b_imm(inst: u32) -> i64 {
    let bit_11 = (inst >> 7) & 0x1;
    let bits_4_1 = (inst >> 8) & 0xF;
    let bits_10_5 = (inst >> 25) & 0x3F;
    let bit_12 = (inst >> 31) & 0x1;
    sign_extend(
        (bit_12 << 12) | (bit_11 << 11) | (bits_10_5 << 5) | (bits_4_1 << 1),
        B_IMM_BITS,
    )
}

/// Decodes the U-Type immediate (already shifted into bits 12-31, sign-extended to 64).
#[inline]
pub const fn u_imm(inst: u32) -> i64 {
    ((inst & U_IMM_MASK) as i32) as i64
}

/// Decodes the J-Type immediate.
///
/// `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`.
#[inline]
pub const fn j_imm(inst: u32) -> i64 {
    let bits_19_12 = (inst >> 12) & 0xFF;
    let bit_11 = (inst >> 20) & 0x1;
    let bits_10_1 = (inst >> 21) & 0x3FF;
    let bit_20 = (inst >> 31) & 0x1;
    sign_extend(
        (bit_20 << 20) | (bits_19_12 << 12) | (bit_11 << 11) | (bits_10_1 << 1),
        J_IMM_BITS,
    )
}

/// Decodes the CJ-format jump offset (`C.J`).
///
/// Bit layout (instruction bits → offset bits):
/// 12→11, 11→4, 10:9→9:8, 8→10, 7→6, 6→7, 5:3→3:1, 2→5.
#[inline]
pub const fn cj_imm(inst: u32) -> i64 {
    let off = (((inst >> 12) & 0x1) << 11)
        | (((inst >> 11) & 0x1) << 4)
        | (((inst >> 9) & 0x3) << 8)
        | (((inst >> 8) & 0x1) << 10)
        | (((inst >> 7) & 0x1) << 6)
        | (((inst >> 6) & 0x1) << 7)
        | (((inst >> 3) & 0x7) << 1)
        | (((inst >> 2) & 0x1) << 5);
    sign_extend(off, CJ_IMM_BITS)
}

/// Decodes the CB-format branch offset (`C.BEQZ`, `C.BNEZ`).
///
/// Bit layout: 12→8, 11:10→4:3, 6:5→7:6, 4:3→2:1, 2→5.
#[inline]
pub const fn cb_imm(inst: u32) -> i64 {
    let off = (((inst >> 12) & 0x1) << 8)
        | (((inst >> 10) & 0x3) << 3)
        | (((inst >> 5) & 0x3) << 6)
        | (((inst >> 3) & 0x3) << 1)
        | (((inst >> 2) & 0x1) << 5);
    sign_extend(off, CB_IMM_BITS)
}

/// Sign extends a value of `bits` width to a 64-bit signed integer.
#[inline]
const fn sign_extend(val: u32, bits: u32) -> i64 {
    let shift = INSTRUCTION_WIDTH - bits;
    (((val << shift) as i32) >> shift) as i64
}
