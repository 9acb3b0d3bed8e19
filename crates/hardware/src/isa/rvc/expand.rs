//! Compressed Instruction Expansion.
//!
//! Converts a 16-bit RV64C integer instruction into the 32-bit encoding it
//! abbreviates. The decoder then handles the result like any other full-width
//! instruction. Reserved encodings, the floating-point forms and HINTs that
//! would otherwise need special handling expand to `0`, which is never a legal
//! instruction, so the caller reports it as illegal with the original halfword.

use super::constants::{PRIME_REG_BASE, QUADRANT_0, QUADRANT_1, QUADRANT_2, RA, SP, q0, q1, q2};
use crate::isa::decode::{cb_imm, cj_imm};
use crate::isa::opcodes::{alu, branch, funct7, major, mem};
use crate::isa::privileged::opcodes::EBREAK;

/// Expands a 16-bit RVC instruction into its 32-bit equivalent.
///
/// # Arguments
///
/// * `inst` - The compressed instruction (low halfword of the fetch word).
///
/// # Returns
///
/// The 32-bit expansion, or `0` for an illegal or unsupported encoding.
pub fn expand(inst: u16) -> u32 {
    let op = inst & 0x3;
    let funct3 = (inst >> 13) & 0x7;

    match op {
        QUADRANT_0 => quadrant0(inst, funct3),
        QUADRANT_1 => quadrant1(inst, funct3),
        QUADRANT_2 => quadrant2(inst, funct3),
        _ => 0,
    }
}

fn quadrant0(inst: u16, funct3: u16) -> u32 {
    let rs1 = prime(inst, 7);
    let rd_rs2 = prime(inst, 2);
    match funct3 {
        q0::C_ADDI4SPN => {
            let imm = bits(inst, 6, 1) << 2
                | bits(inst, 5, 1) << 3
                | bits(inst, 11, 0x3) << 4
                | bits(inst, 7, 0xF) << 6;
            if imm == 0 {
                return 0;
            }
            i_type(imm, SP, alu::ADD_SUB, rd_rs2, major::OP_IMM)
        }
        q0::C_LW => i_type(word_offset(inst), rs1, mem::W, rd_rs2, major::LOAD),
        q0::C_LD => i_type(double_offset(inst), rs1, mem::D, rd_rs2, major::LOAD),
        q0::C_SW => s_type(word_offset(inst), rd_rs2, rs1, mem::W),
        q0::C_SD => s_type(double_offset(inst), rd_rs2, rs1, mem::D),
        _ => 0,
    }
}

fn quadrant1(inst: u16, funct3: u16) -> u32 {
    let rd = bits(inst, 7, 0x1F);
    let imm6 = ci_imm(inst);
    match funct3 {
        q1::C_ADDI => i_type(imm6, rd, alu::ADD_SUB, rd, major::OP_IMM),
        q1::C_ADDIW => {
            if rd == 0 {
                return 0;
            }
            i_type(imm6, rd, alu::ADD_SUB, rd, major::OP_IMM_32)
        }
        q1::C_LI => i_type(imm6, 0, alu::ADD_SUB, rd, major::OP_IMM),
        q1::C_LUI_ADDI16SP if rd == SP => {
            let imm = sign_extend(
                bits(inst, 6, 1) << 4
                    | bits(inst, 2, 1) << 5
                    | bits(inst, 5, 1) << 6
                    | bits(inst, 3, 0x3) << 7
                    | bits(inst, 12, 1) << 9,
                10,
            );
            if imm == 0 {
                return 0;
            }
            i_type(imm, SP, alu::ADD_SUB, SP, major::OP_IMM)
        }
        q1::C_LUI_ADDI16SP => {
            if imm6 == 0 {
                return 0;
            }
            (imm6 << 12) | (rd << 7) | major::LUI
        }
        q1::C_MISC_ALU => misc_alu(inst),
        q1::C_J => {
            let off = cj_imm(inst as u32) as u32;
            j_type(off, 0)
        }
        q1::C_BEQZ => b_type(cb_imm(inst as u32) as u32, 0, prime(inst, 7), branch::BEQ),
        q1::C_BNEZ => b_type(cb_imm(inst as u32) as u32, 0, prime(inst, 7), branch::BNE),
        _ => 0,
    }
}

/// C.SRLI / C.SRAI / C.ANDI and the CA-format register group.
fn misc_alu(inst: u16) -> u32 {
    let rd = prime(inst, 7);
    let rs2 = prime(inst, 2);
    let shamt = ci_imm(inst) & 0x3F;
    match bits(inst, 10, 0x3) {
        0 => i_type(shamt, rd, alu::SRL_SRA, rd, major::OP_IMM),
        1 => i_type((funct7::ALT << 5) | shamt, rd, alu::SRL_SRA, rd, major::OP_IMM),
        2 => i_type(ci_imm(inst), rd, alu::AND, rd, major::OP_IMM),
        _ => match (bits(inst, 12, 1), bits(inst, 5, 0x3)) {
            (0, 0) => r_type(funct7::ALT, rs2, rd, alu::ADD_SUB, rd, major::OP),
            (0, 1) => r_type(funct7::DEFAULT, rs2, rd, alu::XOR, rd, major::OP),
            (0, 2) => r_type(funct7::DEFAULT, rs2, rd, alu::OR, rd, major::OP),
            (0, 3) => r_type(funct7::DEFAULT, rs2, rd, alu::AND, rd, major::OP),
            (1, 0) => r_type(funct7::ALT, rs2, rd, alu::ADD_SUB, rd, major::OP_32),
            (1, 1) => r_type(funct7::DEFAULT, rs2, rd, alu::ADD_SUB, rd, major::OP_32),
            _ => 0,
        },
    }
}

fn quadrant2(inst: u16, funct3: u16) -> u32 {
    let rd = bits(inst, 7, 0x1F);
    let rs2 = bits(inst, 2, 0x1F);
    match funct3 {
        q2::C_SLLI => {
            if rd == 0 {
                return 0;
            }
            let shamt = bits(inst, 2, 0x1F) | bits(inst, 12, 1) << 5;
            i_type(shamt, rd, alu::SLL, rd, major::OP_IMM)
        }
        q2::C_LWSP => {
            if rd == 0 {
                return 0;
            }
            let imm = bits(inst, 12, 1) << 5 | bits(inst, 4, 0x7) << 2 | bits(inst, 2, 0x3) << 6;
            i_type(imm, SP, mem::W, rd, major::LOAD)
        }
        q2::C_LDSP => {
            if rd == 0 {
                return 0;
            }
            let imm = bits(inst, 12, 1) << 5 | bits(inst, 5, 0x3) << 3 | bits(inst, 2, 0x7) << 6;
            i_type(imm, SP, mem::D, rd, major::LOAD)
        }
        q2::C_MISC_ALU => match (bits(inst, 12, 1), rd, rs2) {
            (0, 0, 0) => 0,
            (0, rs1, 0) => i_type(0, rs1, 0, 0, major::JALR),
            (0, rd, rs2) => r_type(funct7::DEFAULT, rs2, 0, alu::ADD_SUB, rd, major::OP),
            (_, 0, 0) => EBREAK,
            (_, rs1, 0) => i_type(0, rs1, 0, RA, major::JALR),
            (_, rd, rs2) => r_type(funct7::DEFAULT, rs2, rd, alu::ADD_SUB, rd, major::OP),
        },
        q2::C_SWSP => {
            let imm = bits(inst, 9, 0xF) << 2 | bits(inst, 7, 0x3) << 6;
            s_type(imm, rs2, SP, mem::W)
        }
        q2::C_SDSP => {
            let imm = bits(inst, 10, 0x7) << 3 | bits(inst, 7, 0x7) << 6;
            s_type(imm, rs2, SP, mem::D)
        }
        _ => 0,
    }
}

#[inline]
fn bits(inst: u16, shift: u32, mask: u32) -> u32 {
    (inst as u32 >> shift) & mask
}

/// Three-bit register field mapped onto x8..x15.
#[inline]
fn prime(inst: u16, shift: u32) -> u32 {
    PRIME_REG_BASE + bits(inst, shift, 0x7)
}

/// CI-format 6-bit signed immediate (`imm[5]` in bit 12, `imm[4:0]` in bits 6:2).
#[inline]
fn ci_imm(inst: u16) -> u32 {
    sign_extend(bits(inst, 2, 0x1F) | bits(inst, 12, 1) << 5, 6)
}

/// CL/CS word offset: `uimm[5:3]` in bits 12:10, `uimm[2]` in bit 6, `uimm[6]` in bit 5.
#[inline]
fn word_offset(inst: u16) -> u32 {
    bits(inst, 10, 0x7) << 3 | bits(inst, 6, 1) << 2 | bits(inst, 5, 1) << 6
}

/// CL/CS doubleword offset: `uimm[5:3]` in bits 12:10, `uimm[7:6]` in bits 6:5.
#[inline]
fn double_offset(inst: u16) -> u32 {
    bits(inst, 10, 0x7) << 3 | bits(inst, 5, 0x3) << 6
}

#[inline]
fn i_type(imm: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    ((imm & 0xFFF) << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

#[inline]
fn s_type(imm: u32, rs2: u32, rs1: u32, funct3: u32) -> u32 {
    ((imm >> 5 & 0x7F) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | ((imm & 0x1F) << 7)
        | major::STORE
}

#[inline]
fn r_type(funct7: u32, rs2: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    (funct7 << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

#[inline]
fn b_type(off: u32, rs2: u32, rs1: u32, funct3: u32) -> u32 {
    ((off >> 12 & 1) << 31)
        | ((off >> 5 & 0x3F) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | ((off >> 1 & 0xF) << 8)
        | ((off >> 11 & 1) << 7)
        | major::BRANCH
}

#[inline]
fn j_type(off: u32, rd: u32) -> u32 {
    ((off >> 20 & 1) << 31)
        | ((off >> 1 & 0x3FF) << 21)
        | ((off >> 11 & 1) << 20)
        | ((off >> 12 & 0xFF) << 12)
        | (rd << 7)
        | major::JAL
}

/// Sign-extends a value from `bits` width to 32 bits.
#[inline]
fn sign_extend(val: u32, bits: u32) -> u32 {
    let shift = 32 - bits;
    ((val << shift) as i32 >> shift) as u32
}
