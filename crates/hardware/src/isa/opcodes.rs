//! Major opcodes and function codes for the integer instruction sets.
//!
//! Grouped per encoding field rather than per extension: the decoder matches on
//! the major opcode first and then on `funct3`/`funct7`/`funct5`, so the tables
//! mirror that order.

/// Major opcodes (bits 6-0).
pub mod major {
    /// Load instructions (LB, LH, LW, LD, LBU, LHU, LWU).
    pub const LOAD: u32 = 0b000_0011;
    /// Memory ordering instructions (FENCE, FENCE.I).
    pub const MISC_MEM: u32 = 0b000_1111;
    /// Immediate arithmetic (ADDI, SLTI, SLLI, ...).
    pub const OP_IMM: u32 = 0b001_0011;
    /// Add upper immediate to PC.
    pub const AUIPC: u32 = 0b001_0111;
    /// 32-bit immediate arithmetic (ADDIW, SLLIW, ...).
    pub const OP_IMM_32: u32 = 0b001_1011;
    /// Store instructions (SB, SH, SW, SD).
    pub const STORE: u32 = 0b010_0011;
    /// Atomic memory operations (LR, SC, AMO*).
    pub const AMO: u32 = 0b010_1111;
    /// Register-register arithmetic, including the M extension.
    pub const OP: u32 = 0b011_0011;
    /// Load upper immediate.
    pub const LUI: u32 = 0b011_0111;
    /// 32-bit register-register arithmetic (ADDW, MULW, ...).
    pub const OP_32: u32 = 0b011_1011;
    /// Conditional branches.
    pub const BRANCH: u32 = 0b110_0011;
    /// Jump and link register.
    pub const JALR: u32 = 0b110_0111;
    /// Jump and link.
    pub const JAL: u32 = 0b110_1111;
    /// CSR access, environment calls and trap returns.
    pub const SYSTEM: u32 = 0b111_0011;
}

/// `funct3` values for loads and stores.
pub mod mem {
    /// Byte, signed on load.
    pub const B: u32 = 0b000;
    /// Halfword, signed on load.
    pub const H: u32 = 0b001;
    /// Word, signed on load.
    pub const W: u32 = 0b010;
    /// Doubleword.
    pub const D: u32 = 0b011;
    /// Byte, zero-extended.
    pub const BU: u32 = 0b100;
    /// Halfword, zero-extended.
    pub const HU: u32 = 0b101;
    /// Word, zero-extended.
    pub const WU: u32 = 0b110;
}

/// `funct3` values for conditional branches.
pub mod branch {
    /// Branch if equal.
    pub const BEQ: u32 = 0b000;
    /// Branch if not equal.
    pub const BNE: u32 = 0b001;
    /// Branch if less than (signed).
    pub const BLT: u32 = 0b100;
    /// Branch if greater or equal (signed).
    pub const BGE: u32 = 0b101;
    /// Branch if less than (unsigned).
    pub const BLTU: u32 = 0b110;
    /// Branch if greater or equal (unsigned).
    pub const BGEU: u32 = 0b111;
}

/// `funct3` values for integer arithmetic.
pub mod alu {
    /// ADD / SUB.
    pub const ADD_SUB: u32 = 0b000;
    /// Shift left logical.
    pub const SLL: u32 = 0b001;
    /// Set less than.
    pub const SLT: u32 = 0b010;
    /// Set less than unsigned.
    pub const SLTU: u32 = 0b011;
    /// Exclusive or.
    pub const XOR: u32 = 0b100;
    /// Shift right logical / arithmetic.
    pub const SRL_SRA: u32 = 0b101;
    /// Inclusive or.
    pub const OR: u32 = 0b110;
    /// And.
    pub const AND: u32 = 0b111;
}

/// `funct7` values for register-register arithmetic.
pub mod funct7 {
    /// ADD, SRL and the other default encodings.
    pub const DEFAULT: u32 = 0b000_0000;
    /// SUB and SRA.
    pub const ALT: u32 = 0b010_0000;
    /// M extension selector.
    pub const MULDIV: u32 = 0b000_0001;
}

/// `funct3` values for the M extension.
pub mod muldiv {
    /// Low 64 bits of signed × signed.
    pub const MUL: u32 = 0b000;
    /// High bits of signed × signed.
    pub const MULH: u32 = 0b001;
    /// High bits of signed × unsigned.
    pub const MULHSU: u32 = 0b010;
    /// High bits of unsigned × unsigned.
    pub const MULHU: u32 = 0b011;
    /// Signed divide.
    pub const DIV: u32 = 0b100;
    /// Unsigned divide.
    pub const DIVU: u32 = 0b101;
    /// Signed remainder.
    pub const REM: u32 = 0b110;
    /// Unsigned remainder.
    pub const REMU: u32 = 0b111;
}

/// `funct3` values for MISC-MEM.
pub mod fence {
    /// Data memory fence.
    pub const FENCE: u32 = 0b000;
    /// Instruction fence.
    pub const FENCE_I: u32 = 0b001;
}

/// Width selectors and `funct5` values for the A extension.
pub mod amo {
    /// 32-bit AMO.
    pub const WIDTH_W: u32 = 0b010;
    /// 64-bit AMO.
    pub const WIDTH_D: u32 = 0b011;

    /// Load-reserved.
    pub const LR: u32 = 0b00010;
    /// Store-conditional.
    pub const SC: u32 = 0b00011;
    /// Atomic swap.
    pub const SWAP: u32 = 0b00001;
    /// Atomic add.
    pub const ADD: u32 = 0b00000;
    /// Atomic xor.
    pub const XOR: u32 = 0b00100;
    /// Atomic and.
    pub const AND: u32 = 0b01100;
    /// Atomic or.
    pub const OR: u32 = 0b01000;
    /// Atomic signed minimum.
    pub const MIN: u32 = 0b10000;
    /// Atomic signed maximum.
    pub const MAX: u32 = 0b10100;
    /// Atomic unsigned minimum.
    pub const MINU: u32 = 0b11000;
    /// Atomic unsigned maximum.
    pub const MAXU: u32 = 0b11100;
}
