//! Core-wide constants.
//!
//! Instruction sizing, alignment, and the trap-cause encoding shared between the
//! fetch unit, the decoder and the CSR unit.

/// Size of a compressed (16-bit) RISC-V instruction in bytes.
pub const INSTRUCTION_SIZE_16: u64 = 2;

/// Size of a standard (32-bit) RISC-V instruction in bytes.
pub const INSTRUCTION_SIZE_32: u64 = 4;

/// Mask for the two low bits that distinguish compressed encodings.
pub const COMPRESSED_INSTRUCTION_MASK: u32 = 0x3;

/// Low-bit pattern of a full-width (non-compressed) instruction.
pub const UNCOMPRESSED_INSTRUCTION_VALUE: u32 = 0x3;

/// Bit mask indicating that a trap cause represents an interrupt.
pub const CAUSE_INTERRUPT_BIT: u64 = 1 << 63;

/// Number of architectural integer registers.
pub const NUM_REGISTERS: usize = 32;

/// Returns `true` when the low bits of `word` mark a 32-bit encoding.
#[inline(always)]
pub const fn is_full_width(word: u32) -> bool {
    word & COMPRESSED_INSTRUCTION_MASK == UNCOMPRESSED_INSTRUCTION_VALUE
}

/// Returns the byte length of the instruction whose first halfword is in `word`.
#[inline(always)]
pub const fn instruction_size(word: u32) -> u64 {
    if is_full_width(word) {
        INSTRUCTION_SIZE_32
    } else {
        INSTRUCTION_SIZE_16
    }
}
