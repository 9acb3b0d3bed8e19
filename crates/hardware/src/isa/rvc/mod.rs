//! RISC-V Compressed Extension (C).
//!
//! # Structure
//!
//! - `constants`: Quadrant and `funct3` selectors for the integer subset.
//! - `expand`: 16-bit to 32-bit expansion, returning 0 for illegal encodings.

/// Compressed instruction quadrant and opcode constants.
pub mod constants;

/// Logic to expand 16-bit compressed instructions into 32-bit equivalents.
pub mod expand;

pub use expand::expand;
