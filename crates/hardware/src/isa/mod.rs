//! Instruction Set Architecture (ISA) Definitions.
//!
//! Encodings, field extraction and immediate decoding for the subset the core
//! executes: RV64I, M, A, Zicsr, Zifencei, the privileged instructions and the
//! integer part of C.

/// Immediate decoding for every instruction format.
pub mod decode;

/// Instruction field extraction.
pub mod instruction;

/// Major opcodes and function codes for RV64I/M/A.
pub mod opcodes;

/// Privileged architecture definitions (trap causes, system instructions).
pub mod privileged;

/// Compressed instruction extension (16-bit instruction encoding).
pub mod rvc;
