//! System instruction encodings.
//!
//! Fixed encodings for the SYSTEM-opcode instructions that carry no operands,
//! plus the CSR `funct3` selectors.

/// Environment call.
pub const ECALL: u32 = 0x0000_0073;

/// Environment break.
pub const EBREAK: u32 = 0x0010_0073;

/// Machine-mode trap return.
pub const MRET: u32 = 0x3020_0073;

/// Supervisor-mode trap return.
pub const SRET: u32 = 0x1020_0073;

/// Wait for interrupt.
pub const WFI: u32 = 0x1050_0073;

/// `funct7` of SFENCE.VMA (rs1/rs2 select address and ASID).
pub const SFENCE_VMA_FUNCT7: u32 = 0b000_1001;

/// `funct3` of the non-CSR SYSTEM instructions.
pub const PRIV: u32 = 0b000;

/// CSR read/write.
pub const CSRRW: u32 = 0b001;
/// CSR read and set bits.
pub const CSRRS: u32 = 0b010;
/// CSR read and clear bits.
pub const CSRRC: u32 = 0b011;
/// CSR read/write immediate.
pub const CSRRWI: u32 = 0b101;
/// CSR read and set bits immediate.
pub const CSRRSI: u32 = 0b110;
/// CSR read and clear bits immediate.
pub const CSRRCI: u32 = 0b111;
