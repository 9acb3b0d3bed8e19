//! Compressed instruction quadrants and `funct3` selectors.
//!
//! Only the integer subset is listed. The floating-point slots (C.FLD, C.FSD,
//! C.FLDSP, C.FSDSP) are absent so they fall through to the illegal encoding.

/// Quadrant 0 (bits 1:0 = 00).
pub const QUADRANT_0: u16 = 0b00;
/// Quadrant 1 (bits 1:0 = 01).
pub const QUADRANT_1: u16 = 0b01;
/// Quadrant 2 (bits 1:0 = 10).
pub const QUADRANT_2: u16 = 0b10;

/// Base register number of the 3-bit `rd'`/`rs1'`/`rs2'` fields (x8..x15).
pub const PRIME_REG_BASE: u32 = 8;

/// Stack pointer register number.
pub const SP: u32 = 2;

/// Link register number.
pub const RA: u32 = 1;

/// Instructions in Quadrant 0.
pub mod q0 {
    /// C.ADDI4SPN.
    pub const C_ADDI4SPN: u16 = 0b000;
    /// C.LW.
    pub const C_LW: u16 = 0b010;
    /// C.LD.
    pub const C_LD: u16 = 0b011;
    /// C.SW.
    pub const C_SW: u16 = 0b110;
    /// C.SD.
    pub const C_SD: u16 = 0b111;
}

/// Instructions in Quadrant 1.
pub mod q1 {
    /// C.ADDI (C.NOP when rd = 0).
    pub const C_ADDI: u16 = 0b000;
    /// C.ADDIW.
    pub const C_ADDIW: u16 = 0b001;
    /// C.LI.
    pub const C_LI: u16 = 0b010;
    /// C.LUI, or C.ADDI16SP when rd = sp.
    pub const C_LUI_ADDI16SP: u16 = 0b011;
    /// C.SRLI, C.SRAI, C.ANDI and the register-register group.
    pub const C_MISC_ALU: u16 = 0b100;
    /// C.J.
    pub const C_J: u16 = 0b101;
    /// C.BEQZ.
    pub const C_BEQZ: u16 = 0b110;
    /// C.BNEZ.
    pub const C_BNEZ: u16 = 0b111;
}

/// Instructions in Quadrant 2.
pub mod q2 {
    /// C.SLLI.
    pub const C_SLLI: u16 = 0b000;
    /// C.LWSP.
    pub const C_LWSP: u16 = 0b010;
    /// C.LDSP.
    pub const C_LDSP: u16 = 0b011;
    /// C.JR, C.MV, C.EBREAK, C.JALR, C.ADD.
    pub const C_MISC_ALU: u16 = 0b100;
    /// C.SWSP.
    pub const C_SWSP: u16 = 0b110;
    /// C.SDSP.
    pub const C_SDSP: u16 = 0b111;
}
