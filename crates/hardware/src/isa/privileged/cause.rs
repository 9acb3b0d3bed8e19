//! RISC-V Trap Cause Codes.
//!
//! Exception and interrupt codes as stored in the low bits of `mcause`/`scause`.
//! The interrupt flag (bit 63) is applied by [`Trap::cause`](crate::common::Trap::cause);
//! the codes here double as bit positions in `mip`, `mie`, `medeleg` and `mideleg`.

/// Interrupt codes.
pub mod interrupt {
    /// Supervisor software interrupt.
    pub const SUPERVISOR_SOFTWARE: u64 = 1;
    /// Machine software interrupt.
    pub const MACHINE_SOFTWARE: u64 = 3;
    /// Supervisor timer interrupt.
    pub const SUPERVISOR_TIMER: u64 = 5;
    /// Machine timer interrupt.
    pub const MACHINE_TIMER: u64 = 7;
    /// Supervisor external interrupt.
    pub const SUPERVISOR_EXTERNAL: u64 = 9;
    /// Machine external interrupt.
    pub const MACHINE_EXTERNAL: u64 = 11;
}

/// Exception codes.
pub mod exception {
    /// Instruction address misaligned (0).
    pub const INSTRUCTION_ADDRESS_MISALIGNED: u64 = 0;
    /// Instruction access fault (1).
    pub const INSTRUCTION_ACCESS_FAULT: u64 = 1;
    /// Illegal instruction (2).
    pub const ILLEGAL_INSTRUCTION: u64 = 2;
    /// Breakpoint (3).
    pub const BREAKPOINT: u64 = 3;
    /// Load address misaligned (4).
    pub const LOAD_ADDRESS_MISALIGNED: u64 = 4;
    /// Load access fault (5).
    pub const LOAD_ACCESS_FAULT: u64 = 5;
    /// Store/AMO address misaligned (6).
    pub const STORE_ADDRESS_MISALIGNED: u64 = 6;
    /// Store/AMO access fault (7).
    pub const STORE_ACCESS_FAULT: u64 = 7;
    /// Environment call from U-mode (8).
    pub const ENVIRONMENT_CALL_FROM_U_MODE: u64 = 8;
    /// Environment call from S-mode (9).
    pub const ENVIRONMENT_CALL_FROM_S_MODE: u64 = 9;
    /// Environment call from M-mode (11).
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u64 = 11;
    /// Instruction page fault (12).
    pub const INSTRUCTION_PAGE_FAULT: u64 = 12;
    /// Load page fault (13).
    pub const LOAD_PAGE_FAULT: u64 = 13;
    /// Store/AMO page fault (15).
    pub const STORE_PAGE_FAULT: u64 = 15;
}
