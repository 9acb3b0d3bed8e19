//! RISC-V architectural state.
//!
//! 1. **CSRs:** The control and status register file, trap entry and return.
//! 2. **Modes:** Privilege mode definitions.

/// Control and Status Register (CSR) file and trap logic.
pub mod csr;

/// Privilege mode definitions.
pub mod mode;

pub use csr::{CsrFile, InterruptLines, TrapReturn};
pub use mode::PrivilegeMode;
