//! RISC-V Privilege Modes.
//!
//! This module defines the privilege levels of the core. It implements the following:
//! 1. **Mode Classification:** User (U), Supervisor (S), and Machine (M) modes.
//! 2. **Encoding:** Conversion to and from the 2-bit `MPP`/CSR-address encoding.
//! 3. **Observability:** Display formatting for trace output.

use std::fmt;

/// RISC-V privilege mode levels, ordered from least to most privileged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivilegeMode {
    /// User mode (U-mode).
    User = 0,

    /// Supervisor mode (S-mode).
    Supervisor = 1,

    /// Machine mode (M-mode). The reset privilege.
    #[default]
    Machine = 3,
}

impl PrivilegeMode {
    /// Decodes a 2-bit privilege field.
    ///
    /// The reserved value `2` is WARL-mapped to `User`, matching what a write of
    /// an unsupported mode to `mstatus.MPP` reads back as.
    ///
    /// # Arguments
    ///
    /// * `bits` - The field value; only the low two bits are used.
    pub const fn from_bits(bits: u64) -> Self {
        match bits & 0x3 {
            3 => Self::Machine,
            1 => Self::Supervisor,
            _ => Self::User,
        }
    }

    /// Returns the 2-bit encoding of the mode.
    pub const fn bits(self) -> u64 {
        self as u64
    }

    /// Returns the single-letter name used in trace output.
    pub const fn letter(self) -> char {
        match self {
            Self::User => 'U',
            Self::Supervisor => 'S',
            Self::Machine => 'M',
        }
    }
}

impl fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "User",
            Self::Supervisor => "Supervisor",
            Self::Machine => "Machine",
        };
        f.write_str(name)
    }
}
