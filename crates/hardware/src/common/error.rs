//! Trap and error definitions.
//!
//! This module defines the error handling and trap mechanisms for the core. It provides:
//! 1. **Trap Representation:** Every synchronous exception and asynchronous interrupt the
//!    core can commit, with the faulting value carried as payload.
//! 2. **Trap Records:** The trap as it leaves execute-2 (cause, faulting PC, vector).
//! 3. **Host Errors:** Configuration failures reported through `thiserror`.

use std::fmt;

use thiserror::Error;

use super::constants::CAUSE_INTERRUPT_BIT;
use crate::isa::privileged::cause::{exception, interrupt};

/// RISC-V trap types representing exceptions and interrupts.
///
/// Fetch faults, decode illegality, execute-time memory faults and interrupts all
/// travel through the pipeline as a `Trap` and converge on execute-2, which commits
/// the instruction as a trap instead of executing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Instruction address misaligned exception.
    ///
    /// Raised when a taken branch or jump targets an address that is not aligned to
    /// the minimum instruction size. The associated value is the misaligned target.
    InstructionAddressMisaligned(u64),

    /// Instruction access fault exception.
    ///
    /// The associated value is the faulting fetch address.
    InstructionAccessFault(u64),

    /// Illegal instruction exception.
    ///
    /// Raised when an encoding is invalid, unimplemented, or not permitted at the
    /// current privilege level. The associated value is the instruction encoding
    /// (16 bits for compressed forms).
    IllegalInstruction(u32),

    /// Breakpoint exception (`EBREAK`). The associated value is the program counter.
    Breakpoint(u64),

    /// Load address misaligned exception. The associated value is the address.
    LoadAddressMisaligned(u64),

    /// Load access fault exception. The associated value is the address.
    LoadAccessFault(u64),

    /// Store/AMO address misaligned exception. The associated value is the address.
    StoreAddressMisaligned(u64),

    /// Store/AMO access fault exception. The associated value is the address.
    StoreAccessFault(u64),

    /// Environment call from user mode.
    EnvironmentCallFromUMode,

    /// Environment call from supervisor mode.
    EnvironmentCallFromSMode,

    /// Environment call from machine mode.
    EnvironmentCallFromMMode,

    /// Instruction page fault exception.
    ///
    /// The associated value is the faulting virtual address.
    InstructionPageFault(u64),

    /// Load page fault exception. The associated value is the virtual address.
    LoadPageFault(u64),

    /// Store/AMO page fault exception. The associated value is the virtual address.
    StorePageFault(u64),

    /// Supervisor software interrupt.
    SupervisorSoftwareInterrupt,

    /// Machine software interrupt.
    MachineSoftwareInterrupt,

    /// Supervisor timer interrupt.
    SupervisorTimerInterrupt,

    /// Machine timer interrupt.
    MachineTimerInterrupt,

    /// Supervisor external interrupt.
    SupervisorExternalInterrupt,

    /// Machine external interrupt.
    MachineExternalInterrupt,
}

impl Trap {
    /// Returns `true` for asynchronous interrupts.
    pub const fn is_interrupt(&self) -> bool {
        matches!(
            self,
            Self::SupervisorSoftwareInterrupt
                | Self::MachineSoftwareInterrupt
                | Self::SupervisorTimerInterrupt
                | Self::MachineTimerInterrupt
                | Self::SupervisorExternalInterrupt
                | Self::MachineExternalInterrupt
        )
    }

    /// Returns the exception or interrupt code without the interrupt bit.
    ///
    /// This is the bit index used for `medeleg`/`mideleg` lookups and for the
    /// vectored-mode offset.
    pub const fn code(&self) -> u64 {
        match self {
            Self::InstructionAddressMisaligned(_) => exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Self::InstructionAccessFault(_) => exception::INSTRUCTION_ACCESS_FAULT,
            Self::IllegalInstruction(_) => exception::ILLEGAL_INSTRUCTION,
            Self::Breakpoint(_) => exception::BREAKPOINT,
            Self::LoadAddressMisaligned(_) => exception::LOAD_ADDRESS_MISALIGNED,
            Self::LoadAccessFault(_) => exception::LOAD_ACCESS_FAULT,
            Self::StoreAddressMisaligned(_) => exception::STORE_ADDRESS_MISALIGNED,
            Self::StoreAccessFault(_) => exception::STORE_ACCESS_FAULT,
            Self::EnvironmentCallFromUMode => exception::ENVIRONMENT_CALL_FROM_U_MODE,
            Self::EnvironmentCallFromSMode => exception::ENVIRONMENT_CALL_FROM_S_MODE,
            Self::EnvironmentCallFromMMode => exception::ENVIRONMENT_CALL_FROM_M_MODE,
            Self::InstructionPageFault(_) => exception::INSTRUCTION_PAGE_FAULT,
            Self::LoadPageFault(_) => exception::LOAD_PAGE_FAULT,
            Self::StorePageFault(_) => exception::STORE_PAGE_FAULT,
            Self::SupervisorSoftwareInterrupt => interrupt::SUPERVISOR_SOFTWARE,
            Self::MachineSoftwareInterrupt => interrupt::MACHINE_SOFTWARE,
            Self::SupervisorTimerInterrupt => interrupt::SUPERVISOR_TIMER,
            Self::MachineTimerInterrupt => interrupt::MACHINE_TIMER,
            Self::SupervisorExternalInterrupt => interrupt::SUPERVISOR_EXTERNAL,
            Self::MachineExternalInterrupt => interrupt::MACHINE_EXTERNAL,
        }
    }

    /// Returns the value written to `mcause`/`scause`.
    ///
    /// # Returns
    ///
    /// The trap code with bit 63 set for interrupts.
    pub const fn cause(&self) -> u64 {
        if self.is_interrupt() {
            CAUSE_INTERRUPT_BIT | self.code()
        } else {
            self.code()
        }
    }

    /// Returns the value written to `mtval`/`stval`.
    ///
    /// Address faults report the faulting address, illegal instructions report
    /// the encoding, breakpoints report the PC, everything else reports zero.
    pub const fn tval(&self) -> u64 {
        match *self {
            Self::InstructionAddressMisaligned(a)
            | Self::InstructionAccessFault(a)
            | Self::Breakpoint(a)
            | Self::LoadAddressMisaligned(a)
            | Self::LoadAccessFault(a)
            | Self::StoreAddressMisaligned(a)
            | Self::StoreAccessFault(a)
            | Self::InstructionPageFault(a)
            | Self::LoadPageFault(a)
            | Self::StorePageFault(a) => a,
            Self::IllegalInstruction(inst) => inst as u64,
            _ => 0,
        }
    }
}

impl fmt::Display for Trap {
    /// Formats the trap for display.
    ///
    /// # Arguments
    ///
    /// * `f` - The formatter to write to.
    ///
    /// # Returns
    ///
    /// A formatting result indicating success or failure.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstructionAddressMisaligned(addr) => {
                write!(f, "InstructionAddressMisaligned({addr:#x})")
            }
            Self::InstructionAccessFault(addr) => write!(f, "InstructionAccessFault({addr:#x})"),
            Self::IllegalInstruction(inst) => write!(f, "IllegalInstruction({inst:#x})"),
            Self::Breakpoint(pc) => write!(f, "Breakpoint({pc:#x})"),
            Self::LoadAddressMisaligned(addr) => write!(f, "LoadAddressMisaligned({addr:#x})"),
            Self::LoadAccessFault(addr) => write!(f, "LoadAccessFault({addr:#x})"),
            Self::StoreAddressMisaligned(addr) => write!(f, "StoreAddressMisaligned({addr:#x})"),
            Self::StoreAccessFault(addr) => write!(f, "StoreAccessFault({addr:#x})"),
            Self::EnvironmentCallFromUMode => f.write_str("EnvironmentCallFromUMode"),
            Self::EnvironmentCallFromSMode => f.write_str("EnvironmentCallFromSMode"),
            Self::EnvironmentCallFromMMode => f.write_str("EnvironmentCallFromMMode"),
            Self::InstructionPageFault(addr) => write!(f, "InstructionPageFault({addr:#x})"),
            Self::LoadPageFault(addr) => write!(f, "LoadPageFault({addr:#x})"),
            Self::StorePageFault(addr) => write!(f, "StorePageFault({addr:#x})"),
            Self::SupervisorSoftwareInterrupt => f.write_str("SupervisorSoftwareInterrupt"),
            Self::MachineSoftwareInterrupt => f.write_str("MachineSoftwareInterrupt"),
            Self::SupervisorTimerInterrupt => f.write_str("SupervisorTimerInterrupt"),
            Self::MachineTimerInterrupt => f.write_str("MachineTimerInterrupt"),
            Self::SupervisorExternalInterrupt => f.write_str("SupervisorExternalInterrupt"),
            Self::MachineExternalInterrupt => f.write_str("MachineExternalInterrupt"),
        }
    }
}

impl std::error::Error for Trap {}

/// A trap as committed by execute-2.
///
/// Carries everything the redirect encoder and the retirement log need: the cause,
/// the PC of the trapping instruction, and the vector the CSR unit selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapRecord {
    /// The trap that was taken.
    pub trap: Trap,
    /// Program counter saved into `mepc`/`sepc`.
    pub epc: u64,
    /// Handler address fetch is redirected to.
    pub vector: u64,
}

/// Errors raised while loading or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A functional unit was configured with a latency of zero cycles.
    #[error("{unit} latency must be at least one cycle")]
    ZeroLatency {
        /// Name of the offending unit.
        unit: &'static str,
    },

    /// The reset PC is not aligned to the minimum instruction size.
    #[error("reset PC {0:#x} is not aligned to the minimum instruction size")]
    MisalignedResetPc(u64),
}
