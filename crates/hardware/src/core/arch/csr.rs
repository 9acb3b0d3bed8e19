//! Control and Status Register (CSR) file.
//!
//! This module implements the CSR unit the pipeline talks to. It provides:
//! 1. **Address Definitions:** Constants for the machine, supervisor and counter CSRs.
//! 2. **Field Masks:** Bitmasks for status, interrupt and translation control.
//! 3. **Access Logic:** WARL-masked reads and writes plus the privilege/read-only checks
//!    the decoder applies before a CSR instruction may issue.
//! 4. **Trap Logic:** Trap entry with `medeleg`/`mideleg` delegation and vectored mode,
//!    `MRET`/`SRET`, pending-interrupt selection and WFI wake-up.
//! 5. **Contexts:** Privilege and translation inputs latched into fetch and data requests.
//!
//! The pipeline writes this file from execute-2 commit only.

use tracing::debug;

use super::mode::PrivilegeMode;
use crate::common::Trap;
use crate::core::pipeline::stages::decode::DecodeContext;
use crate::soc::traits::TranslationContext;

/// Supervisor status register.
pub const SSTATUS: u16 = 0x100;
/// Supervisor interrupt enable.
pub const SIE: u16 = 0x104;
/// Supervisor trap vector.
pub const STVEC: u16 = 0x105;
/// Supervisor counter enable.
pub const SCOUNTEREN: u16 = 0x106;
/// Supervisor scratch.
pub const SSCRATCH: u16 = 0x140;
/// Supervisor exception PC.
pub const SEPC: u16 = 0x141;
/// Supervisor trap cause.
pub const SCAUSE: u16 = 0x142;
/// Supervisor trap value.
pub const STVAL: u16 = 0x143;
/// Supervisor interrupt pending.
pub const SIP: u16 = 0x144;
/// Supervisor address translation and protection.
pub const SATP: u16 = 0x180;

/// Machine status register.
pub const MSTATUS: u16 = 0x300;
/// Machine ISA register.
pub const MISA: u16 = 0x301;
/// Machine exception delegation.
pub const MEDELEG: u16 = 0x302;
/// Machine interrupt delegation.
pub const MIDELEG: u16 = 0x303;
/// Machine interrupt enable.
pub const MIE: u16 = 0x304;
/// Machine trap vector.
pub const MTVEC: u16 = 0x305;
/// Machine counter enable.
pub const MCOUNTEREN: u16 = 0x306;
/// Machine scratch.
pub const MSCRATCH: u16 = 0x340;
/// Machine exception PC.
pub const MEPC: u16 = 0x341;
/// Machine trap cause.
pub const MCAUSE: u16 = 0x342;
/// Machine trap value.
pub const MTVAL: u16 = 0x343;
/// Machine interrupt pending.
pub const MIP: u16 = 0x344;

/// Machine cycle counter.
pub const MCYCLE: u16 = 0xB00;
/// Machine instructions-retired counter.
pub const MINSTRET: u16 = 0xB02;
/// User cycle counter (read-only shadow of `mcycle`).
pub const CYCLE: u16 = 0xC00;
/// User timer (read-only, tracks `mcycle` in this model).
pub const TIME: u16 = 0xC01;
/// User instructions-retired counter (read-only shadow of `minstret`).
pub const INSTRET: u16 = 0xC02;

/// Machine vendor ID.
pub const MVENDORID: u16 = 0xF11;
/// Machine architecture ID.
pub const MARCHID: u16 = 0xF12;
/// Machine implementation ID.
pub const MIMPID: u16 = 0xF13;
/// Hart ID.
pub const MHARTID: u16 = 0xF14;

/// Supervisor interrupt enable bit in `mstatus`.
pub const MSTATUS_SIE: u64 = 1 << 1;
/// Machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MIE: u64 = 1 << 3;
/// Supervisor previous interrupt enable bit in `mstatus`.
pub const MSTATUS_SPIE: u64 = 1 << 5;
/// Machine previous interrupt enable bit in `mstatus`.
pub const MSTATUS_MPIE: u64 = 1 << 7;
/// Supervisor previous privilege bit in `mstatus`.
pub const MSTATUS_SPP: u64 = 1 << 8;
/// Bit shift of the machine previous privilege field in `mstatus`.
pub const MSTATUS_MPP_SHIFT: u64 = 11;
/// Machine previous privilege field in `mstatus`.
pub const MSTATUS_MPP: u64 = 3 << MSTATUS_MPP_SHIFT;
/// Modify-privilege bit in `mstatus`.
pub const MSTATUS_MPRV: u64 = 1 << 17;
/// Supervisor user memory access bit in `mstatus`.
pub const MSTATUS_SUM: u64 = 1 << 18;
/// Make executable readable bit in `mstatus`.
pub const MSTATUS_MXR: u64 = 1 << 19;
/// Trap virtual memory bit in `mstatus`.
pub const MSTATUS_TVM: u64 = 1 << 20;
/// Timeout wait bit in `mstatus`.
pub const MSTATUS_TW: u64 = 1 << 21;
/// Trap SRET bit in `mstatus`.
pub const MSTATUS_TSR: u64 = 1 << 22;
/// UXL and SXL fields, hardwired to 64-bit.
pub const MSTATUS_UXL_SXL: u64 = (2 << 32) | (2 << 34);

/// Bits of `mstatus` software may change.
const MSTATUS_WRITABLE: u64 = MSTATUS_SIE
    | MSTATUS_MIE
    | MSTATUS_SPIE
    | MSTATUS_MPIE
    | MSTATUS_SPP
    | MSTATUS_MPP
    | MSTATUS_MPRV
    | MSTATUS_SUM
    | MSTATUS_MXR
    | MSTATUS_TVM
    | MSTATUS_TW
    | MSTATUS_TSR;

/// Bits of `mstatus` visible through `sstatus`.
const SSTATUS_VISIBLE: u64 =
    MSTATUS_SIE | MSTATUS_SPIE | MSTATUS_SPP | MSTATUS_SUM | MSTATUS_MXR | (3 << 32);

/// Bits of `mstatus` writable through `sstatus`.
const SSTATUS_WRITABLE: u64 = MSTATUS_SIE | MSTATUS_SPIE | MSTATUS_SPP | MSTATUS_SUM | MSTATUS_MXR;

/// Supervisor software interrupt pending/enable bit.
pub const MIP_SSIP: u64 = 1 << 1;
/// Machine software interrupt pending/enable bit.
pub const MIP_MSIP: u64 = 1 << 3;
/// Supervisor timer interrupt pending/enable bit.
pub const MIP_STIP: u64 = 1 << 5;
/// Machine timer interrupt pending/enable bit.
pub const MIP_MTIP: u64 = 1 << 7;
/// Supervisor external interrupt pending/enable bit.
pub const MIP_SEIP: u64 = 1 << 9;
/// Machine external interrupt pending/enable bit.
pub const MIP_MEIP: u64 = 1 << 11;

/// Interrupts that exist at all.
const INTERRUPTS_ALL: u64 = MIP_SSIP | MIP_MSIP | MIP_STIP | MIP_MTIP | MIP_SEIP | MIP_MEIP;
/// Interrupts that may be delegated to S-mode.
const INTERRUPTS_SUPERVISOR: u64 = MIP_SSIP | MIP_STIP | MIP_SEIP;
/// Exceptions that may be delegated (everything but ECALL from M).
const EXCEPTIONS_DELEGABLE: u64 = 0xB3FF;

/// `mip` bits software may write directly.
const MIP_SW_WRITABLE: u64 = MIP_SSIP | MIP_STIP | MIP_SEIP;

/// Bit shift of the mode field in `satp`.
pub const SATP_MODE_SHIFT: u64 = 60;
/// Bare (untranslated) mode value.
pub const SATP_MODE_BARE: u64 = 0;
/// Sv39 mode value.
pub const SATP_MODE_SV39: u64 = 8;

/// `misa` for RV64IMA(C)SU; bit 2 (C) is cleared when compressed support is off.
const MISA_RV64IMACSU: u64 = (2 << 62)
    | (1 << 0)
    | (1 << 2)
    | (1 << 8)
    | (1 << 12)
    | (1 << 18)
    | (1 << 20);

/// Interrupt priority order used when several are pending and enabled.
const INTERRUPT_PRIORITY: [(u64, Trap); 6] = [
    (MIP_MEIP, Trap::MachineExternalInterrupt),
    (MIP_MSIP, Trap::MachineSoftwareInterrupt),
    (MIP_MTIP, Trap::MachineTimerInterrupt),
    (MIP_SEIP, Trap::SupervisorExternalInterrupt),
    (MIP_SSIP, Trap::SupervisorSoftwareInterrupt),
    (MIP_STIP, Trap::SupervisorTimerInterrupt),
];

/// Which trap-return instruction is being executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapReturn {
    /// `MRET`.
    Machine,
    /// `SRET`.
    Supervisor,
}

/// Interrupt request lines driven from outside the core (CLINT/PLIC model or testbench).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterruptLines {
    /// Machine software interrupt (`MSIP`).
    pub msip: bool,
    /// Machine timer interrupt (`MTIP`).
    pub mtip: bool,
    /// Machine external interrupt (`MEIP`).
    pub meip: bool,
    /// Supervisor external interrupt (ORed into `SEIP`).
    pub seip: bool,
}

impl InterruptLines {
    fn mip_bits(self) -> u64 {
        (if self.msip { MIP_MSIP } else { 0 })
            | (if self.mtip { MIP_MTIP } else { 0 })
            | (if self.meip { MIP_MEIP } else { 0 })
            | (if self.seip { MIP_SEIP } else { 0 })
    }
}

/// Returns `true` when `addr` names a CSR this core implements.
pub fn is_implemented(addr: u16) -> bool {
    matches!(
        addr,
        SSTATUS
            | SIE
            | STVEC
            | SCOUNTEREN
            | SSCRATCH
            | SEPC
            | SCAUSE
            | STVAL
            | SIP
            | SATP
            | MSTATUS
            | MISA
            | MEDELEG
            | MIDELEG
            | MIE
            | MTVEC
            | MCOUNTEREN
            | MSCRATCH
            | MEPC
            | MCAUSE
            | MTVAL
            | MIP
            | MCYCLE
            | MINSTRET
            | CYCLE
            | TIME
            | INSTRET
            | MVENDORID
            | MARCHID
            | MIMPID
            | MHARTID
    )
}

/// Returns `true` when `addr` lies in the read-only CSR space (`addr[11:10] == 3`).
pub const fn is_read_only(addr: u16) -> bool {
    (addr >> 10) & 0x3 == 0x3
}

/// Lowest privilege allowed to access `addr` (`addr[9:8]`).
pub const fn required_privilege(addr: u16) -> PrivilegeMode {
    PrivilegeMode::from_bits(((addr >> 8) & 0x3) as u64)
}

/// Control and Status Register file.
///
/// `sstatus`, `sie` and `sip` have no storage of their own: they are masked
/// views of `mstatus`, `mie` and `mip`.
#[derive(Clone, Debug)]
pub struct CsrFile {
    privilege: PrivilegeMode,
    compressed: bool,
    hart_id: u64,

    mstatus: u64,
    medeleg: u64,
    mideleg: u64,
    mie: u64,
    mip_sw: u64,
    lines: InterruptLines,
    mtvec: u64,
    mcounteren: u64,
    mscratch: u64,
    mepc: u64,
    mcause: u64,
    mtval: u64,

    stvec: u64,
    scounteren: u64,
    sscratch: u64,
    sepc: u64,
    scause: u64,
    stval: u64,
    satp: u64,

    mcycle: u64,
    minstret: u64,
}

impl CsrFile {
    /// Creates the reset CSR state: M-mode, interrupts disabled, translation off.
    ///
    /// # Arguments
    ///
    /// * `hart_id` - Value returned by `mhartid`.
    /// * `compressed` - Whether the C extension is enabled (affects `misa` and
    ///   the `xepc` alignment mask).
    pub fn new(hart_id: u64, compressed: bool) -> Self {
        Self {
            privilege: PrivilegeMode::Machine,
            compressed,
            hart_id,
            mstatus: MSTATUS_UXL_SXL,
            medeleg: 0,
            mideleg: 0,
            mie: 0,
            mip_sw: 0,
            lines: InterruptLines::default(),
            mtvec: 0,
            mcounteren: 0,
            mscratch: 0,
            mepc: 0,
            mcause: 0,
            mtval: 0,
            stvec: 0,
            scounteren: 0,
            sscratch: 0,
            sepc: 0,
            scause: 0,
            stval: 0,
            satp: 0,
            mcycle: 0,
            minstret: 0,
        }
    }

    /// Current privilege mode.
    pub fn privilege(&self) -> PrivilegeMode {
        self.privilege
    }

    /// Effective `mip`: software-writable bits merged with the external lines.
    pub fn mip(&self) -> u64 {
        self.mip_sw | self.lines.mip_bits()
    }

    /// Reads a CSR.
    ///
    /// Access rights are checked by the decoder; unknown addresses read as zero.
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    pub fn read(&self, addr: u16) -> u64 {
        match addr {
            SSTATUS => self.mstatus & SSTATUS_VISIBLE,
            SIE => self.mie & self.mideleg,
            STVEC => self.stvec,
            SCOUNTEREN => self.scounteren,
            SSCRATCH => self.sscratch,
            SEPC => self.sepc,
            SCAUSE => self.scause,
            STVAL => self.stval,
            SIP => self.mip() & self.mideleg,
            SATP => self.satp,
            MSTATUS => self.mstatus,
            MISA => self.misa(),
            MEDELEG => self.medeleg,
            MIDELEG => self.mideleg,
            MIE => self.mie,
            MTVEC => self.mtvec,
            MCOUNTEREN => self.mcounteren,
            MSCRATCH => self.mscratch,
            MEPC => self.mepc,
            MCAUSE => self.mcause,
            MTVAL => self.mtval,
            MIP => self.mip(),
            MCYCLE | CYCLE | TIME => self.mcycle,
            MINSTRET | INSTRET => self.minstret,
            MHARTID => self.hart_id,
            _ => 0,
        }
    }

    /// Writes a CSR, applying the WARL masks of each register.
    ///
    /// Writes to read-only or unknown addresses are dropped; the decoder has
    /// already turned those into illegal-instruction traps.
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    /// * `val` - The value produced by the CSR instruction.
    pub fn write(&mut self, addr: u16, val: u64) {
        match addr {
            SSTATUS => {
                self.mstatus = (self.mstatus & !SSTATUS_WRITABLE) | (val & SSTATUS_WRITABLE);
            }
            SIE => {
                let mask = self.mideleg;
                self.mie = (self.mie & !mask) | (val & mask);
            }
            STVEC => self.stvec = legalize_tvec(val),
            SCOUNTEREN => self.scounteren = val & 0xFFFF_FFFF,
            SSCRATCH => self.sscratch = val,
            SEPC => self.sepc = val & self.epc_mask(),
            SCAUSE => self.scause = val,
            STVAL => self.stval = val,
            SIP => {
                let mask = self.mideleg & MIP_SSIP;
                self.mip_sw = (self.mip_sw & !mask) | (val & mask);
            }
            SATP => {
                let mode = val >> SATP_MODE_SHIFT;
                if mode == SATP_MODE_BARE || mode == SATP_MODE_SV39 {
                    self.satp = val;
                }
            }
            MSTATUS => {
                let mut val = val;
                // MPP = 2 is reserved.
                if (val & MSTATUS_MPP) >> MSTATUS_MPP_SHIFT == 2 {
                    val &= !MSTATUS_MPP;
                }
                self.mstatus = (self.mstatus & !MSTATUS_WRITABLE) | (val & MSTATUS_WRITABLE);
            }
            MEDELEG => self.medeleg = val & EXCEPTIONS_DELEGABLE,
            MIDELEG => self.mideleg = val & INTERRUPTS_SUPERVISOR,
            MIE => self.mie = val & INTERRUPTS_ALL,
            MTVEC => self.mtvec = legalize_tvec(val),
            MCOUNTEREN => self.mcounteren = val & 0xFFFF_FFFF,
            MSCRATCH => self.mscratch = val,
            MEPC => self.mepc = val & self.epc_mask(),
            MCAUSE => self.mcause = val,
            MTVAL => self.mtval = val,
            MIP => self.mip_sw = (self.mip_sw & !MIP_SW_WRITABLE) | (val & MIP_SW_WRITABLE),
            MCYCLE => self.mcycle = val,
            MINSTRET => self.minstret = val,
            _ => {}
        }
    }

    /// Enters a trap handler.
    ///
    /// Selects M or S mode using `medeleg`/`mideleg` (delegation only applies
    /// when the trap is taken from S or U), saves the cause, value, PC and
    /// previous interrupt-enable/privilege, and switches privilege.
    ///
    /// # Arguments
    ///
    /// * `trap` - The exception or interrupt being taken.
    /// * `epc` - PC of the trapping instruction.
    ///
    /// # Returns
    ///
    /// The handler address (`xtvec` base, plus `4 × code` for vectored interrupts).
    pub fn take_trap(&mut self, trap: Trap, epc: u64) -> u64 {
        let code = trap.code();
        let deleg = if trap.is_interrupt() {
            self.mideleg
        } else {
            self.medeleg
        };
        let to_supervisor =
            self.privilege <= PrivilegeMode::Supervisor && (deleg >> code) & 1 != 0;

        let tvec = if to_supervisor {
            self.scause = trap.cause();
            self.sepc = epc;
            self.stval = trap.tval();
            let sie = self.mstatus & MSTATUS_SIE != 0;
            self.mstatus = set_bit(self.mstatus, MSTATUS_SPIE, sie);
            self.mstatus = set_bit(
                self.mstatus,
                MSTATUS_SPP,
                self.privilege == PrivilegeMode::Supervisor,
            );
            self.mstatus &= !MSTATUS_SIE;
            self.privilege = PrivilegeMode::Supervisor;
            self.stvec
        } else {
            self.mcause = trap.cause();
            self.mepc = epc;
            self.mtval = trap.tval();
            let mie = self.mstatus & MSTATUS_MIE != 0;
            self.mstatus = set_bit(self.mstatus, MSTATUS_MPIE, mie);
            self.mstatus = (self.mstatus & !MSTATUS_MPP)
                | (self.privilege.bits() << MSTATUS_MPP_SHIFT);
            self.mstatus &= !MSTATUS_MIE;
            self.privilege = PrivilegeMode::Machine;
            self.mtvec
        };

        let base = tvec & !0x3;
        let vector = if tvec & 0x1 != 0 && trap.is_interrupt() {
            base.wrapping_add(4 * code)
        } else {
            base
        };
        debug!(
            target: "CTL",
            "trap {trap} at {epc:#x} -> {vector:#x} ({})",
            self.privilege
        );
        vector
    }

    /// Executes `MRET` or `SRET`.
    ///
    /// # Returns
    ///
    /// The restored `xepc`, which fetch is redirected to.
    pub fn eret(&mut self, kind: TrapReturn) -> u64 {
        match kind {
            TrapReturn::Machine => {
                let mpp = PrivilegeMode::from_bits(self.mstatus >> MSTATUS_MPP_SHIFT);
                let mpie = self.mstatus & MSTATUS_MPIE != 0;
                self.mstatus = set_bit(self.mstatus, MSTATUS_MIE, mpie);
                self.mstatus |= MSTATUS_MPIE;
                self.mstatus &= !MSTATUS_MPP;
                if mpp != PrivilegeMode::Machine {
                    self.mstatus &= !MSTATUS_MPRV;
                }
                self.privilege = mpp;
                self.mepc
            }
            TrapReturn::Supervisor => {
                let spp = if self.mstatus & MSTATUS_SPP != 0 {
                    PrivilegeMode::Supervisor
                } else {
                    PrivilegeMode::User
                };
                let spie = self.mstatus & MSTATUS_SPIE != 0;
                self.mstatus = set_bit(self.mstatus, MSTATUS_SIE, spie);
                self.mstatus |= MSTATUS_SPIE;
                self.mstatus &= !MSTATUS_SPP;
                self.mstatus &= !MSTATUS_MPRV;
                self.privilege = spp;
                self.sepc
            }
        }
    }

    /// Returns the highest-priority interrupt that is pending, enabled and not
    /// masked by the current privilege.
    ///
    /// Machine-level interrupts are taken in M-mode only when `mstatus.MIE` is
    /// set, and always below M. Delegated interrupts are taken in S-mode only
    /// when `mstatus.SIE` is set, always in U-mode, and never in M-mode.
    pub fn pending_interrupt(&self) -> Option<Trap> {
        let pending = self.mip() & self.mie;
        if pending == 0 {
            return None;
        }

        let m_enabled = self.privilege < PrivilegeMode::Machine || self.mstatus & MSTATUS_MIE != 0;
        let s_enabled = self.privilege < PrivilegeMode::Supervisor
            || (self.privilege == PrivilegeMode::Supervisor && self.mstatus & MSTATUS_SIE != 0);

        let m_pending = if m_enabled { pending & !self.mideleg } else { 0 };
        let s_pending = if s_enabled { pending & self.mideleg } else { 0 };
        let takeable = m_pending | s_pending;

        INTERRUPT_PRIORITY
            .iter()
            .find(|(bit, _)| takeable & bit != 0)
            .map(|&(_, trap)| trap)
    }

    /// Returns `true` when a `WFI` should complete: any interrupt is both
    /// pending and enabled in `mie`, regardless of the global enables.
    pub fn wfi_wakeup(&self) -> bool {
        self.mip() & self.mie != 0
    }

    /// Updates the externally driven interrupt lines.
    pub fn set_interrupt_lines(&mut self, lines: InterruptLines) {
        self.lines = lines;
    }

    /// Counts one retired (non-trapping) instruction.
    pub fn retire(&mut self) {
        self.minstret = self.minstret.wrapping_add(1);
    }

    /// Advances `mcycle` by one clock.
    pub fn tick(&mut self) {
        self.mcycle = self.mcycle.wrapping_add(1);
    }

    /// Translation context for instruction fetch (always the current privilege).
    pub fn fetch_context(&self) -> TranslationContext {
        self.context_for(self.privilege)
    }

    /// Translation context for loads and stores (`MPP` when `mstatus.MPRV` is set).
    pub fn data_context(&self) -> TranslationContext {
        let privilege = if self.mstatus & MSTATUS_MPRV != 0 {
            PrivilegeMode::from_bits(self.mstatus >> MSTATUS_MPP_SHIFT)
        } else {
            self.privilege
        };
        self.context_for(privilege)
    }

    /// Privilege and status inputs for the decoder.
    pub fn decode_context(&self) -> DecodeContext {
        DecodeContext {
            privilege: self.privilege,
            tsr: self.mstatus & MSTATUS_TSR != 0,
            tw: self.mstatus & MSTATUS_TW != 0,
            tvm: self.mstatus & MSTATUS_TVM != 0,
            compressed: self.compressed,
        }
    }

    fn context_for(&self, privilege: PrivilegeMode) -> TranslationContext {
        TranslationContext {
            privilege,
            sum: self.mstatus & MSTATUS_SUM != 0,
            mxr: self.mstatus & MSTATUS_MXR != 0,
            atp: if privilege == PrivilegeMode::Machine {
                0
            } else {
                self.satp
            },
        }
    }

    fn misa(&self) -> u64 {
        if self.compressed {
            MISA_RV64IMACSU
        } else {
            MISA_RV64IMACSU & !(1 << 2)
        }
    }

    fn epc_mask(&self) -> u64 {
        if self.compressed { !0x1 } else { !0x3 }
    }
}

/// Keeps direct (0) and vectored (1) modes; reserved modes fall back to direct.
fn legalize_tvec(val: u64) -> u64 {
    if val & 0x3 >= 2 { val & !0x3 } else { val }
}

#[inline]
fn set_bit(reg: u64, bit: u64, on: bool) -> u64 {
    if on { reg | bit } else { reg & !bit }
}
