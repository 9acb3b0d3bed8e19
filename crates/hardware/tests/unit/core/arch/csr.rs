//! CSR File Tests.
//!
//! Trap entry and return, delegation, interrupt selection, WARL fields and
//! the supervisor views of machine registers.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvpipe_core::common::Trap;
use rvpipe_core::core::arch::csr::{
    self, CsrFile, InterruptLines, MCAUSE, MEDELEG, MEPC, MHARTID, MIDELEG, MIE, MINSTRET, MIP,
    MIP_MEIP, MIP_MTIP, MIP_SSIP, MIP_STIP, MISA, MSTATUS, MSTATUS_MIE, MSTATUS_MPIE,
    MSTATUS_MPP, MSTATUS_MPP_SHIFT, MSTATUS_MPRV, MSTATUS_SIE, MSTATUS_SPP, MSTATUS_SUM,
    MSTATUS_TSR, MSTATUS_TVM, MSTATUS_TW, MTVAL, MTVEC, SATP, SCAUSE, SEPC, SIE, SIP, SSTATUS,
    STVEC, TIME, TrapReturn,
};
use rvpipe_core::core::arch::mode::PrivilegeMode;

fn enter(privilege: PrivilegeMode) -> CsrFile {
    let mut c = CsrFile::new(0, true);
    c.write(MSTATUS, privilege.bits() << MSTATUS_MPP_SHIFT);
    c.write(MEPC, 0x4000);
    let _ = c.eret(TrapReturn::Machine);
    assert_eq!(c.privilege(), privilege);
    c
}

#[test]
fn reset_state() {
    let c = CsrFile::new(3, true);
    assert_eq!(c.privilege(), PrivilegeMode::Machine);
    assert_eq!(c.read(MHARTID), 3);
    assert_eq!(c.read(MISA) >> 62, 2);
    assert_ne!(c.read(MISA) & (1 << 2), 0);
    assert_eq!(CsrFile::new(0, false).read(MISA) & (1 << 2), 0);
    assert_eq!(c.pending_interrupt(), None);
}

#[test]
fn machine_trap_saves_state() {
    let mut c = CsrFile::new(0, true);
    c.write(MTVEC, 0x8000);
    c.write(MSTATUS, MSTATUS_MIE);

    let vector = c.take_trap(Trap::IllegalInstruction(0x1234), 0x1000);
    assert_eq!(vector, 0x8000);
    assert_eq!(c.read(MEPC), 0x1000);
    assert_eq!(c.read(MCAUSE), 2);
    assert_eq!(c.read(MTVAL), 0x1234);
    let s = c.read(MSTATUS);
    assert_eq!(s & MSTATUS_MIE, 0);
    assert_ne!(s & MSTATUS_MPIE, 0);
    assert_eq!((s & MSTATUS_MPP) >> MSTATUS_MPP_SHIFT, PrivilegeMode::Machine.bits());
}

#[test]
fn vectored_mode_offsets_interrupts_only() {
    let mut c = CsrFile::new(0, true);
    c.write(MTVEC, 0x8001);
    assert_eq!(c.take_trap(Trap::MachineTimerInterrupt, 0x1000), 0x8000 + 4 * 7);
    assert_eq!(c.take_trap(Trap::EnvironmentCallFromMMode, 0x1000), 0x8000);
}

#[test]
fn delegated_exception_goes_to_supervisor() {
    let mut c = enter(PrivilegeMode::User);
    c.write(MEDELEG, 1 << 8);
    c.write(STVEC, 0x9000);

    let vector = c.take_trap(Trap::EnvironmentCallFromUMode, 0x2000);
    assert_eq!(vector, 0x9000);
    assert_eq!(c.privilege(), PrivilegeMode::Supervisor);
    assert_eq!(c.read(SEPC), 0x2000);
    assert_eq!(c.read(SCAUSE), 8);
    assert_eq!(c.read(MSTATUS) & MSTATUS_SPP, 0);
}

#[test]
fn delegation_ignored_in_machine_mode() {
    let mut c = CsrFile::new(0, true);
    c.write(MEDELEG, 1 << 2);
    c.write(MTVEC, 0x8000);
    assert_eq!(c.take_trap(Trap::IllegalInstruction(0), 0x1000), 0x8000);
    assert_eq!(c.privilege(), PrivilegeMode::Machine);
}

#[test]
fn sret_restores_previous_mode() {
    let mut c = enter(PrivilegeMode::Supervisor);
    c.write(SEPC, 0x5000);
    c.write(SSTATUS, MSTATUS_SPP);
    assert_eq!(c.eret(TrapReturn::Supervisor), 0x5000);
    assert_eq!(c.privilege(), PrivilegeMode::Supervisor);

    assert_eq!(c.eret(TrapReturn::Supervisor), 0x5000);
    assert_eq!(c.privilege(), PrivilegeMode::User);
}

#[test]
fn mret_below_machine_clears_mprv() {
    let mut c = CsrFile::new(0, true);
    c.write(MSTATUS, MSTATUS_MPRV | (1 << MSTATUS_MPP_SHIFT));
    let _ = c.eret(TrapReturn::Machine);
    assert_eq!(c.read(MSTATUS) & MSTATUS_MPRV, 0);
}

#[test]
fn interrupt_priority_and_global_enable() {
    let mut c = CsrFile::new(0, true);
    c.write(MIE, MIP_MTIP | MIP_MEIP);
    c.set_interrupt_lines(InterruptLines {
        mtip: true,
        meip: true,
        ..Default::default()
    });
    assert_eq!(c.pending_interrupt(), None);
    assert!(c.wfi_wakeup());

    c.write(MSTATUS, MSTATUS_MIE);
    assert_eq!(c.pending_interrupt(), Some(Trap::MachineExternalInterrupt));
    assert_eq!(c.read(MIP) & (MIP_MTIP | MIP_MEIP), MIP_MTIP | MIP_MEIP);
}

#[test]
fn machine_interrupts_always_enabled_below_machine() {
    let mut c = enter(PrivilegeMode::User);
    c.write(MIE, MIP_MTIP);
    c.set_interrupt_lines(InterruptLines {
        mtip: true,
        ..Default::default()
    });
    assert_eq!(c.pending_interrupt(), Some(Trap::MachineTimerInterrupt));
}

#[test]
fn delegated_interrupt_masked_in_machine_mode() {
    let mut c = CsrFile::new(0, true);
    c.write(MIDELEG, MIP_STIP);
    c.write(MIE, MIP_STIP);
    c.write(MIP, MIP_STIP);
    c.write(MSTATUS, MSTATUS_MIE | MSTATUS_SIE);
    assert_eq!(c.pending_interrupt(), None);

    let mut s = enter(PrivilegeMode::Supervisor);
    s.write(MIDELEG, MIP_STIP);
    s.write(MIE, MIP_STIP);
    s.write(MIP, MIP_STIP);
    assert_eq!(s.pending_interrupt(), None);
    s.write(SSTATUS, MSTATUS_SIE);
    assert_eq!(s.pending_interrupt(), Some(Trap::SupervisorTimerInterrupt));
}

#[test]
fn supervisor_views() {
    let mut c = CsrFile::new(0, true);
    c.write(MSTATUS, MSTATUS_MIE | MSTATUS_SUM);
    assert_eq!(c.read(SSTATUS) & MSTATUS_MIE, 0);
    assert_ne!(c.read(SSTATUS) & MSTATUS_SUM, 0);

    c.write(SSTATUS, 0);
    assert_ne!(c.read(MSTATUS) & MSTATUS_MIE, 0);
    assert_eq!(c.read(MSTATUS) & MSTATUS_SUM, 0);

    c.write(MIDELEG, MIP_SSIP);
    c.write(SIE, u64::MAX);
    assert_eq!(c.read(MIE), MIP_SSIP);
    assert_eq!(c.read(SIE), MIP_SSIP);

    c.write(SIP, MIP_SSIP);
    assert_eq!(c.read(SIP), MIP_SSIP);
}

#[rstest]
#[case::bare(0, 0)]
#[case::sv39((8 << 60) | 0x42, (8 << 60) | 0x42)]
#[case::sv48_ignored((9 << 60) | 0x42, 0)]
fn satp_mode_is_warl(#[case] write: u64, #[case] read: u64) {
    let mut c = CsrFile::new(0, true);
    c.write(SATP, write);
    assert_eq!(c.read(SATP), read);
}

#[test]
fn reserved_mpp_and_epc_alignment() {
    let mut c = CsrFile::new(0, true);
    c.write(MSTATUS, 2 << MSTATUS_MPP_SHIFT);
    assert_eq!(c.read(MSTATUS) & MSTATUS_MPP, 0);

    c.write(MEPC, 0x1003);
    assert_eq!(c.read(MEPC), 0x1002);
    let mut no_c = CsrFile::new(0, false);
    no_c.write(MEPC, 0x1003);
    assert_eq!(no_c.read(MEPC), 0x1000);
}

#[test]
fn counters_follow_clock_and_retirement() {
    let mut c = CsrFile::new(0, true);
    c.tick();
    c.tick();
    c.retire();
    assert_eq!(c.read(csr::MCYCLE), 2);
    assert_eq!(c.read(TIME), 2);
    assert_eq!(c.read(MINSTRET), 1);
}

#[test]
fn contexts_follow_status() {
    let mut c = CsrFile::new(0, true);
    c.write(SATP, 8 << 60);
    c.write(MSTATUS, MSTATUS_MPRV | MSTATUS_TW | MSTATUS_TSR | MSTATUS_TVM);

    assert_eq!(c.fetch_context().privilege, PrivilegeMode::Machine);
    assert_eq!(c.fetch_context().atp, 0);
    let data = c.data_context();
    assert_eq!(data.privilege, PrivilegeMode::User);
    assert_eq!(data.atp, 8 << 60);

    let d = c.decode_context();
    assert!(d.tw && d.tsr && d.tvm && d.compressed);
}

#[rstest]
#[case(MSTATUS, true, false, PrivilegeMode::Machine)]
#[case(SSTATUS, true, false, PrivilegeMode::Supervisor)]
#[case(MHARTID, true, true, PrivilegeMode::Machine)]
#[case(csr::CYCLE, true, true, PrivilegeMode::User)]
#[case(0x7C0, false, false, PrivilegeMode::Machine)]
fn access_metadata(
    #[case] addr: u16,
    #[case] implemented: bool,
    #[case] read_only: bool,
    #[case] privilege: PrivilegeMode,
) {
    assert_eq!(csr::is_implemented(addr), implemented);
    assert_eq!(csr::is_read_only(addr), read_only);
    assert_eq!(csr::required_privilege(addr), privilege);
}
