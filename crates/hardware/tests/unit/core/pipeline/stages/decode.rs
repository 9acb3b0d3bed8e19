//! Decoder and decode handoff tests.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvpipe_core::common::{RegisterFile, Trap};
use rvpipe_core::core::arch::csr::{MHARTID, MSCRATCH, MSTATUS, SATP, SSCRATCH};
use rvpipe_core::core::arch::mode::PrivilegeMode;
use rvpipe_core::core::pipeline::latches::{DecodedInstruction, Latch};
use rvpipe_core::core::pipeline::signals::{
    AluOp, AmoOp, CmpOp, CsrOp, DivOp, FetchReason, MemKind, MemWidth, MulOp, OpASrc, OpBSrc,
    OpType, SysOp,
};
use rvpipe_core::core::pipeline::stages::{DecodeContext, Decoder, StandardDecoder, decode_stage};
use rvpipe_core::core::pipeline::traits::PipelineLatch;

use crate::common::builder::instruction::InstructionBuilder as I;
use crate::common::builder::pipeline_state::fetched;

fn ctx(privilege: PrivilegeMode) -> DecodeContext {
    DecodeContext {
        privilege,
        compressed: true,
        ..Default::default()
    }
}

fn decode(word: u32) -> DecodedInstruction {
    decode_in(word, &ctx(PrivilegeMode::Machine))
}

fn decode_in(word: u32, ctx: &DecodeContext) -> DecodedInstruction {
    StandardDecoder.decode(&fetched(0x1000, word, FetchReason::Prefetch), ctx)
}

#[test]
fn addi_fields() {
    let d = decode(I::new().addi(1, 2, -5).build());
    assert_eq!(d.op_type, OpType::Alu);
    assert_eq!(d.alu_op, AluOp::Add);
    assert_eq!((d.rd, d.rs1), (1, 2));
    assert!(d.uses_rs1);
    assert!(!d.uses_rs2);
    assert_eq!(d.imm, -5);
    assert_eq!(d.b_src, OpBSrc::Imm);
    assert_eq!(d.size, 4);
    assert_eq!(d.exception, None);
}

#[test]
fn register_register_alu() {
    let d = decode(I::new().sub(3, 1, 2).build());
    assert_eq!(d.alu_op, AluOp::Sub);
    assert_eq!(d.b_src, OpBSrc::Reg2);
    assert!(d.uses_rs1 && d.uses_rs2);

    let w = decode(I::new().addw(3, 1, 2).build());
    assert!(w.is32);
}

#[test]
fn shift_immediates() {
    let d = decode(I::new().srai(4, 5, 63).build());
    assert_eq!(d.alu_op, AluOp::Sra);
    assert_eq!(d.imm, 63);

    let d = decode(I::new().slli(4, 5, 32).build());
    assert_eq!(d.alu_op, AluOp::Sll);
    assert_eq!(d.imm, 32);
}

#[test]
fn upper_immediates() {
    let lui = decode(I::new().lui(5, 0x12345).build());
    assert_eq!(lui.a_src, OpASrc::Zero);
    assert_eq!(lui.imm, 0x1234_5000);

    let auipc = decode(I::new().auipc(5, 1).build());
    assert_eq!(auipc.a_src, OpASrc::Pc);
    assert_eq!(auipc.imm, 0x1000);
}

#[test]
fn jumps_and_branches() {
    let jal = decode(I::new().jal(1, 0x100).build());
    assert_eq!(jal.op_type, OpType::Jump);
    assert_eq!(jal.imm, 0x100);
    assert!(!jal.uses_rs1);

    let jalr = decode(I::new().jalr(0, 1, 8).build());
    assert_eq!(jalr.op_type, OpType::Jump);
    assert!(jalr.uses_rs1);
    assert_eq!(jalr.imm, 8);

    let blt = decode(I::new().blt(1, 2, -16).build());
    assert_eq!(blt.op_type, OpType::Branch);
    assert_eq!(blt.cmp_op, CmpOp::Lt);
    assert_eq!(blt.imm, -16);
    assert_eq!(blt.rd, 0);
}

#[rstest]
#[case(I::new().ld(1, 2, 8).build(), MemKind::Load, MemWidth::Double, true)]
#[case(I::new().lw(1, 2, 8).build(), MemKind::Load, MemWidth::Word, true)]
#[case(I::new().lbu(1, 2, 8).build(), MemKind::Load, MemWidth::Byte, false)]
#[case(I::new().sd(2, 3, 8).build(), MemKind::Store, MemWidth::Double, false)]
#[case(I::new().lr_d(1, 2).build(), MemKind::LoadReserved, MemWidth::Double, true)]
#[case(I::new().sc_d(1, 2, 3).build(), MemKind::StoreConditional, MemWidth::Double, true)]
fn memory_forms(
    #[case] word: u32,
    #[case] kind: MemKind,
    #[case] width: MemWidth,
    #[case] signed: bool,
) {
    let d = decode(word);
    assert_eq!(d.op_type, OpType::Mem);
    assert_eq!(d.mem.kind, kind);
    assert_eq!(d.mem.width, width);
    assert_eq!(d.mem.signed, signed);
    assert_eq!(d.uses_rs2, kind.is_write());
}

#[test]
fn store_has_no_destination() {
    let d = decode(I::new().sw(2, 3, -4).build());
    assert_eq!(d.rd, 0);
    assert_eq!(d.imm, -4);
}

#[test]
fn amo_function() {
    let d = decode(I::new().amoadd_d(5, 6, 7).build());
    assert_eq!(d.mem.kind, MemKind::Amo);
    assert_eq!(d.mem.amo, AmoOp::Add);
    assert_eq!((d.rd, d.rs1, d.rs2), (5, 6, 7));
}

#[test]
fn muldiv_routing() {
    let mul = decode(I::new().mulh(1, 2, 3).build());
    assert_eq!(mul.op_type, OpType::Mul);
    assert_eq!(mul.mul_op, MulOp::Mulh);

    let div = decode(I::new().remu(1, 2, 3).build());
    assert_eq!(div.op_type, OpType::Div);
    assert_eq!(div.div_op, DivOp::Remu);

    // MULH has no word form.
    let bad = I::new().mulhw(1, 2, 3).build();
    assert_eq!(decode(bad).exception, Some(Trap::IllegalInstruction(bad)));
}

#[test]
fn fences() {
    let fence = decode(I::new().fence().build());
    assert_eq!(fence.op_type, OpType::Alu);
    assert_eq!(fence.rd, 0);

    let fence_i = decode(I::new().fence_i().build());
    assert_eq!(fence_i.op_type, OpType::System);
    assert_eq!(fence_i.sys_op, SysOp::FenceI);
}

#[test]
fn csr_register_and_immediate_forms() {
    let rw = decode(I::new().csrrw(1, MSCRATCH, 2).build());
    assert_eq!(rw.op_type, OpType::Csr);
    assert_eq!(rw.csr_op, CsrOp::Rw);
    assert_eq!(rw.csr_addr, MSCRATCH);
    assert!(rw.uses_rs1);

    let rwi = decode(I::new().csrrwi(1, MSCRATCH, 5).build());
    assert_eq!(rwi.csr_op, CsrOp::Rwi);
    assert!(!rwi.uses_rs1);
    assert_eq!(rwi.imm, 5);
}

#[rstest]
#[case::ecall_m(I::ecall(), PrivilegeMode::Machine, Some(Trap::EnvironmentCallFromMMode))]
#[case::ecall_s(I::ecall(), PrivilegeMode::Supervisor, Some(Trap::EnvironmentCallFromSMode))]
#[case::ecall_u(I::ecall(), PrivilegeMode::User, Some(Trap::EnvironmentCallFromUMode))]
#[case::ebreak(I::ebreak(), PrivilegeMode::User, Some(Trap::Breakpoint(0x1000)))]
#[case::mret_m(I::mret(), PrivilegeMode::Machine, None)]
#[case::mret_s(I::mret(), PrivilegeMode::Supervisor, Some(Trap::IllegalInstruction(I::mret())))]
#[case::sret_s(I::sret(), PrivilegeMode::Supervisor, None)]
#[case::sret_u(I::sret(), PrivilegeMode::User, Some(Trap::IllegalInstruction(I::sret())))]
#[case::wfi_u(I::wfi(), PrivilegeMode::User, Some(Trap::IllegalInstruction(I::wfi())))]
fn privileged_instructions(
    #[case] word: u32,
    #[case] privilege: PrivilegeMode,
    #[case] exception: Option<Trap>,
) {
    assert_eq!(decode_in(word, &ctx(privilege)).exception, exception);
}

#[test]
fn status_traps_make_instructions_illegal() {
    let s = PrivilegeMode::Supervisor;
    let tsr = DecodeContext { tsr: true, ..ctx(s) };
    assert!(decode_in(I::sret(), &tsr).exception.is_some());

    let tw = DecodeContext { tw: true, ..ctx(s) };
    assert!(decode_in(I::wfi(), &tw).exception.is_some());
    assert!(decode_in(I::wfi(), &ctx(s)).exception.is_none());

    let tvm = DecodeContext { tvm: true, ..ctx(s) };
    assert!(decode_in(I::new().csrrs(1, SATP, 0).build(), &tvm).exception.is_some());
    assert!(decode_in(I::new().sfence_vma(0, 0).build(), &tvm).exception.is_some());
    assert_eq!(
        decode_in(I::new().sfence_vma(0, 0).build(), &ctx(s)).sys_op,
        SysOp::SfenceVma
    );
}

#[rstest]
#[case::read_only_write(I::new().csrrw(1, MHARTID, 2).build(), PrivilegeMode::Machine, true)]
#[case::read_only_read(I::new().csrrs(1, MHARTID, 0).build(), PrivilegeMode::Machine, false)]
#[case::machine_csr_from_s(I::new().csrrs(1, MSTATUS, 0).build(), PrivilegeMode::Supervisor, true)]
#[case::supervisor_csr_from_s(I::new().csrrw(1, SSCRATCH, 2).build(), PrivilegeMode::Supervisor, false)]
#[case::supervisor_csr_from_u(I::new().csrrw(1, SSCRATCH, 2).build(), PrivilegeMode::User, true)]
#[case::unimplemented(I::new().csrrw(1, 0x7C0, 2).build(), PrivilegeMode::Machine, true)]
fn csr_access_rights(#[case] word: u32, #[case] privilege: PrivilegeMode, #[case] illegal: bool) {
    assert_eq!(decode_in(word, &ctx(privilege)).exception.is_some(), illegal);
}

#[test]
fn unknown_opcode_is_illegal_with_encoding() {
    let d = decode(0xFFFF_FFFF);
    assert_eq!(d.exception, Some(Trap::IllegalInstruction(0xFFFF_FFFF)));
}

#[test]
fn compressed_expansion_and_gating() {
    // c.li a0, 5
    let d = decode(0x4515);
    assert_eq!(d.size, 2);
    assert_eq!(d.word, 0x4515);
    assert_eq!(d.op_type, OpType::Alu);
    assert_eq!((d.rd, d.imm), (10, 5));

    let off = DecodeContext {
        compressed: false,
        ..ctx(PrivilegeMode::Machine)
    };
    assert_eq!(
        decode_in(0x4515, &off).exception,
        Some(Trap::IllegalInstruction(0x4515))
    );
    assert_eq!(decode(0x0000).exception, Some(Trap::IllegalInstruction(0)));
}

#[test]
fn fetch_fault_passes_through() {
    let mut f = fetched(0x3000, 0, FetchReason::Mispredict);
    f.exception = Some(Trap::InstructionPageFault(0x3000));
    let d = StandardDecoder.decode(&f, &ctx(PrivilegeMode::Machine));
    assert_eq!(d.exception, Some(Trap::InstructionPageFault(0x3000)));
    assert_eq!(d.reason, FetchReason::Mispredict);
    assert_eq!(d.rd, 0);
}

#[test]
fn handoff_reads_registers() {
    let mut regs = RegisterFile::new();
    regs.write(1, 11);
    regs.write(2, 22);

    let mut input = Latch::new();
    input.put(fetched(0x1000, I::new().add(3, 1, 2).build(), FetchReason::Prefetch));
    let mut de_ex = Latch::new();

    let c = ctx(PrivilegeMode::Machine);
    assert!(decode_stage(&mut input, &mut de_ex, &StandardDecoder, &c, &regs, false));
    let d = de_ex.peek().expect("handed off");
    assert_eq!((d.rv1, d.rv2), (11, 22));
    assert!(input.is_empty());
}

#[test]
fn handoff_waits_for_empty_register() {
    let regs = RegisterFile::new();
    let mut input = Latch::new();
    input.put(fetched(0x1004, I::nop(), FetchReason::Prefetch));
    let mut de_ex = Latch::new();
    de_ex.put(DecodedInstruction::default());

    let c = ctx(PrivilegeMode::Machine);
    assert!(!decode_stage(&mut input, &mut de_ex, &StandardDecoder, &c, &regs, false));
    assert!(input.is_full());
}
