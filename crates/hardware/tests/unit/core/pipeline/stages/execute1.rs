//! Execute-1 Tests.
//!
//! Issue gating, bypass and stall behaviour, and branch/jump resolution.

use pretty_assertions::assert_eq;
use rvpipe_core::common::Trap;
use rvpipe_core::core::pipeline::control::PipelineControlState;
use rvpipe_core::core::pipeline::hazards::BypassSource;
use rvpipe_core::core::pipeline::latches::{Execute1Result, Latch, Redirect};
use rvpipe_core::core::pipeline::signals::{
    AluOp, CmpOp, CsrOp, FetchReason, MemWidth,
};
use rvpipe_core::core::pipeline::stages::{Execute1, Execute1Event};
use rvpipe_core::core::pipeline::traits::PipelineLatch;

use crate::common::builder::pipeline_state::DecodedBuilder;

const DRAIN: PipelineControlState = PipelineControlState::MispredictDrain;

fn issue(ex1: &mut Execute1, d: DecodedBuilder) -> (Execute1Event, Option<Execute1Result>) {
    let mut de_ex = Latch::new();
    de_ex.put(d.reason(FetchReason::Mispredict).build());
    let event = ex1.tick(&mut de_ex, DRAIN, None);
    (event, ex1.output.take())
}

#[test]
fn idle_when_nothing_waits() {
    let mut ex1 = Execute1::new(2, false);
    let mut de_ex = Latch::new();
    assert_eq!(ex1.tick(&mut de_ex, DRAIN, None), Execute1Event::Idle);
}

#[test]
fn wrong_path_is_dropped() {
    let mut ex1 = Execute1::new(2, false);
    let mut de_ex = Latch::new();
    de_ex.put(DecodedBuilder::new(0x1000).build());

    assert_eq!(ex1.tick(&mut de_ex, DRAIN, None), Execute1Event::Dropped);
    assert!(de_ex.is_empty());
    assert!(ex1.output.is_empty());
}

#[test]
fn normal_state_follows_expected_pc() {
    let mut ex1 = Execute1::new(2, false);
    let (event, _) = issue(&mut ex1, DecodedBuilder::new(0x1000));
    assert_eq!(event, Execute1Event::Issued { mispredict: None });
    assert_eq!(ex1.expected_pc(), 0x1004);

    let normal = PipelineControlState::Normal;
    let mut de_ex = Latch::new();
    de_ex.put(DecodedBuilder::new(0x1008).build());
    assert_eq!(ex1.tick(&mut de_ex, normal, None), Execute1Event::Dropped);

    de_ex.put(DecodedBuilder::new(0x1004).build());
    assert_eq!(
        ex1.tick(&mut de_ex, normal, None),
        Execute1Event::Issued { mispredict: None }
    );
}

#[test]
fn alu_uses_bypassed_operand() {
    let mut ex1 = Execute1::new(2, false);
    let mut de_ex = Latch::new();
    de_ex.put(
        DecodedBuilder::new(0x1000)
            .reason(FetchReason::Mispredict)
            .alu_ri(AluOp::Add)
            .rd(2)
            .rs1(1, 0xDEAD)
            .imm(2)
            .build(),
    );

    let event = ex1.tick(&mut de_ex, DRAIN, Some(BypassSource::ready(1, 40)));
    assert_eq!(event, Execute1Event::Issued { mispredict: None });
    let r = ex1.output.peek().expect("issued");
    assert_eq!(r.primary, 42);
    assert_eq!(r.decoded.rv1, 40);
    assert!(r.result_valid);
    assert_eq!(ex1.bypass(), Some(BypassSource::ready(2, 42)));
}

#[test]
fn pending_producer_stalls() {
    let mut ex1 = Execute1::new(2, false);
    let mut de_ex = Latch::new();
    de_ex.put(
        DecodedBuilder::new(0x1000)
            .reason(FetchReason::Mispredict)
            .alu_rr(AluOp::Add)
            .rd(3)
            .rs1(1, 0)
            .rs2(2, 0)
            .build(),
    );

    let event = ex1.tick(&mut de_ex, DRAIN, Some(BypassSource::pending(2)));
    assert_eq!(event, Execute1Event::Stalled);
    assert!(de_ex.is_full());

    let event = ex1.tick(&mut de_ex, DRAIN, Some(BypassSource::ready(2, 5)));
    assert_eq!(event, Execute1Event::Issued { mispredict: None });
}

#[test]
fn full_output_stalls() {
    let mut ex1 = Execute1::new(2, false);
    let (_, first) = issue(&mut ex1, DecodedBuilder::new(0x1000));
    ex1.output.put(first.expect("issued"));

    let mut de_ex = Latch::new();
    de_ex.put(DecodedBuilder::new(0x1004).build());
    let event = ex1.tick(&mut de_ex, PipelineControlState::Normal, None);
    assert_eq!(event, Execute1Event::Stalled);
}

#[test]
fn predicted_taken_branch_resolving_not_taken() {
    let mut ex1 = Execute1::new(2, false);
    let d = DecodedBuilder::new(0x2000)
        .branch(CmpOp::Eq)
        .rs1(1, 1)
        .rs2(2, 2)
        .imm(0x100)
        .predicted(0x2100);

    let (event, r) = issue(&mut ex1, d);
    assert_eq!(
        event,
        Execute1Event::Issued {
            mispredict: Some(Redirect {
                target: 0x2004,
                reason: FetchReason::Mispredict,
            })
        }
    );
    assert_eq!(r.expect("issued").npc, 0x2004);
    assert_eq!(ex1.expected_pc(), 0x2004);
}

#[test]
fn unpredicted_taken_branch() {
    let mut ex1 = Execute1::new(2, false);
    let d = DecodedBuilder::new(0x2000)
        .branch(CmpOp::Eq)
        .rs1(1, 7)
        .rs2(2, 7)
        .imm(0x40);

    let (event, _) = issue(&mut ex1, d);
    assert_eq!(
        event,
        Execute1Event::Issued {
            mispredict: Some(Redirect {
                target: 0x2040,
                reason: FetchReason::Mispredict,
            })
        }
    );
}

#[test]
fn correctly_predicted_backward_branch() {
    let mut ex1 = Execute1::new(2, false);
    let d = DecodedBuilder::new(0x2000)
        .branch(CmpOp::Ne)
        .rs1(1, 1)
        .rs2(2, 0)
        .imm(-0x100)
        .predicted(0x1F00);

    let (event, r) = issue(&mut ex1, d);
    assert_eq!(event, Execute1Event::Issued { mispredict: None });
    assert_eq!(r.expect("issued").npc, 0x1F00);
}

#[test]
fn jalr_clears_low_bit_and_links() {
    let mut ex1 = Execute1::new(2, false);
    let d = DecodedBuilder::new(0x1000).jump().rd(1).rs1(5, 0x3001);

    let (event, r) = issue(&mut ex1, d);
    let r = r.expect("issued");
    assert_eq!(r.npc, 0x3000);
    assert_eq!(r.primary, 0x1004);
    assert!(r.result_valid);
    assert_eq!(
        event,
        Execute1Event::Issued {
            mispredict: Some(Redirect {
                target: 0x3000,
                reason: FetchReason::Mispredict,
            })
        }
    );
}

#[test]
fn misaligned_jump_target_traps_without_redirect() {
    let mut ex1 = Execute1::new(4, false);
    let d = DecodedBuilder::new(0x1000).jump().rd(1).imm(0x102);

    let (event, r) = issue(&mut ex1, d);
    assert_eq!(event, Execute1Event::Issued { mispredict: None });
    let r = r.expect("issued");
    assert_eq!(r.exception, Some(Trap::InstructionAddressMisaligned(0x1102)));
    assert!(!r.result_valid);
}

#[test]
fn misaligned_result_is_not_a_bypass_source() {
    let mut ex1 = Execute1::new(4, false);
    let mut de_ex = Latch::new();
    de_ex.put(
        DecodedBuilder::new(0x1000)
            .reason(FetchReason::Mispredict)
            .jump()
            .rd(1)
            .imm(0x102)
            .build(),
    );
    let _ = ex1.tick(&mut de_ex, DRAIN, None);
    assert_eq!(ex1.bypass(), None);
}

#[test]
fn pass_through_exception_keeps_predicted_path() {
    let mut ex1 = Execute1::new(2, false);
    let d = DecodedBuilder::new(0x3000)
        .rd(4)
        .exception(Trap::InstructionPageFault(0x3000));

    let (event, r) = issue(&mut ex1, d);
    assert_eq!(event, Execute1Event::Issued { mispredict: None });
    assert_eq!(r.expect("issued").exception, Some(Trap::InstructionPageFault(0x3000)));
}

#[test]
fn memory_address_and_pending_bypass() {
    let mut ex1 = Execute1::new(2, false);
    let mut de_ex = Latch::new();
    de_ex.put(
        DecodedBuilder::new(0x1000)
            .reason(FetchReason::Mispredict)
            .load(MemWidth::Double, true)
            .rd(6)
            .rs1(1, 0x8000)
            .imm(-8)
            .build(),
    );
    let _ = ex1.tick(&mut de_ex, DRAIN, None);

    let r = ex1.output.peek().expect("issued");
    assert_eq!(r.primary, 0x7FF8);
    assert!(!r.result_valid);
    assert_eq!(ex1.bypass(), Some(BypassSource::pending(6)));
}

#[test]
fn store_forwards_data_operand() {
    let mut ex1 = Execute1::new(2, false);
    let d = DecodedBuilder::new(0x1000)
        .store(MemWidth::Word)
        .rs1(1, 0x100)
        .rs2(2, 0xAB)
        .imm(4);

    let (_, r) = issue(&mut ex1, d);
    let r = r.expect("issued");
    assert_eq!((r.primary, r.secondary), (0x104, 0xAB));
}

#[test]
fn csr_immediate_source() {
    let mut ex1 = Execute1::new(2, false);
    let d = DecodedBuilder::new(0x1000).csr(CsrOp::Rsi, 0x340).rd(1).imm(9);
    let (_, r) = issue(&mut ex1, d);
    assert_eq!(r.expect("issued").primary, 9);
}
