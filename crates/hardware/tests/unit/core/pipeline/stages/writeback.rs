//! Writeback and redirect priority tests.

use pretty_assertions::assert_eq;
use rvpipe_core::common::{RegisterFile, Trap, TrapRecord};
use rvpipe_core::core::pipeline::latches::{Execute2Outcome, Latch, Redirect};
use rvpipe_core::core::pipeline::signals::FetchReason;
use rvpipe_core::core::pipeline::stages::{select_redirect, writeback};

use crate::common::builder::pipeline_state::DecodedBuilder;

fn commit(rd: usize, value: u64) -> Execute2Outcome {
    Execute2Outcome {
        pc: 0x1000,
        rd,
        value,
        write: rd != 0,
        trap: None,
        redirect: None,
    }
}

fn trapped() -> Execute2Outcome {
    Execute2Outcome {
        write: false,
        trap: Some(TrapRecord {
            trap: Trap::EnvironmentCallFromMMode,
            epc: 0x1000,
            vector: 0x8000,
        }),
        ..commit(5, 0)
    }
}

const MISPREDICT: Redirect = Redirect {
    target: 0x2004,
    reason: FetchReason::Mispredict,
};

#[test]
fn trap_vector_has_highest_priority() {
    let r = select_redirect(Some(&trapped()), Some(MISPREDICT));
    assert_eq!(
        r,
        Some(Redirect {
            target: 0x8000,
            reason: FetchReason::Exception,
        })
    );
}

#[test]
fn execute2_redirect_beats_mispredict() {
    let fence = Redirect {
        target: 0x1004,
        reason: FetchReason::FenceI,
    };
    let o = Execute2Outcome {
        redirect: Some(fence),
        ..commit(0, 0)
    };
    assert_eq!(select_redirect(Some(&o), Some(MISPREDICT)), Some(fence));
}

#[test]
fn mispredict_used_when_execute2_is_quiet() {
    assert_eq!(select_redirect(Some(&commit(1, 1)), Some(MISPREDICT)), Some(MISPREDICT));
    assert_eq!(select_redirect(None, Some(MISPREDICT)), Some(MISPREDICT));
    assert_eq!(select_redirect(None, None), None);
}

#[test]
fn commit_writes_register_and_refreshes_waiting_operands() {
    let mut regs = RegisterFile::new();
    let mut de_ex = Latch::new();
    de_ex.put(DecodedBuilder::new(0x1004).rs1(7, 0).rs2(7, 0).build());

    assert!(writeback(&commit(7, 99), &mut regs, &mut de_ex, false));
    assert_eq!(regs.read(7), 99);
    let d = de_ex.peek().expect("still waiting");
    assert_eq!((d.rv1, d.rv2), (99, 99));
}

#[test]
fn trap_and_x0_do_not_write() {
    let mut regs = RegisterFile::new();
    let mut de_ex = Latch::new();

    assert!(!writeback(&trapped(), &mut regs, &mut de_ex, false));
    assert_eq!(regs.read(5), 0);

    let to_x0 = Execute2Outcome {
        write: true,
        ..commit(0, 123)
    };
    assert!(!writeback(&to_x0, &mut regs, &mut de_ex, false));
    assert_eq!(regs.read(0), 0);
}
