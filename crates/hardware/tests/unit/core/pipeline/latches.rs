//! Latch handshake tests.

use pretty_assertions::assert_eq;
use rvpipe_core::core::pipeline::latches::{FetchedInstruction, Latch, Prediction, transfer};
use rvpipe_core::core::pipeline::signals::FetchReason;
use rvpipe_core::core::pipeline::traits::PipelineLatch;

use crate::common::builder::pipeline_state::{DecodedBuilder, fetched};

#[test]
fn transfer_moves_value_when_destination_empty() {
    let mut src = Latch::new();
    let mut dst: Latch<u64> = Latch::new();
    src.put(7_u32);

    assert!(transfer(&mut src, &mut dst, u64::from));
    assert!(src.is_empty());
    assert_eq!(dst.peek(), Some(&7));
}

#[test]
fn transfer_holds_value_when_destination_full() {
    let mut src = Latch::new();
    let mut dst = Latch::new();
    src.put(1_u32);
    dst.put(2_u32);

    assert!(!transfer(&mut src, &mut dst, |v| v));
    assert_eq!(src.peek(), Some(&1));
    assert_eq!(dst.peek(), Some(&2));
}

#[test]
fn transfer_from_empty_source_is_noop() {
    let mut src: Latch<u32> = Latch::new();
    let mut dst: Latch<u32> = Latch::new();
    assert!(!transfer(&mut src, &mut dst, |v| v));
    assert!(dst.is_empty());
}

#[test]
fn flush_empties_latch() {
    let mut l = Latch::new();
    l.put(fetched(0x1000, 0x13, FetchReason::Prefetch));
    l.flush();
    assert!(l.is_empty());
    assert!(!l.is_full());
}

#[test]
fn predicted_next_pc_follows_size_and_prediction() {
    let seq = fetched(0x1000, 0x13, FetchReason::Prefetch);
    assert_eq!(seq.size(), 4);
    assert_eq!(seq.predicted_next_pc(), 0x1004);

    let compressed = FetchedInstruction {
        word: 0x0001,
        ..seq
    };
    assert_eq!(compressed.size(), 2);
    assert_eq!(compressed.predicted_next_pc(), 0x1002);

    let taken = FetchedInstruction {
        prediction: Prediction {
            taken: true,
            target: 0x0F00,
        },
        ..seq
    };
    assert_eq!(taken.predicted_next_pc(), 0x0F00);

    let decoded = DecodedBuilder::new(0x2000).predicted(0x2100).build();
    assert_eq!(decoded.predicted_next_pc(), 0x2100);
}
