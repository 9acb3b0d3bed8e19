//! ALU and comparator tests.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use rvpipe_core::core::pipeline::signals::{AluOp, CmpOp};
use rvpipe_core::core::units::alu::{Alu, compare};

#[rstest]
#[case(AluOp::Add, 5, 7, false, 12)]
#[case(AluOp::Sub, 5, 7, false, (-2_i64) as u64)]
#[case(AluOp::Add, 0x7FFF_FFFF, 1, true, 0xFFFF_FFFF_8000_0000)]
#[case(AluOp::Sll, 1, 63, false, 1 << 63)]
#[case(AluOp::Sll, 1, 31, true, 0xFFFF_FFFF_8000_0000)]
#[case(AluOp::Srl, 1 << 63, 63, false, 1)]
#[case(AluOp::Sra, 1 << 63, 63, false, u64::MAX)]
#[case(AluOp::Srl, 0xFFFF_FFFF_8000_0000, 31, true, 1)]
#[case(AluOp::Slt, (-1_i64) as u64, 0, false, 1)]
#[case(AluOp::Sltu, (-1_i64) as u64, 0, false, 0)]
#[case(AluOp::Xor, 0b1100, 0b1010, false, 0b0110)]
#[case(AluOp::Or, 0b1100, 0b1010, false, 0b1110)]
#[case(AluOp::And, 0b1100, 0b1010, false, 0b1000)]
fn alu_ops(#[case] op: AluOp, #[case] a: u64, #[case] b: u64, #[case] is32: bool, #[case] r: u64) {
    assert_eq!(Alu::execute(op, a, b, is32), r);
}

#[rstest]
#[case(CmpOp::Eq, 3, 3, true)]
#[case(CmpOp::Ne, 3, 3, false)]
#[case(CmpOp::Lt, (-1_i64) as u64, 1, true)]
#[case(CmpOp::Ltu, (-1_i64) as u64, 1, false)]
#[case(CmpOp::Ge, 1, (-1_i64) as u64, true)]
#[case(CmpOp::Geu, 1, (-1_i64) as u64, false)]
fn comparator(#[case] op: CmpOp, #[case] a: u64, #[case] b: u64, #[case] taken: bool) {
    assert_eq!(compare(op, a, b), taken);
}

proptest! {
    #[test]
    fn word_results_are_sign_extended(a: u64, b: u64) {
        for op in [AluOp::Add, AluOp::Sub, AluOp::Sll, AluOp::Srl, AluOp::Sra] {
            let r = Alu::execute(op, a, b & 0x1F, true);
            prop_assert_eq!(r, r as i32 as i64 as u64);
        }
    }
}
