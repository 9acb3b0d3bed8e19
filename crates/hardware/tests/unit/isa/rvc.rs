//! Compressed expansion tests.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvpipe_core::isa::rvc::expand;

use crate::common::builder::instruction::InstructionBuilder as I;

#[rstest]
#[case::c_li(0x4515, I::new().addi(10, 0, 5).build())]
#[case::c_addi(0x0505, I::new().addi(10, 10, 1).build())]
#[case::c_addiw(0x357D, I::new().addiw(10, 10, -1).build())]
#[case::c_lui(0x6505, I::new().lui(10, 1).build())]
#[case::c_mv(0x852E, I::new().add(10, 0, 11).build())]
#[case::c_sub(0x8C05, I::new().sub(8, 8, 9).build())]
#[case::c_slli(0x050E, I::new().slli(10, 10, 3).build())]
#[case::c_srai(0x8411, I::new().srai(8, 8, 4).build())]
#[case::c_lw(0x4048, I::new().lw(10, 8, 4).build())]
#[case::c_ldsp(0x6522, I::new().ld(10, 2, 8).build())]
#[case::c_jr(0x8082, I::new().jalr(0, 1, 0).build())]
#[case::c_j(0xBFFD, I::new().jal(0, -2).build())]
#[case::c_beqz(0xDC7D, I::new().beq(8, 0, -2).build())]
#[case::c_ebreak(0x9002, I::ebreak())]
fn expands_to_full_width(#[case] half: u16, #[case] expected: u32) {
    assert_eq!(expand(half), expected);
}

#[rstest]
#[case::all_zero(0x0000)]
#[case::c_fld(0x2000)]
#[case::c_addiw_x0(0x2001)]
#[case::c_lwsp_x0(0x4002)]
#[case::full_width_quadrant(0x0013)]
fn reserved_forms_expand_to_zero(#[case] half: u16) {
    assert_eq!(expand(half), 0);
}
