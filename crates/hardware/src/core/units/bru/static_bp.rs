//! Static Branch Predictor.
//!
//! Predicts directly from the fetched bits, with no tables:
//! 1. **Jumps:** `JAL` and `C.J` are always predicted taken.
//! 2. **Branches:** Conditional branches (including `C.BEQZ`/`C.BNEZ`) are predicted
//!    taken when the immediate is negative, i.e. backward loops are taken.
//! 3. **Indirect:** `JALR`/`C.JR` are never predicted; execute-1 resolves them.

use crate::common::constants::is_full_width;
use crate::core::pipeline::latches::Prediction;
use crate::isa::decode::{b_imm, cb_imm, cj_imm, j_imm};
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::major;
use crate::isa::rvc::constants::{QUADRANT_1, q1};

/// Static Branch Predictor.
#[derive(Clone, Copy, Debug)]
pub struct StaticPredictor {
    /// Recognize compressed control transfers.
    compressed: bool,
    /// When false, everything is predicted not-taken.
    enabled: bool,
}

impl StaticPredictor {
    /// Creates a predictor.
    ///
    /// # Arguments
    ///
    /// * `compressed` - Whether compressed instructions are enabled.
    /// * `enabled` - Whether to predict at all.
    pub fn new(compressed: bool, enabled: bool) -> Self {
        Self {
            compressed,
            enabled,
        }
    }

    /// Predicts the instruction whose first halfword starts `word`.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the instruction.
    /// * `word` - Fetched bits (the upper half is ignored for compressed forms).
    ///
    /// # Returns
    ///
    /// The prediction; `Prediction::default()` (not taken) for non-control instructions.
    pub fn predict(&self, pc: u64, word: u32) -> Prediction {
        if !self.enabled {
            return Prediction::default();
        }
        let offset = if is_full_width(word) {
            match word.opcode() {
                major::JAL => Some(j_imm(word)),
                major::BRANCH => Some(b_imm(word)).filter(|imm| *imm < 0),
                _ => None,
            }
        } else if self.compressed && (word & 0x3) as u16 == QUADRANT_1 {
            match ((word >> 13) & 0x7) as u16 {
                q1::C_J => Some(cj_imm(word)),
                q1::C_BEQZ | q1::C_BNEZ => Some(cb_imm(word)).filter(|imm| *imm < 0),
                _ => None,
            }
        } else {
            None
        };

        match offset {
            Some(off) => Prediction {
                taken: true,
                target: pc.wrapping_add(off as u64),
            },
            None => Prediction::default(),
        }
    }
}
