//! Pipeline registers and the records they carry.
//!
//! This module defines the single-slot registers between stages and the entry
//! types flowing through them:
//! Fetch → Decode → Execute-1 → Execute-2 → Writeback.
//!
//! 1. **Latches:** `Latch<T>` holds at most one value; `transfer` is the one
//!    valid/ready handshake every stage boundary uses.
//! 2. **Instruction Flow:** Fetched, decoded and execute-1 records.
//! 3. **Commit:** The execute-2 outcome, the only source of register writes and
//!    architectural redirects.

use super::signals::{
    AluOp, CmpOp, CsrOp, DivOp, FetchReason, MemOp, MulOp, OpASrc, OpBSrc, OpType, SysOp,
};
use super::traits::PipelineLatch;
use crate::common::constants::instruction_size;
use crate::common::{Trap, TrapRecord};

/// A single-slot pipeline register.
///
/// Empty means "not valid"; the consumer is ready exactly when the slot is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Latch<T> {
    slot: Option<T>,
}

impl<T> Default for Latch<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> Latch<T> {
    /// Creates an empty latch.
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Returns `true` when the latch holds a value.
    pub const fn is_full(&self) -> bool {
        self.slot.is_some()
    }

    /// Borrows the held value.
    pub const fn peek(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    /// Mutably borrows the held value.
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.slot.as_mut()
    }

    /// Stores `value`, replacing anything held.
    pub fn put(&mut self, value: T) {
        self.slot = Some(value);
    }

    /// Removes and returns the held value.
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }
}

impl<T> PipelineLatch for Latch<T> {
    fn flush(&mut self) {
        self.slot = None;
    }

    fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

/// Moves a value across a stage boundary.
///
/// Fires only when `src` is full and `dst` is empty; the value is converted
/// by `f` on the way.
///
/// # Returns
///
/// `true` if the transfer happened.
pub fn transfer<A, B>(src: &mut Latch<A>, dst: &mut Latch<B>, f: impl FnOnce(A) -> B) -> bool {
    if dst.is_full() {
        return false;
    }
    match src.take() {
        Some(value) => {
            dst.put(f(value));
            true
        }
        None => false,
    }
}

/// Static prediction attached by fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Prediction {
    /// Predicted taken.
    pub taken: bool,
    /// Predicted target (meaningless when not taken).
    pub target: u64,
}

/// Entry produced by the fetch unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchedInstruction {
    /// Program counter of the instruction.
    pub pc: u64,
    /// Fetched bits; only the low half is meaningful for compressed instructions.
    pub word: u32,
    /// Reason of the fetch that produced this instruction.
    pub reason: FetchReason,
    /// Fetch fault, if any.
    pub exception: Option<Trap>,
    /// Static prediction.
    pub prediction: Prediction,
}

impl FetchedInstruction {
    /// Instruction length in bytes (2 or 4).
    pub const fn size(&self) -> u64 {
        instruction_size(self.word)
    }

    /// Address fetch continues at after this instruction.
    pub fn predicted_next_pc(&self) -> u64 {
        if self.prediction.taken {
            self.prediction.target
        } else {
            self.pc.wrapping_add(self.size())
        }
    }
}

/// Entry in the decode → execute-1 register.
///
/// Carries the decoder's control fields plus the register values read at
/// handoff (`rv1`/`rv2`), which writeback refreshes while the entry waits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Program counter of the instruction.
    pub pc: u64,
    /// Raw encoding (the 16-bit form for compressed instructions).
    pub word: u32,
    /// Instruction length in bytes.
    pub size: u64,
    /// Functional unit class.
    pub op_type: OpType,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Destination register index (0 when nothing is written).
    pub rd: usize,
    /// `rs1` is read (bypass and stall apply).
    pub uses_rs1: bool,
    /// `rs2` is read (bypass and stall apply).
    pub uses_rs2: bool,
    /// Sign-extended immediate.
    pub imm: i64,
    /// ALU function.
    pub alu_op: AluOp,
    /// ALU operand A source.
    pub a_src: OpASrc,
    /// ALU operand B source.
    pub b_src: OpBSrc,
    /// Word (`*W`) form.
    pub is32: bool,
    /// Branch comparator function.
    pub cmp_op: CmpOp,
    /// Multiplier function.
    pub mul_op: MulOp,
    /// Divider function.
    pub div_op: DivOp,
    /// Memory access control.
    pub mem: MemOp,
    /// CSR address.
    pub csr_addr: u16,
    /// CSR access form.
    pub csr_op: CsrOp,
    /// System operation.
    pub sys_op: SysOp,
    /// Fetch fault or decode illegality, passed through to execute-2.
    pub exception: Option<Trap>,
    /// Fetch reason, passed through for issue gating.
    pub reason: FetchReason,
    /// Static prediction, passed through for mispredict detection.
    pub prediction: Prediction,
    /// `rs1` value read at handoff.
    pub rv1: u64,
    /// `rs2` value read at handoff.
    pub rv2: u64,
}

impl DecodedInstruction {
    /// Address the front end fetched after this instruction.
    pub fn predicted_next_pc(&self) -> u64 {
        if self.prediction.taken {
            self.prediction.target
        } else {
            self.pc.wrapping_add(self.size)
        }
    }
}

/// Entry in the execute-1 → execute-2 register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Execute1Result {
    /// The instruction, with bypassed operand values in `rv1`/`rv2`.
    pub decoded: DecodedInstruction,
    /// ALU result, link address, effective address, first operand or CSR source.
    pub primary: u64,
    /// Store data, AMO operand or second multiply/divide operand.
    pub secondary: u64,
    /// Resolved next PC.
    pub npc: u64,
    /// `primary` is the final register value (bypassable from this latch).
    pub result_valid: bool,
    /// Exception to commit (pass-through or a misaligned jump target).
    pub exception: Option<Trap>,
}

/// An architectural redirect requested by execute-2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redirect {
    /// Address to fetch next.
    pub target: u64,
    /// Reason tag for the new stream.
    pub reason: FetchReason,
}

/// What execute-2 committed this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Execute2Outcome {
    /// Program counter of the committed instruction.
    pub pc: u64,
    /// Destination register.
    pub rd: usize,
    /// Value written to `rd`.
    pub value: u64,
    /// A register write happens (`rd != 0`, no trap).
    pub write: bool,
    /// The instruction trapped instead of executing.
    pub trap: Option<TrapRecord>,
    /// Non-sequential continuation (fence, translation/protection change, xRET).
    pub redirect: Option<Redirect>,
}
