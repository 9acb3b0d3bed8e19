//! Execute-1 (EX1) Stage.
//!
//! This module implements the first execute stage. It performs the following:
//! 1. **Issue Gating:** Drops wrong-path instructions according to the squash state.
//! 2. **Operand Bypass:** Resolves `rs1`/`rs2` against execute-2 and the pending
//!    execute-1 result; an unavailable producer stalls issue.
//! 3. **ALU and Branch Resolution:** Computes ALU results, link addresses, branch
//!    outcomes, jump targets and effective addresses.
//! 4. **Misprediction Detection:** Compares the resolved next PC with the one fetch
//!    predicted.

use tracing::{debug, trace};

use crate::common::Trap;
use crate::core::pipeline::control::PipelineControlState;
use crate::core::pipeline::hazards::{BypassSource, resolve_operand};
use crate::core::pipeline::latches::{DecodedInstruction, Execute1Result, Latch, Redirect};
use crate::core::pipeline::signals::{FetchReason, OpASrc, OpBSrc, OpType};
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::alu::{Alu, compare};

/// What execute-1 did this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Execute1Event {
    /// Nothing waiting in decode → execute-1.
    Idle,
    /// The waiting instruction was wrong-path and has been discarded.
    Dropped,
    /// The waiting instruction could not issue (operand or output not ready).
    Stalled,
    /// An instruction moved to the execute-1 → execute-2 register.
    Issued {
        /// Correction to send to fetch when the prediction was wrong.
        mispredict: Option<Redirect>,
    },
}

/// Execute-1 stage state.
#[derive(Clone, Debug)]
pub struct Execute1 {
    /// Instruction alignment in bytes (2 with compressed support, else 4).
    min_size: u64,
    trace: bool,
    /// Next PC of the last issued instruction.
    expected_pc: u64,
    /// Execute-1 → execute-2 register.
    pub output: Latch<Execute1Result>,
}

impl Execute1 {
    /// Creates the stage.
    ///
    /// # Arguments
    ///
    /// * `min_size` - Minimum instruction size; jump targets must be aligned to it.
    /// * `trace` - Emit per-instruction trace events.
    pub const fn new(min_size: u64, trace: bool) -> Self {
        Self {
            min_size,
            trace,
            expected_pc: 0,
            output: Latch::new(),
        }
    }

    /// Empties the output register.
    pub fn reset(&mut self) {
        self.output.flush();
        self.expected_pc = 0;
    }

    /// Next PC expected in `Normal` state.
    pub const fn expected_pc(&self) -> u64 {
        self.expected_pc
    }

    /// Bypass view of the pending result in the output register.
    pub fn bypass(&self) -> Option<BypassSource> {
        let r = self.output.peek()?;
        let rd = destination(r);
        if rd == 0 {
            return None;
        }
        Some(if r.result_valid {
            BypassSource::ready(rd, r.primary)
        } else {
            BypassSource::pending(rd)
        })
    }

    /// Advances execute-1 by one cycle.
    ///
    /// # Arguments
    ///
    /// * `de_ex` - Decode → execute-1 register.
    /// * `state` - Squash state after this cycle's execute-2 commit.
    /// * `ex2` - Bypass view of the instruction held by execute-2.
    pub fn tick(
        &mut self,
        de_ex: &mut Latch<DecodedInstruction>,
        state: PipelineControlState,
        ex2: Option<BypassSource>,
    ) -> Execute1Event {
        let Some(d) = de_ex.peek().copied() else {
            return Execute1Event::Idle;
        };

        if !state.admits(d.pc, d.reason, self.expected_pc) {
            let _ = de_ex.take();
            if self.trace {
                trace!(
                    target: "EX1",
                    "drop pc={:#x} reason={} ({state:?}, expect {:#x})",
                    d.pc,
                    d.reason.label(),
                    self.expected_pc
                );
            }
            return Execute1Event::Dropped;
        }

        let candidates = [ex2, self.bypass()];
        let rv1 = if d.uses_rs1 {
            resolve_operand(d.rs1, d.rv1, candidates.iter().flatten())
        } else {
            Some(d.rv1)
        };
        let rv2 = if d.uses_rs2 {
            resolve_operand(d.rs2, d.rv2, candidates.iter().flatten())
        } else {
            Some(d.rv2)
        };
        let (Some(rv1), Some(rv2)) = (rv1, rv2) else {
            return Execute1Event::Stalled;
        };
        if self.output.is_full() {
            return Execute1Event::Stalled;
        }

        let _ = de_ex.take();
        let decoded = DecodedInstruction { rv1, rv2, ..d };
        let result = self.compute(decoded);
        let predicted = decoded.predicted_next_pc();
        let mispredict = (result.npc != predicted).then_some(Redirect {
            target: result.npc,
            reason: FetchReason::Mispredict,
        });

        if self.trace {
            trace!(
                target: "EX1",
                "issue pc={:#x} {:?} primary={:#x} npc={:#x}",
                d.pc,
                d.op_type,
                result.primary,
                result.npc
            );
        }
        if mispredict.is_some() {
            debug!(
                target: "EX1",
                "mispredict pc={:#x}: predicted {predicted:#x}, actual {:#x}",
                d.pc,
                result.npc
            );
        }

        self.expected_pc = result.npc;
        self.output.put(result);
        Execute1Event::Issued { mispredict }
    }

    /// Computes the execute-1 result of an instruction with resolved operands.
    fn compute(&self, d: DecodedInstruction) -> Execute1Result {
        let sequential = d.pc.wrapping_add(d.size);
        let mut r = Execute1Result {
            decoded: d,
            npc: sequential,
            ..Default::default()
        };

        if let Some(trap) = d.exception {
            r.exception = Some(trap);
            r.npc = d.predicted_next_pc();
            return r;
        }

        let target = match d.op_type {
            OpType::Alu => {
                let a = match d.a_src {
                    OpASrc::Reg1 => d.rv1,
                    OpASrc::Pc => d.pc,
                    OpASrc::Zero => 0,
                };
                let b = match d.b_src {
                    OpBSrc::Imm => d.imm as u64,
                    OpBSrc::Reg2 => d.rv2,
                    OpBSrc::Zero => 0,
                };
                r.primary = Alu::execute(d.alu_op, a, b, d.is32);
                r.result_valid = true;
                None
            }
            OpType::Branch => {
                compare(d.cmp_op, d.rv1, d.rv2).then(|| d.pc.wrapping_add(d.imm as u64))
            }
            OpType::Jump => {
                r.primary = sequential;
                r.result_valid = true;
                Some(if d.uses_rs1 {
                    d.rv1.wrapping_add(d.imm as u64) & !1
                } else {
                    d.pc.wrapping_add(d.imm as u64)
                })
            }
            OpType::Mem => {
                r.primary = d.rv1.wrapping_add(d.imm as u64);
                r.secondary = d.rv2;
                None
            }
            OpType::Mul | OpType::Div | OpType::System => {
                r.primary = d.rv1;
                r.secondary = d.rv2;
                None
            }
            OpType::Csr => {
                r.primary = if d.csr_op.is_immediate() {
                    d.imm as u64
                } else {
                    d.rv1
                };
                None
            }
        };

        if let Some(target) = target {
            if target % self.min_size == 0 {
                r.npc = target;
            } else {
                r.exception = Some(Trap::InstructionAddressMisaligned(target));
                r.result_valid = false;
                r.npc = d.predicted_next_pc();
            }
        }
        r
    }
}

/// Register an execute-1 result will write, or 0.
fn destination(r: &Execute1Result) -> usize {
    if r.exception.is_some() {
        0
    } else {
        r.decoded.rd
    }
}
