//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the pipeline. It performs the following:
//! 1. **Register Commit:** Writes the execute-2 result to the register file on a
//!    non-trapping commit, and refreshes the operands of the instruction waiting in
//!    decode → execute-1 so it never observes a stale read.
//! 2. **Redirect Selection:** Picks at most one fetch redirect per cycle:
//!    trap vector, then execute-2's redirect, then execute-1's misprediction.

use tracing::trace;

use crate::common::RegisterFile;
use crate::core::pipeline::latches::{DecodedInstruction, Execute2Outcome, Latch, Redirect};
use crate::core::pipeline::signals::FetchReason;

/// Priority encoder for fetch redirects.
///
/// # Arguments
///
/// * `ex2` - This cycle's execute-2 commit.
/// * `mispredict` - Correction requested by execute-1.
///
/// # Returns
///
/// The redirect to apply, if any.
pub fn select_redirect(
    ex2: Option<&Execute2Outcome>,
    mispredict: Option<Redirect>,
) -> Option<Redirect> {
    if let Some(o) = ex2 {
        if let Some(t) = o.trap {
            return Some(Redirect {
                target: t.vector,
                reason: FetchReason::Exception,
            });
        }
        if o.redirect.is_some() {
            return o.redirect;
        }
    }
    mispredict
}

/// Commits an execute-2 outcome to the register file.
///
/// # Arguments
///
/// * `outcome` - This cycle's execute-2 commit.
/// * `regs` - Architectural register file.
/// * `de_ex` - Decode → execute-1 register whose captured operands are refreshed.
/// * `trace` - Emit a per-instruction trace event.
///
/// # Returns
///
/// `true` if a register was written.
pub fn writeback(
    outcome: &Execute2Outcome,
    regs: &mut RegisterFile,
    de_ex: &mut Latch<DecodedInstruction>,
    trace: bool,
) -> bool {
    if outcome.trap.is_some() || !outcome.write || outcome.rd == 0 {
        return false;
    }

    regs.write(outcome.rd, outcome.value);
    if let Some(d) = de_ex.peek_mut() {
        if d.rs1 == outcome.rd {
            d.rv1 = outcome.value;
        }
        if d.rs2 == outcome.rd {
            d.rv2 = outcome.value;
        }
    }

    if trace {
        trace!(
            target: "WB",
            "pc={:#x} x{} <- {:#x}",
            outcome.pc,
            outcome.rd,
            outcome.value
        );
    }
    true
}
