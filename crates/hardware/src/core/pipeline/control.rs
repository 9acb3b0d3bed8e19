//! Redirect/squash state machine.
//!
//! Reconciles the speculative fetch stream with resolved control flow. The
//! state decides which fetched instructions execute-1 may issue:
//!
//! | State             | Issues                                   |
//! |-------------------|------------------------------------------|
//! | `Normal`          | `pc` equal to the expected next PC       |
//! | `MispredictDrain` | instructions tagged with a redirect reason |
//! | `ExceptionDrain`  | instructions tagged `Exception`          |
//!
//! Everything else reaching execute-1 is wrong-path and is dropped.

use tracing::debug;

use super::latches::Execute2Outcome;
use super::signals::FetchReason;

/// Squash machine state. Reset value is `MispredictDrain`: the reset fetch is
/// tagged as a misprediction correction and is the first drain target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineControlState {
    /// Following the predicted stream.
    Normal,
    /// Waiting for the first instruction of a redirected stream.
    #[default]
    MispredictDrain,
    /// Waiting for the first instruction of a trap handler.
    ExceptionDrain,
}

/// Input to the transition function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    /// Execute-2 committed a trap.
    Trap,
    /// Execute-2 requested a non-sequential redirect (fence, status change, xRET).
    SystemRedirect,
    /// Execute-1 issued an instruction whose next PC differs from its prediction.
    Mispredict,
    /// Execute-1 issued the instruction the drain was waiting for.
    DrainTargetIssued,
}

impl PipelineControlState {
    /// Transition function.
    pub const fn next(self, event: ControlEvent) -> Self {
        match (self, event) {
            (_, ControlEvent::Trap) => Self::ExceptionDrain,
            (_, ControlEvent::SystemRedirect | ControlEvent::Mispredict) => Self::MispredictDrain,
            (
                Self::Normal | Self::MispredictDrain | Self::ExceptionDrain,
                ControlEvent::DrainTargetIssued,
            ) => Self::Normal,
        }
    }

    /// State after execute-2's commit for this cycle.
    pub fn after_execute2(self, outcome: Option<&Execute2Outcome>) -> Self {
        let event = match outcome {
            Some(o) if o.trap.is_some() => ControlEvent::Trap,
            Some(o) if o.redirect.is_some() => ControlEvent::SystemRedirect,
            _ => return self,
        };
        let next = self.next(event);
        if next != self {
            debug!(target: "CTL", "{self:?} -> {next:?} ({event:?})");
        }
        next
    }

    /// State after execute-1 issued an instruction.
    ///
    /// A drain target that itself mispredicts ends in `MispredictDrain`.
    pub fn after_issue(self, mispredicted: bool) -> Self {
        let mut next = self;
        if self != Self::Normal {
            next = next.next(ControlEvent::DrainTargetIssued);
        }
        if mispredicted {
            next = next.next(ControlEvent::Mispredict);
        }
        if next != self {
            debug!(target: "CTL", "{self:?} -> {next:?} (issue)");
        }
        next
    }

    /// Issue gating for the instruction waiting in execute-1.
    ///
    /// # Arguments
    ///
    /// * `pc` - PC of the candidate.
    /// * `reason` - Fetch reason the candidate carries.
    /// * `expected_pc` - Next PC of the last issued instruction.
    pub fn admits(self, pc: u64, reason: FetchReason, expected_pc: u64) -> bool {
        match self {
            Self::Normal => pc == expected_pc,
            Self::MispredictDrain => reason.is_redirect(),
            Self::ExceptionDrain => reason == FetchReason::Exception,
        }
    }
}
