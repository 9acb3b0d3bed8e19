//! Divider.
//!
//! Same handshake as the multiplier with a much longer latency, modelling a
//! radix-2 iterative divider (one quotient bit per cycle).

use super::alu::arithmetic;
use crate::core::pipeline::signals::DivOp;

/// Multi-cycle divide/remainder unit.
#[derive(Clone, Debug)]
pub struct DivideUnit {
    latency: u64,
    /// Cycles left and the precomputed result.
    pending: Option<(u64, u64)>,
}

impl DivideUnit {
    /// Creates an idle unit with the given latency (clamped to at least 1).
    pub fn new(latency: u64) -> Self {
        Self {
            latency: latency.max(1),
            pending: None,
        }
    }

    /// Starts a divide or remainder.
    pub fn start(&mut self, op: DivOp, a: u64, b: u64, is32: bool) {
        self.pending = Some((self.latency, arithmetic::divide(op, a, b, is32)));
    }

    /// Advances the unit by one cycle.
    pub fn tick(&mut self) {
        if let Some((remaining, _)) = self.pending.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Returns the result once the latency has elapsed.
    pub fn result(&self) -> Option<u64> {
        match self.pending {
            Some((0, value)) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` while an operation is in progress or its result is unread.
    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the operation in progress.
    pub fn flush(&mut self) {
        self.pending = None;
    }
}
