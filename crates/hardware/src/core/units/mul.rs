//! Multiplier.
//!
//! A fixed-latency, non-pipelined multiply unit. The product is computed when
//! the operation starts and released after `latency` ticks; execute-2 polls
//! [`MultiplyUnit::result`] each cycle.

use super::alu::arithmetic;
use crate::core::pipeline::signals::MulOp;

#[derive(Clone, Copy, Debug)]
struct Pending {
    remaining: u64,
    value: u64,
}

/// Multi-cycle multiply unit.
#[derive(Clone, Debug)]
pub struct MultiplyUnit {
    latency: u64,
    pending: Option<Pending>,
}

impl MultiplyUnit {
    /// Creates an idle unit.
    ///
    /// # Arguments
    ///
    /// * `latency` - Cycles from `start` to a visible result (at least 1).
    pub fn new(latency: u64) -> Self {
        Self {
            latency: latency.max(1),
            pending: None,
        }
    }

    /// Starts a multiply. Any operation already in progress is discarded.
    pub fn start(&mut self, op: MulOp, a: u64, b: u64, is32: bool) {
        self.pending = Some(Pending {
            remaining: self.latency,
            value: arithmetic::multiply(op, a, b, is32),
        });
    }

    /// Advances the unit by one cycle.
    pub fn tick(&mut self) {
        if let Some(p) = self.pending.as_mut() {
            p.remaining = p.remaining.saturating_sub(1);
        }
    }

    /// Returns the product once the latency has elapsed.
    pub fn result(&self) -> Option<u64> {
        self.pending
            .filter(|p| p.remaining == 0)
            .map(|p| p.value)
    }

    /// Returns `true` while an operation is in progress or its result is unread.
    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the operation in progress (result consumed or squashed).
    pub fn flush(&mut self) {
        self.pending = None;
    }
}
