//! Instruction Fetch (IF) Stage.
//!
//! This module implements the fetch unit. It is responsible for:
//! 1. **PC Sequencing:** Advancing by 2 or 4 bytes, or to the static prediction's target.
//! 2. **Redirects:** A redirect overrides sequential advance for exactly one request and
//!    marks every response still in flight as stale.
//! 3. **Skid Buffer:** One extra slot absorbs a response that arrives while the output
//!    register is still occupied.
//!
//! Only one live request is outstanding at a time; the translation context is
//! sampled when the request is sent and travels with it.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::core::pipeline::latches::{FetchedInstruction, Latch, Prediction, transfer};
use crate::core::pipeline::signals::FetchReason;
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::bru::StaticPredictor;
use crate::soc::traits::{FetchRequest, InstructionPort, TranslationContext};
use crate::stats::SimStats;

/// A request the port has accepted but not answered yet.
#[derive(Clone, Copy, Debug)]
struct Outstanding {
    pc: u64,
    reason: FetchReason,
    /// Overtaken by a redirect; the response is dropped on arrival.
    discard: bool,
}

/// Instruction fetch unit.
#[derive(Clone, Debug)]
pub struct FetchUnit {
    predictor: StaticPredictor,
    trace: bool,
    /// Address of the next request.
    npc: u64,
    /// Reason tag of the next request.
    reason: FetchReason,
    /// Set after a faulting response; cleared by the next redirect.
    halted: bool,
    outstanding: VecDeque<Outstanding>,
    skid: Latch<FetchedInstruction>,
    /// Fetched instruction offered to decode.
    pub output: Latch<FetchedInstruction>,
}

impl FetchUnit {
    /// Creates an idle fetch unit. Nothing is fetched until the first redirect.
    ///
    /// # Arguments
    ///
    /// * `predictor` - Static predictor applied to every fetched word.
    /// * `trace` - Emit per-instruction trace events.
    pub fn new(predictor: StaticPredictor, trace: bool) -> Self {
        Self {
            predictor,
            trace,
            npc: 0,
            reason: FetchReason::Mispredict,
            halted: true,
            outstanding: VecDeque::new(),
            skid: Latch::new(),
            output: Latch::new(),
        }
    }

    /// Bootstraps fetch at `pc`, tagged as a misprediction correction.
    ///
    /// Requests still held by the port are kept on the books as stale so their
    /// responses are dropped instead of being matched to the new request.
    pub fn reset(&mut self, pc: u64) {
        self.redirect(pc, FetchReason::Mispredict);
    }

    /// Restarts fetch at `target`.
    ///
    /// Clears the output register and skid buffer; responses to requests
    /// already sent are dropped when they arrive.
    pub fn redirect(&mut self, target: u64, reason: FetchReason) {
        debug!(target: "IF", "redirect -> {target:#x} ({})", reason.label());
        self.output.flush();
        self.skid.flush();
        for o in &mut self.outstanding {
            o.discard = true;
        }
        self.npc = target;
        self.reason = reason;
        self.halted = false;
    }

    /// Address the next request will be sent to.
    pub const fn next_pc(&self) -> u64 {
        self.npc
    }

    /// Returns `true` when the skid buffer holds an instruction.
    pub const fn skid_occupied(&self) -> bool {
        self.skid.is_full()
    }

    /// Advances the fetch unit by one cycle.
    ///
    /// # Arguments
    ///
    /// * `imem` - Instruction port.
    /// * `ctx` - Current fetch translation context; latched into a request sent this cycle.
    /// * `stats` - Counters for requests, skid captures and discards.
    pub fn tick(
        &mut self,
        imem: &mut dyn InstructionPort,
        ctx: TranslationContext,
        stats: &mut SimStats,
    ) {
        let _ = transfer(&mut self.skid, &mut self.output, |f| f);

        let response = if self.skid.is_empty() {
            imem.poll()
        } else {
            None
        };
        if let Some(resp) = response {
            match self.outstanding.pop_front() {
                Some(o) if o.discard || o.pc != resp.pc => {
                    if !o.discard {
                        debug!(
                            target: "IF",
                            "response for {:#x} does not match request {:#x}",
                            resp.pc,
                            o.pc
                        );
                    }
                    stats.fetch_discards += 1;
                }
                Some(o) => {
                    let prediction = if resp.exception.is_some() {
                        Prediction::default()
                    } else {
                        self.predictor.predict(o.pc, resp.word)
                    };
                    let fetched = FetchedInstruction {
                        pc: o.pc,
                        word: resp.word,
                        reason: o.reason,
                        exception: resp.exception,
                        prediction,
                    };
                    self.accept(fetched, stats);
                }
                None => debug!(target: "IF", "unsolicited response at {:#x}", resp.pc),
            }
        }

        let live = self.outstanding.iter().any(|o| !o.discard);
        if !self.halted && !live && self.skid.is_empty() && imem.request_ready() {
            imem.send(FetchRequest {
                pc: self.npc,
                reason: self.reason,
                ctx,
            });
            self.outstanding.push_back(Outstanding {
                pc: self.npc,
                reason: self.reason,
                discard: false,
            });
            stats.fetch_requests += 1;
        }
    }

    fn accept(&mut self, fetched: FetchedInstruction, stats: &mut SimStats) {
        if self.trace {
            trace!(
                target: "IF",
                "pc={:#x} word={:#010x} reason={} pred={}",
                fetched.pc,
                fetched.word,
                fetched.reason.label(),
                if fetched.prediction.taken { "T" } else { "N" }
            );
        }

        if fetched.exception.is_some() {
            self.halted = true;
        } else {
            self.npc = fetched.predicted_next_pc();
            self.reason = if fetched.prediction.taken {
                FetchReason::Predict
            } else {
                FetchReason::Prefetch
            };
        }

        if self.output.is_empty() {
            self.output.put(fetched);
        } else {
            self.skid.put(fetched);
            stats.skid_captures += 1;
        }
    }
}
