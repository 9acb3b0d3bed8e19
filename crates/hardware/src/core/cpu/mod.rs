//! CPU Core Definition and Cycle Orchestration.
//!
//! This module defines the central `Cpu` structure, which owns the whole core and
//! advances it one clock at a time. It coordinates the following:
//! 1. **State Management:** Register file, CSR file and the squash state machine.
//! 2. **Pipeline Control:** The fetch unit, the decode → execute-1 register and the
//!    two execute stages, evaluated back to front each cycle.
//! 3. **Redirects:** One fetch redirect per cycle from the writeback priority encoder.
//! 4. **Observability:** Statistics and an optional retirement log.

use tracing::debug;

use crate::common::{RegisterFile, Trap};
use crate::config::Config;
use crate::core::arch::csr::{CsrFile, InterruptLines};
use crate::core::pipeline::control::PipelineControlState;
use crate::core::pipeline::latches::{DecodedInstruction, Execute2Outcome, Latch};
use crate::core::pipeline::signals::FetchReason;
use crate::core::pipeline::stages::{
    Decoder, Execute1, Execute1Event, Execute2, FetchUnit, InFlight, StandardDecoder,
    decode_stage, select_redirect, writeback,
};
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::bru::StaticPredictor;
use crate::core::units::div::DivideUnit;
use crate::core::units::mul::MultiplyUnit;
use crate::soc::traits::{DataPort, InstructionPort};
use crate::stats::SimStats;

/// One committed instruction, as recorded in the retirement log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetireEvent {
    /// Cycle of the commit.
    pub cycle: u64,
    /// Program counter of the instruction.
    pub pc: u64,
    /// Destination register (0 when nothing was written).
    pub rd: usize,
    /// Value written to `rd`.
    pub value: u64,
    /// The trap taken instead of executing, if any.
    pub trap: Option<Trap>,
}

/// Main CPU structure containing all core state.
#[derive(Debug)]
pub struct Cpu {
    regs: RegisterFile,
    csrs: CsrFile,
    state: PipelineControlState,

    fetch: FetchUnit,
    decoder: Box<dyn Decoder>,
    de_ex: Latch<DecodedInstruction>,
    ex1: Execute1,
    ex2: Execute2,

    reset_pc: u64,
    hart_id: u64,
    compressed: bool,
    trace: bool,
    retire_log: Option<Vec<RetireEvent>>,
    stats: SimStats,
}

impl Cpu {
    /// Creates a core with the reference decoder and bootstraps fetch at the reset PC.
    ///
    /// # Arguments
    ///
    /// * `config` - The core configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_decoder(config, Box::new(StandardDecoder))
    }

    /// Creates a core with a custom decoder.
    pub fn with_decoder(config: &Config, decoder: Box<dyn Decoder>) -> Self {
        let p = &config.pipeline;
        let trace = config.general.trace_instructions || cfg!(feature = "always-trace");
        let predictor = StaticPredictor::new(p.compressed, p.static_prediction);

        let mut cpu = Self {
            regs: RegisterFile::new(),
            csrs: CsrFile::new(config.general.hart_id, p.compressed),
            state: PipelineControlState::default(),
            fetch: FetchUnit::new(predictor, trace),
            decoder,
            de_ex: Latch::new(),
            ex1: Execute1::new(p.min_instruction_size(), trace),
            ex2: Execute2::new(
                MultiplyUnit::new(p.multiply_latency),
                DivideUnit::new(p.divide_latency),
                trace,
            ),
            reset_pc: config.general.reset_pc,
            hart_id: config.general.hart_id,
            compressed: p.compressed,
            trace,
            retire_log: config.general.retire_log.then(Vec::new),
            stats: SimStats::default(),
        };
        cpu.reset();
        cpu
    }

    /// Resets the core.
    ///
    /// Empties every pipeline register, restores the reset CSR state, enters
    /// `MispredictDrain` and redirects fetch to the reset PC tagged `Mispredict`.
    /// Register contents are left as they are.
    pub fn reset(&mut self) {
        self.csrs = CsrFile::new(self.hart_id, self.compressed);
        self.state = PipelineControlState::default();
        self.de_ex.flush();
        self.ex1.reset();
        self.ex2.reset();
        self.fetch.reset(self.reset_pc);
        self.stats.record_redirect(FetchReason::Mispredict);
        debug!(target: "CTL", "reset -> {:#x}", self.reset_pc);
    }

    /// Advances the core by one clock cycle.
    ///
    /// Stages are evaluated back to front so every stage sees the state its
    /// consumer left at the end of the previous cycle. The ports are not
    /// ticked here; the owner ticks them after the core.
    pub fn tick(&mut self, imem: &mut dyn InstructionPort, dmem: &mut dyn DataPort) {
        self.stats.cycles += 1;
        self.csrs.tick();

        let outcome = self
            .ex2
            .tick(&mut self.ex1.output, &mut self.csrs, dmem, &mut self.stats);
        if let Some(o) = &outcome {
            self.commit(o);
        }

        self.state = self.state.after_execute2(outcome.as_ref());
        if outcome.is_some_and(|o| o.trap.is_some() || o.redirect.is_some()) {
            self.ex1.output.flush();
            self.de_ex.flush();
        }

        let mispredict = match self.ex1.tick(&mut self.de_ex, self.state, self.ex2.bypass()) {
            Execute1Event::Idle => None,
            Execute1Event::Dropped => {
                self.stats.squashed += 1;
                None
            }
            Execute1Event::Stalled => {
                self.stats.stalls_operand += 1;
                None
            }
            Execute1Event::Issued { mispredict } => {
                self.state = self.state.after_issue(mispredict.is_some());
                if mispredict.is_some() {
                    self.stats.mispredicts += 1;
                }
                mispredict
            }
        };

        if let Some(r) = select_redirect(outcome.as_ref(), mispredict) {
            self.stats.record_redirect(r.reason);
            self.fetch.redirect(r.target, r.reason);
        }

        let ctx = self.csrs.decode_context();
        if decode_stage(
            &mut self.fetch.output,
            &mut self.de_ex,
            self.decoder.as_ref(),
            &ctx,
            &self.regs,
            self.trace,
        ) {
            self.stats.decoded += 1;
        }

        self.fetch
            .tick(imem, self.csrs.fetch_context(), &mut self.stats);
    }

    fn commit(&mut self, o: &Execute2Outcome) {
        if writeback(o, &mut self.regs, &mut self.de_ex, self.trace) {
            self.stats.register_writes += 1;
        }
        if o.trap.is_none() {
            self.stats.instructions_retired += 1;
        }
        if let Some(log) = self.retire_log.as_mut() {
            log.push(RetireEvent {
                cycle: self.stats.cycles,
                pc: o.pc,
                rd: if o.write { o.rd } else { 0 },
                value: if o.write { o.value } else { 0 },
                trap: o.trap.map(|t| t.trap),
            });
        }
    }

    /// Drives the external interrupt request lines.
    pub fn set_interrupt_lines(&mut self, lines: InterruptLines) {
        self.csrs.set_interrupt_lines(lines);
    }

    /// Architectural register file.
    pub const fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// Mutable register file, for loading initial state.
    pub const fn regs_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    /// CSR file.
    pub const fn csrs(&self) -> &CsrFile {
        &self.csrs
    }

    /// Mutable CSR file, for loading initial state.
    pub const fn csrs_mut(&mut self) -> &mut CsrFile {
        &mut self.csrs
    }

    /// Current squash state.
    pub const fn control_state(&self) -> PipelineControlState {
        self.state
    }

    /// Fetch unit.
    pub const fn fetch(&self) -> &FetchUnit {
        &self.fetch
    }

    /// Operation held by execute-2.
    pub fn in_flight(&self) -> Option<InFlight> {
        self.ex2.in_flight()
    }

    /// Statistics collected so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Retirement log (empty unless `retire_log` is enabled).
    pub fn retired(&self) -> &[RetireEvent] {
        self.retire_log.as_deref().unwrap_or(&[])
    }

    /// Drains the retirement log.
    pub fn take_retired(&mut self) -> Vec<RetireEvent> {
        self.retire_log.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Logs the non-zero registers at `debug` level.
    pub fn dump_state(&self) {
        debug!(
            target: "CTL",
            "state={:?} priv={} fetch_npc={:#x}",
            self.state,
            self.csrs.privilege(),
            self.fetch.next_pc()
        );
        self.regs.dump();
    }
}
