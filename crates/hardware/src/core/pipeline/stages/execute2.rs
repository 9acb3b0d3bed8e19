//! Execute-2 (EX2) Stage.
//!
//! This module implements functional-unit arbitration and commit. It performs the following:
//! 1. **Acceptance:** Takes one instruction from execute-1 when idle. A pass-through
//!    exception or a pending interrupt turns it into a trap at this point.
//! 2. **Dispatch:** Routes the instruction to exactly one unit and remembers which
//!    one in a tagged [`InFlight`] value.
//! 3. **Completion:** Checks that unit every cycle; nothing new is accepted until
//!    the held instruction commits.
//! 4. **Commit:** Produces the cycle's [`Execute2Outcome`], applies CSR effects and
//!    assembles traps through the CSR file.

use tracing::{debug, trace};

use crate::common::{Trap, TrapRecord};
use crate::core::arch::csr::{CsrFile, MSTATUS, SATP, SSTATUS, TrapReturn};
use crate::core::pipeline::hazards::BypassSource;
use crate::core::pipeline::latches::{Execute1Result, Execute2Outcome, Latch, Redirect};
use crate::core::pipeline::signals::{FetchReason, OpType, SysOp};
use crate::core::units::div::DivideUnit;
use crate::core::units::lsu;
use crate::core::units::mul::MultiplyUnit;
use crate::soc::traits::{DataPort, DataRequest};
use crate::stats::SimStats;

/// The operation execute-2 is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InFlight {
    /// Single-cycle result computed by execute-1 (ALU, link address, branch).
    Alu {
        /// Register value.
        value: u64,
    },
    /// Data-port access.
    Memory {
        /// The request.
        request: DataRequest,
        /// The port has accepted the request.
        sent: bool,
    },
    /// Multiply unit.
    Multiply,
    /// Divide unit.
    Divide,
    /// CSR access that does not change translation.
    Csr {
        /// Value read at acceptance (written to `rd`).
        old: u64,
        /// Value to write at commit.
        write: Option<u64>,
    },
    /// Waiting on the data port's flush notification before redirecting.
    Flush {
        /// Reason the refetch is tagged with.
        reason: FetchReason,
        /// Register value (old CSR value for `satp` writes).
        value: u64,
        /// `satp` value applied once the flush completes.
        csr_write: Option<u64>,
    },
    /// `MRET` / `SRET`.
    Eret(TrapReturn),
    /// `WFI`, waiting for an interrupt to become pending.
    Wfi,
    /// Commits as a trap next cycle.
    Fault(Trap),
}

#[derive(Clone, Copy, Debug)]
struct Held {
    ex1: Execute1Result,
    op: InFlight,
}

/// Completion of the held instruction, before CSR side effects.
enum Completion {
    Value(u64, Option<Redirect>),
    Trap(Trap),
}

/// Execute-2 stage state.
#[derive(Clone, Debug)]
pub struct Execute2 {
    held: Option<Held>,
    mul: MultiplyUnit,
    div: DivideUnit,
    trace: bool,
}

impl Execute2 {
    /// Creates an idle stage.
    ///
    /// # Arguments
    ///
    /// * `mul` - Multiply unit.
    /// * `div` - Divide unit.
    /// * `trace` - Emit per-instruction trace events.
    pub const fn new(mul: MultiplyUnit, div: DivideUnit, trace: bool) -> Self {
        Self {
            held: None,
            mul,
            div,
            trace,
        }
    }

    /// Drops the held instruction and any unit operation in progress.
    pub fn reset(&mut self) {
        self.held = None;
        self.mul.flush();
        self.div.flush();
    }

    /// Returns `true` while an instruction is held.
    pub const fn busy(&self) -> bool {
        self.held.is_some()
    }

    /// The held operation, if any.
    pub fn in_flight(&self) -> Option<InFlight> {
        self.held.map(|h| h.op)
    }

    /// Bypass view of the held instruction.
    ///
    /// ALU and CSR values are available; every other unit is still computing.
    pub fn bypass(&self) -> Option<BypassSource> {
        let h = self.held.as_ref()?;
        let rd = h.ex1.decoded.rd;
        match h.op {
            InFlight::Fault(_) => None,
            _ if rd == 0 => None,
            InFlight::Alu { value } | InFlight::Csr { old: value, .. } => {
                Some(BypassSource::ready(rd, value))
            }
            _ => Some(BypassSource::pending(rd)),
        }
    }

    /// Advances execute-2 by one cycle.
    ///
    /// # Arguments
    ///
    /// * `input` - Execute-1 → execute-2 register.
    /// * `csr` - CSR file (read at acceptance, written at commit).
    /// * `dmem` - Data port.
    /// * `stats` - Counters for traps, interrupts and busy cycles.
    ///
    /// # Returns
    ///
    /// The instruction committed this cycle, if any.
    pub fn tick(
        &mut self,
        input: &mut Latch<Execute1Result>,
        csr: &mut CsrFile,
        dmem: &mut dyn DataPort,
        stats: &mut SimStats,
    ) -> Option<Execute2Outcome> {
        self.mul.tick();
        self.div.tick();

        let outcome = match self.held {
            Some(held) => {
                let done = self.progress(held, csr, dmem);
                if done.is_none() {
                    stats.ex2_busy += 1;
                }
                done.map(|c| {
                    self.held = None;
                    Self::commit(held.ex1, c, csr, stats)
                })
            }
            None => None,
        };

        let squashing = outcome.is_some_and(|o| o.trap.is_some() || o.redirect.is_some());
        if self.held.is_none() && !squashing {
            if let Some(ex1) = input.take() {
                let op = self.accept(&ex1, csr, dmem);
                if self.trace {
                    trace!(target: "EX2", "accept pc={:#x} {op:?}", ex1.decoded.pc);
                }
                self.held = Some(Held { ex1, op });
            }
        }

        outcome
    }

    /// Chooses the unit for a newly accepted instruction and starts it.
    fn accept(
        &mut self,
        ex1: &Execute1Result,
        csr: &CsrFile,
        dmem: &mut dyn DataPort,
    ) -> InFlight {
        if let Some(trap) = ex1.exception {
            return InFlight::Fault(trap);
        }
        if let Some(irq) = csr.pending_interrupt() {
            return InFlight::Fault(irq);
        }

        let d = &ex1.decoded;
        match d.op_type {
            OpType::Alu | OpType::Jump | OpType::Branch => InFlight::Alu { value: ex1.primary },
            OpType::Mem => match lsu::build_request(ex1, csr.data_context()) {
                Ok(request) => {
                    let sent = dmem.request_ready();
                    if sent {
                        dmem.send(request);
                    }
                    InFlight::Memory { request, sent }
                }
                Err(trap) => InFlight::Fault(trap),
            },
            OpType::Mul => {
                self.mul.start(d.mul_op, ex1.primary, ex1.secondary, d.is32);
                InFlight::Multiply
            }
            OpType::Div => {
                self.div.start(d.div_op, ex1.primary, ex1.secondary, d.is32);
                InFlight::Divide
            }
            OpType::Csr => {
                let old = csr.read(d.csr_addr);
                let write = d
                    .csr_op
                    .writes(d.rs1)
                    .then(|| d.csr_op.apply(old, ex1.primary));
                if d.csr_addr == SATP && write.is_some() {
                    dmem.notify();
                    InFlight::Flush {
                        reason: FetchReason::SatpChanged,
                        value: old,
                        csr_write: write,
                    }
                } else {
                    InFlight::Csr { old, write }
                }
            }
            OpType::System => match d.sys_op {
                SysOp::FenceI | SysOp::SfenceVma => {
                    dmem.notify();
                    InFlight::Flush {
                        reason: if d.sys_op == SysOp::FenceI {
                            FetchReason::FenceI
                        } else {
                            FetchReason::SatpChanged
                        },
                        value: 0,
                        csr_write: None,
                    }
                }
                SysOp::Mret => InFlight::Eret(TrapReturn::Machine),
                SysOp::Sret => InFlight::Eret(TrapReturn::Supervisor),
                SysOp::Wfi => InFlight::Wfi,
                SysOp::None => InFlight::Alu { value: 0 },
            },
        }
    }

    /// Checks the held instruction's unit for completion.
    fn progress(
        &mut self,
        held: Held,
        csr: &mut CsrFile,
        dmem: &mut dyn DataPort,
    ) -> Option<Completion> {
        let ex1 = &held.ex1;
        let next = ex1.decoded.pc.wrapping_add(ex1.decoded.size);
        match held.op {
            InFlight::Alu { value } => Some(Completion::Value(value, None)),
            InFlight::Memory { request, sent: false } => {
                if dmem.request_ready() {
                    dmem.send(request);
                    self.held = Some(Held {
                        op: InFlight::Memory { request, sent: true },
                        ..held
                    });
                }
                None
            }
            InFlight::Memory { sent: true, .. } => dmem.poll().map(|resp| match resp.exception {
                Some(trap) => Completion::Trap(trap),
                None => Completion::Value(resp.value, None),
            }),
            InFlight::Multiply => self.mul.result().map(|v| {
                self.mul.flush();
                Completion::Value(v, None)
            }),
            InFlight::Divide => self.div.result().map(|v| {
                self.div.flush();
                Completion::Value(v, None)
            }),
            InFlight::Csr { old, write } => {
                let addr = ex1.decoded.csr_addr;
                let mut redirect = None;
                if let Some(val) = write {
                    csr.write(addr, val);
                    if addr == MSTATUS || addr == SSTATUS {
                        redirect = Some(Redirect {
                            target: next,
                            reason: FetchReason::ProtChanged,
                        });
                    }
                }
                Some(Completion::Value(old, redirect))
            }
            InFlight::Flush {
                reason,
                value,
                csr_write,
            } => dmem.notify_done().then(|| {
                if let Some(val) = csr_write {
                    csr.write(ex1.decoded.csr_addr, val);
                }
                Completion::Value(
                    value,
                    Some(Redirect {
                        target: next,
                        reason,
                    }),
                )
            }),
            InFlight::Eret(kind) => {
                let target = csr.eret(kind);
                Some(Completion::Value(
                    0,
                    Some(Redirect {
                        target,
                        reason: FetchReason::ProtChanged,
                    }),
                ))
            }
            InFlight::Wfi => csr.wfi_wakeup().then_some(Completion::Value(0, None)),
            InFlight::Fault(trap) => Some(Completion::Trap(trap)),
        }
    }

    /// Builds the outcome for a completed instruction and applies its
    /// trap or retirement to the CSR file.
    fn commit(
        ex1: Execute1Result,
        completion: Completion,
        csr: &mut CsrFile,
        stats: &mut SimStats,
    ) -> Execute2Outcome {
        let d = ex1.decoded;
        match completion {
            Completion::Trap(trap) => {
                let vector = csr.take_trap(trap, d.pc);
                if trap.is_interrupt() {
                    stats.interrupts += 1;
                } else {
                    stats.exceptions += 1;
                }
                Execute2Outcome {
                    pc: d.pc,
                    rd: d.rd,
                    value: 0,
                    write: false,
                    trap: Some(TrapRecord {
                        trap,
                        epc: d.pc,
                        vector,
                    }),
                    redirect: None,
                }
            }
            Completion::Value(value, redirect) => {
                csr.retire();
                if let Some(r) = redirect {
                    debug!(
                        target: "EX2",
                        "pc={:#x} redirect -> {:#x} ({})",
                        d.pc,
                        r.target,
                        r.reason.label()
                    );
                }
                Execute2Outcome {
                    pc: d.pc,
                    rd: d.rd,
                    value,
                    write: d.rd != 0,
                    trap: None,
                    redirect,
                }
            }
        }
    }
}
