//! Simulation statistics collection and reporting.
//!
//! This module tracks what the pipeline did each cycle. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics (CPI, MIPS).
//! 2. **Control flow:** Mispredictions, redirects per fetch reason, squashed instructions.
//! 3. **Traps:** Exceptions and interrupts taken.
//! 4. **Stalls:** Operand stalls in execute-1, busy cycles in execute-2, skid captures in fetch.

use std::time::Instant;

use tracing::info;

use crate::core::pipeline::signals::FetchReason;

/// Simulation statistics structure tracking pipeline metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed without a trap.
    pub instructions_retired: u64,
    /// Decode → execute-1 handoffs.
    pub decoded: u64,
    /// Commits that wrote a non-zero destination register.
    pub register_writes: u64,

    /// Exceptions taken (synchronous traps).
    pub exceptions: u64,
    /// Interrupts taken.
    pub interrupts: u64,
    /// Instructions whose resolved next PC differed from the prediction.
    pub mispredicts: u64,
    /// Fetch redirects, indexed by `FetchReason as usize`.
    pub redirects: [u64; FetchReason::ALL.len()],
    /// Wrong-path instructions dropped by issue gating.
    pub squashed: u64,

    /// Cycles execute-1 held an instruction it could not issue.
    pub stalls_operand: u64,
    /// Cycles execute-2 was waiting on a unit (memory, multiply, divide, flush, WFI).
    pub ex2_busy: u64,
    /// Fetch responses absorbed by the skid buffer.
    pub skid_captures: u64,
    /// Fetch requests sent.
    pub fetch_requests: u64,
    /// Fetch responses dropped because a redirect overtook them.
    pub fetch_discards: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            decoded: 0,
            register_writes: 0,
            exceptions: 0,
            interrupts: 0,
            mispredicts: 0,
            redirects: [0; FetchReason::ALL.len()],
            squashed: 0,
            stalls_operand: 0,
            ex2_busy: 0,
            skid_captures: 0,
            fetch_requests: 0,
            fetch_discards: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"control"`, `"stalls"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "control", "stalls"];

impl SimStats {
    /// Instructions retired per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Redirect count for one reason.
    pub const fn redirects_for(&self, reason: FetchReason) -> u64 {
        self.redirects[reason as usize]
    }

    /// Records a fetch redirect.
    pub const fn record_redirect(&mut self, reason: FetchReason) {
        self.redirects[reason as usize] += 1;
    }

    /// Logs the requested statistics sections at `info` level.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to log all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1);
        let instr = self.instructions_retired.max(1);

        if want("summary") {
            let cpi = cyc as f64 / instr as f64;
            let mips = if seconds > 0.0 {
                (self.instructions_retired as f64 / seconds) / 1_000_000.0
            } else {
                0.0
            };
            info!(target: "STATS", "host_seconds             {seconds:.4} s");
            info!(target: "STATS", "sim_cycles               {}", self.cycles);
            info!(target: "STATS", "sim_insts                {}", self.instructions_retired);
            info!(target: "STATS", "sim_decoded              {}", self.decoded);
            info!(target: "STATS", "sim_reg_writes           {}", self.register_writes);
            info!(target: "STATS", "sim_ipc                  {:.4}", self.ipc());
            info!(target: "STATS", "sim_cpi                  {cpi:.4}");
            info!(target: "STATS", "sim_mips                 {mips:.2}");
        }
        if want("control") {
            info!(target: "STATS", "ctl.mispredicts          {}", self.mispredicts);
            info!(target: "STATS", "ctl.squashed             {}", self.squashed);
            info!(target: "STATS", "ctl.exceptions           {}", self.exceptions);
            info!(target: "STATS", "ctl.interrupts           {}", self.interrupts);
            for reason in FetchReason::ALL {
                info!(
                    target: "STATS",
                    "redirect.{:<16} {}",
                    reason.label(),
                    self.redirects_for(reason)
                );
            }
        }
        if want("stalls") {
            let pct = |n: u64| (n as f64 / cyc as f64) * 100.0;
            info!(
                target: "STATS",
                "stalls.operand           {} ({:.2}%)",
                self.stalls_operand,
                pct(self.stalls_operand)
            );
            info!(
                target: "STATS",
                "ex2.busy                 {} ({:.2}%)",
                self.ex2_busy,
                pct(self.ex2_busy)
            );
            info!(target: "STATS", "fetch.requests           {}", self.fetch_requests);
            info!(target: "STATS", "fetch.skid_captures      {}", self.skid_captures);
            info!(target: "STATS", "fetch.discards           {}", self.fetch_discards);
        }
    }

    /// Logs all statistics sections.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
