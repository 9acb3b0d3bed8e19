//! Simulator: owns the CPU and both memory ports side-by-side.
//!
//! The core never owns its memory; each cycle the simulator ticks the core with
//! borrowed ports and then ticks the ports, so a request sent in cycle `n` is
//! visible to the port's model at the end of that cycle.

use thiserror::Error;
use tracing::info;

use crate::common::ConfigError;
use crate::config::Config;
use crate::core::Cpu;
use crate::soc::traits::{DataPort, InstructionPort};

/// Errors returned by the run loops.
#[derive(Debug, Error)]
pub enum SimError {
    /// The stop condition was not reached within the cycle budget.
    #[error("simulation did not finish within {cycles} cycles")]
    Timeout {
        /// The exhausted budget.
        cycles: u64,
    },

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Top-level simulator: core plus instruction and data ports.
#[derive(Debug)]
pub struct Simulator<I, D> {
    /// The core.
    pub cpu: Cpu,
    /// Instruction-side port.
    pub imem: I,
    /// Data-side port.
    pub dmem: D,
}

impl<I: InstructionPort, D: DataPort> Simulator<I, D> {
    /// Creates a simulator after validating `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - The core configuration.
    /// * `imem` - Instruction port.
    /// * `dmem` - Data port.
    pub fn new(config: &Config, imem: I, dmem: D) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            cpu: Cpu::new(config),
            imem,
            dmem,
        })
    }

    /// Advances the core and both ports by one clock cycle.
    pub fn step(&mut self) {
        self.cpu.tick(&mut self.imem, &mut self.dmem);
        self.imem.tick();
        self.dmem.tick();
    }

    /// Runs until `stop` returns `true`.
    ///
    /// `stop` is checked after every cycle.
    ///
    /// # Arguments
    ///
    /// * `max_cycles` - Cycle budget.
    /// * `stop` - Stop condition over the core state.
    ///
    /// # Returns
    ///
    /// The number of cycles run, or `SimError::Timeout` when the budget ran out.
    pub fn run(&mut self, max_cycles: u64, mut stop: impl FnMut(&Cpu) -> bool) -> Result<u64, SimError> {
        for cycle in 1..=max_cycles {
            self.step();
            if stop(&self.cpu) {
                info!(target: "SIM", "stopped after {cycle} cycles");
                return Ok(cycle);
            }
        }
        self.cpu.dump_state();
        Err(SimError::Timeout { cycles: max_cycles })
    }

    /// Runs until `n` more instructions have retired without a trap.
    pub fn run_until_retired(&mut self, n: u64, max_cycles: u64) -> Result<u64, SimError> {
        let target = self.cpu.stats().instructions_retired + n;
        self.run(max_cycles, |cpu| cpu.stats().instructions_retired >= target)
    }
}
