use rvpipe_core::Simulator;
use rvpipe_core::config::Config;
use rvpipe_core::core::Cpu;
use tracing_subscriber::EnvFilter;

use crate::common::mocks::data::MockDataMemory;
use crate::common::mocks::instruction::MockInstructionMemory;

/// Cycle budget used by the run helpers.
pub const MAX_CYCLES: u64 = 500;

pub struct TestContext {
    pub sim: Simulator<MockInstructionMemory, MockDataMemory>,
}

impl TestContext {
    /// Default configuration with the reset PC at `reset_pc` and the
    /// retirement log on.
    pub fn config(reset_pc: u64) -> Config {
        let mut config = Config::default();
        config.general.reset_pc = reset_pc;
        config.general.retire_log = true;
        config
    }

    pub fn new(reset_pc: u64) -> Self {
        Self::with_config(&Self::config(reset_pc))
    }

    pub fn with_config(config: &Config) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let sim = Simulator::new(config, MockInstructionMemory::new(1), MockDataMemory::new(1))
            .expect("test configuration is valid");
        Self { sim }
    }

    /// Loads 32-bit encodings back to back from `addr`.
    pub fn load_program(mut self, addr: u64, instructions: &[u32]) -> Self {
        self.sim.imem.load(addr, instructions);
        self
    }

    pub fn cpu(&self) -> &Cpu {
        &self.sim.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.sim.cpu
    }

    pub fn set_reg(&mut self, reg: usize, val: u64) {
        self.sim.cpu.regs_mut().write(reg, val);
    }

    pub fn get_reg(&self, reg: usize) -> u64 {
        self.sim.cpu.regs().read(reg)
    }

    /// Runs exactly `cycles` cycles.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.sim.step();
        }
    }

    /// Runs until `n` more instructions retire, panicking on timeout.
    pub fn run_until_retired(&mut self, n: u64) -> u64 {
        self.sim
            .run_until_retired(n, MAX_CYCLES)
            .expect("instructions retire within the cycle budget")
    }

    /// PCs of every committed instruction (traps included), in order.
    pub fn committed_pcs(&self) -> Vec<u64> {
        self.sim.cpu.retired().iter().map(|e| e.pc).collect()
    }
}
