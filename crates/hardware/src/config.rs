//! Configuration for the execution core.
//!
//! This module defines the configuration structures used to parameterize the core. It provides:
//! 1. **Defaults:** Reset vector and functional-unit latencies.
//! 2. **Structures:** `GeneralConfig` (tracing, reset, hart identity) and `PipelineConfig`
//!    (compressed support, static prediction, multiply/divide timing).
//! 3. **Loading:** JSON deserialization with per-field defaults and validation.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built with `Config::default()`.

use serde::Deserialize;

use crate::common::ConfigError;
use crate::common::constants::INSTRUCTION_SIZE_16;

/// Default configuration constants for the core.
mod defaults {
    /// Reset program counter (base of RAM on the reference platform).
    pub const RESET_PC: u64 = 0x8000_0000;

    /// Cycles from multiply issue to result.
    pub const MULTIPLY_LATENCY: u64 = 2;

    /// Cycles from divide issue to result (one per quotient bit plus setup).
    pub const DIVIDE_LATENCY: u64 = 34;
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Pipeline and functional-unit configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses and validates a configuration from a JSON document.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON text, e.g. `{"pipeline": {"compressed": false}}`.
    ///
    /// # Returns
    ///
    /// The validated configuration, or the parse/validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.multiply_latency == 0 {
            return Err(ConfigError::ZeroLatency { unit: "multiply" });
        }
        if self.pipeline.divide_latency == 0 {
            return Err(ConfigError::ZeroLatency { unit: "divide" });
        }
        if self.general.reset_pc & (self.pipeline.min_instruction_size() - 1) != 0 {
            return Err(ConfigError::MisalignedResetPc(self.general.reset_pc));
        }
        Ok(())
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Emit per-instruction `trace` events from every stage.
    #[serde(default)]
    pub trace_instructions: bool,

    /// Program counter fetched after reset.
    #[serde(default = "GeneralConfig::default_reset_pc")]
    pub reset_pc: u64,

    /// Value of `mhartid`.
    #[serde(default)]
    pub hart_id: u64,

    /// Record a `RetireEvent` for every committed instruction.
    #[serde(default)]
    pub retire_log: bool,
}

impl GeneralConfig {
    /// Returns the default reset program counter.
    fn default_reset_pc() -> u64 {
        defaults::RESET_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            reset_pc: defaults::RESET_PC,
            hart_id: 0,
            retire_log: false,
        }
    }
}

/// Pipeline and functional-unit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Enable the C extension (16-bit instructions, 2-byte alignment).
    #[serde(default = "PipelineConfig::default_true")]
    pub compressed: bool,

    /// Predict jumps and backward branches taken at fetch. When off, every
    /// control transfer is predicted not-taken.
    #[serde(default = "PipelineConfig::default_true")]
    pub static_prediction: bool,

    /// Multiply latency in cycles.
    #[serde(default = "PipelineConfig::default_multiply_latency")]
    pub multiply_latency: u64,

    /// Divide latency in cycles.
    #[serde(default = "PipelineConfig::default_divide_latency")]
    pub divide_latency: u64,
}

impl PipelineConfig {
    fn default_true() -> bool {
        true
    }

    /// Returns the default multiply latency.
    fn default_multiply_latency() -> u64 {
        defaults::MULTIPLY_LATENCY
    }

    /// Returns the default divide latency.
    fn default_divide_latency() -> u64 {
        defaults::DIVIDE_LATENCY
    }

    /// Minimum instruction size in bytes; also the jump-target alignment.
    pub fn min_instruction_size(&self) -> u64 {
        if self.compressed {
            INSTRUCTION_SIZE_16
        } else {
            INSTRUCTION_SIZE_16 * 2
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            compressed: true,
            static_prediction: true,
            multiply_latency: defaults::MULTIPLY_LATENCY,
            divide_latency: defaults::DIVIDE_LATENCY,
        }
    }
}
