//! Common utilities and types shared by every stage of the core.
//!
//! 1. **Constants:** Instruction sizing and the trap-cause encoding.
//! 2. **Error Handling:** Trap representations, trap records and configuration errors.
//! 3. **Register File:** The architectural integer registers.

/// Core-wide constants.
pub mod constants;

/// Error types and trap definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use error::{ConfigError, Trap, TrapRecord};
pub use reg::RegisterFile;
