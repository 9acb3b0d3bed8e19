//! Instruction pipeline implementation.
//!
//! This module contains the in-order fetch / decode / execute-1 / execute-2 /
//! writeback pipeline. It includes the following components:
//! 1. **Control:** The redirect/squash state machine gating execute-1 issue.
//! 2. **Hazards:** Operand bypass as an ordered search over in-flight producers.
//! 3. **Latches:** Single-slot inter-stage registers and the records they carry.
//! 4. **Signals:** Control signals generated during instruction decoding.
//! 5. **Stages:** Fetch, Decode, Execute-1, Execute-2 and Writeback.
//! 6. **Traits:** Common interfaces for pipeline latches.

/// Redirect/squash state machine.
pub mod control;

/// Operand bypass resolution.
pub mod hazards;

/// Inter-stage pipeline registers.
pub mod latches;

/// Control signals generated during instruction decode.
pub mod signals;

/// Pipeline stage implementations.
pub mod stages;

/// Traits for pipeline latches.
pub mod traits;
