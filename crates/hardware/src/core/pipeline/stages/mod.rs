//! Pipeline stage implementations.
//!
//! This module contains the individual stages of the pipeline. It includes:
//! 1. **Fetch:** PC sequencing, static prediction and the skid buffer.
//! 2. **Decode:** The decoder collaborator and the handoff with register read.
//! 3. **Execute-1:** Issue gating, bypass, ALU and branch resolution.
//! 4. **Execute-2:** Functional-unit arbitration, trap assembly and commit.
//! 5. **Writeback:** Register commit and the redirect priority encoder.

/// Instruction decode and decode → execute-1 handoff.
pub mod decode;

/// First execute stage.
pub mod execute1;

/// Second execute stage.
pub mod execute2;

/// Instruction fetch unit.
pub mod fetch;

/// Writeback and redirect selection.
pub mod writeback;

pub use decode::{DecodeContext, Decoder, StandardDecoder, decode_stage};
pub use execute1::{Execute1, Execute1Event};
pub use execute2::{Execute2, InFlight};
pub use fetch::FetchUnit;
pub use writeback::{select_redirect, writeback};
