//! Load/Store Unit (LSU).
//!
//! Turns an execute-1 result into a data-port request. Execute-1 already
//! computed the effective address (primary result) and forwarded the store
//! data or AMO operand (secondary result); this unit attaches the width,
//! sign extension and the data-side translation context, and rejects
//! misaligned addresses.
//!
//! - [`unaligned`]: Alignment checks and the matching traps.

/// Alignment checks.
pub mod unaligned;

use crate::common::Trap;
use crate::core::pipeline::latches::Execute1Result;
use crate::soc::traits::{DataRequest, TranslationContext};

/// Builds the data request for a memory instruction.
///
/// # Arguments
///
/// * `ex1` - Execute-1 result of an `OpType::Mem` instruction.
/// * `ctx` - Data-side translation context (MPRV already applied).
///
/// # Returns
///
/// The request, or the misaligned-address trap to commit instead.
pub fn build_request(ex1: &Execute1Result, ctx: TranslationContext) -> Result<DataRequest, Trap> {
    let mem = ex1.decoded.mem;
    let address = ex1.primary;
    if !unaligned::is_aligned(address, mem.width.bytes()) {
        return Err(unaligned::misaligned_trap(mem.kind, address));
    }
    Ok(DataRequest {
        kind: mem.kind,
        address,
        width: mem.width,
        signed: mem.signed,
        value: ex1.secondary,
        amo: mem.amo,
        ctx,
    })
}
