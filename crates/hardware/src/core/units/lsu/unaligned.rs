//! Alignment checks for data accesses.
//!
//! The core does not split misaligned accesses: every load, store, LR/SC and
//! AMO must be naturally aligned or it traps before reaching the port.

use crate::common::error::Trap;
use crate::core::pipeline::signals::MemKind;

/// Checks whether a memory access at `addr` with `size` bytes is naturally aligned.
///
/// # Arguments
///
/// * `addr` - The byte address of the access.
/// * `size` - The access width in bytes (1, 2, 4, or 8).
pub fn is_aligned(addr: u64, size: u64) -> bool {
    size <= 1 || addr & (size - 1) == 0
}

/// Returns the misaligned-address trap for an access of `kind` at `addr`.
///
/// Loads and LR report a load fault; stores, SC and AMOs report a store/AMO fault.
pub fn misaligned_trap(kind: MemKind, addr: u64) -> Trap {
    if kind.is_write() {
        Trap::StoreAddressMisaligned(addr)
    } else {
        Trap::LoadAddressMisaligned(addr)
    }
}
