//! Memory port traits.
//!
//! This module defines the request/response interfaces between the core and its
//! memory side (caches, TLBs and the bus are all behind these). It provides:
//! 1. **Instruction Port:** Fetch requests tagged with a reason and a latched
//!    translation context; responses echo the address and may carry a fault.
//! 2. **Data Port:** Loads, stores, LR/SC and AMOs with size and sign extension
//!    done by the port; a separate flush-notification channel for fences.
//! 3. **Translation Context:** The privilege, SUM/MXR and `satp` inputs sampled
//!    when a request is accepted.
//!
//! Ports are ticked by the owner after the core each cycle, so a request sent in
//! cycle `n` can at the earliest be answered in cycle `n + 1`.

use crate::common::Trap;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::pipeline::signals::{AmoOp, FetchReason, MemKind, MemWidth};

/// Translation and permission inputs latched into every memory request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranslationContext {
    /// Effective privilege of the access.
    pub privilege: PrivilegeMode,
    /// `mstatus.SUM`: supervisor may access user pages.
    pub sum: bool,
    /// `mstatus.MXR`: executable pages are readable.
    pub mxr: bool,
    /// `satp` value; zero when translation does not apply (M-mode).
    pub atp: u64,
}

/// Instruction fetch request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// Address to fetch (2-byte aligned with compressed support, else 4).
    pub pc: u64,
    /// Why this fetch was issued.
    pub reason: FetchReason,
    /// Context sampled when the request was accepted.
    pub ctx: TranslationContext,
}

/// Instruction fetch response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    /// Echoed request address.
    pub pc: u64,
    /// 32 bits starting at `pc` (the upper half is ignored for compressed instructions).
    pub word: u32,
    /// Fetch fault (access or page fault), if any.
    pub exception: Option<Trap>,
}

/// Data memory request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataRequest {
    /// Access kind.
    pub kind: MemKind,
    /// Virtual address (naturally aligned).
    pub address: u64,
    /// Access width.
    pub width: MemWidth,
    /// Sign-extend the loaded value to 64 bits.
    pub signed: bool,
    /// Store data or AMO operand.
    pub value: u64,
    /// AMO function for `MemKind::Amo`.
    pub amo: AmoOp,
    /// Context sampled when the request was built.
    pub ctx: TranslationContext,
}

/// Data memory response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DataResponse {
    /// Load result (extended), SC status (0 = success) or AMO old value.
    pub value: u64,
    /// Access or page fault, if any.
    pub exception: Option<Trap>,
}

/// Instruction-side memory port.
pub trait InstructionPort {
    /// Returns `true` when `send` would be accepted this cycle.
    fn request_ready(&self) -> bool;

    /// Issues a fetch. Only called when `request_ready` returned `true`.
    fn send(&mut self, req: FetchRequest);

    /// Takes the oldest completed response, if any. Responses come back in
    /// request order.
    fn poll(&mut self) -> Option<FetchResponse>;

    /// Advances the port by one cycle.
    fn tick(&mut self);
}

/// Data-side memory port.
pub trait DataPort {
    /// Returns `true` when `send` would be accepted this cycle.
    fn request_ready(&self) -> bool;

    /// Issues an access. Only called when `request_ready` returned `true`.
    fn send(&mut self, req: DataRequest);

    /// Takes the oldest completed response, if any.
    fn poll(&mut self) -> Option<DataResponse>;

    /// Signals a flush (FENCE.I, SFENCE.VMA or a `satp` change) to the caches
    /// and TLBs behind this port.
    fn notify(&mut self);

    /// Returns `true` once the most recent `notify` has been acted on.
    fn notify_done(&self) -> bool;

    /// Advances the port by one cycle.
    fn tick(&mut self);
}
