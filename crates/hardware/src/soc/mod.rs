//! Memory-side interfaces of the core.
//!
//! Caches, TLBs and the interconnect live outside this crate; the core only
//! sees them through the port traits in [`traits`].

/// Instruction and data port traits and their request/response records.
pub mod traits;

pub use traits::{
    DataPort, DataRequest, DataResponse, FetchRequest, FetchResponse, InstructionPort,
    TranslationContext,
};
