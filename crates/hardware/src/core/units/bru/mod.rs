//! Branch prediction unit (BRU).
//!
//! Only static, immediate-encoded prediction is implemented; see [`static_bp`].

/// Static branch predictor (jumps taken, backward branches taken).
pub mod static_bp;

pub use static_bp::StaticPredictor;
