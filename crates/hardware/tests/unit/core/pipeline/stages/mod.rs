//! Stage tests.

pub mod decode;
pub mod execute1;
pub mod writeback;
