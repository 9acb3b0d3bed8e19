//! ISA helper tests.

pub mod rvc;
