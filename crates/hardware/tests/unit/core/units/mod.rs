//! Functional-unit tests.

pub mod alu;
