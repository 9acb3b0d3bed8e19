//! Core tests.




/// Functional units.
pub mod units;
