//! Builders for instructions and pipeline records.
