//! Wires configuration, rule loading, solving and output together.

pub mod execution;
