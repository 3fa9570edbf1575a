//! Router tests module
//!
//! Contains tests for selection, routing, failover and the explicit-agent path.

mod common;
