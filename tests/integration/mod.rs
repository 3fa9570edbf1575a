//! Integration tests for agent-gateway
//!
//! These tests drive the router through the shipped connectors against
//! mock HTTP backends.

pub mod analytics_tests;
pub mod config_tests;
pub mod routing_tests;
