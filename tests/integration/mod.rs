//! Integration tests for breakpoint
//!
//! These tests drive several components together the way a host would.

#[path = "../common/mod.rs"]
pub mod common;

pub mod locator_flow;
pub mod preset_flow;
pub mod proxy;
pub mod scan_flow;
pub mod viewport_flow;
