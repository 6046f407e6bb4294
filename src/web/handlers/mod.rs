//! HTTP handlers for the preview proxy.

pub mod proxy;
