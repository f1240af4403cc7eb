//! Shipdesk Core - Shared types library.
//!
//! This crate provides common types used across all Shipdesk components:
//! - `dashboard` - order & tracking reconciliation service
//! - `cli` - command-line tools for sync, listings, and lookups
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - canonical orders, tracking timelines, statuses, and money

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
