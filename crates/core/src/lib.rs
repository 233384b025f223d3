//! Pantry Core - Shared value types.
//!
//! This crate provides the types shared by every Pantry component:
//! - `web` - The catalog web application
//! - `cli` - Command-line tools for schema setup, seeding and user management
//!
//! # Architecture
//!
//! The core crate contains only types and their parsing rules - no I/O, no
//! database access, no HTTP. Each type can only be constructed through a
//! validating `parse`, so a value that exists is a value that is valid.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, usernames, prices and box sizes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
