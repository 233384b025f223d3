//! Pantry catalog web application library.
//!
//! This crate provides the catalog server as a library, allowing it to be
//! tested end to end and driven by the CLI.
//!
//! # Layers
//!
//! - [`routes`] - axum handlers, JSON page data and redirects
//! - [`middleware`] - session gate, session store, request ID, security headers
//! - [`services`] - authentication, validated catalog operations, seeding
//! - [`db`] - SQLite pool, migrations, and repositories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
