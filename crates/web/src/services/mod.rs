//! Business logic services for the catalog.
//!
//! # Services
//!
//! - `auth` - Username/password registration, verification, and login
//! - `catalog` - Product validation and store operations for signed-in users
//! - `seed` - Default accounts and sample products for a fresh database

pub mod auth;
pub mod catalog;
pub mod seed;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService};
pub use seed::{SeedError, SeedReport, seed_if_empty};
