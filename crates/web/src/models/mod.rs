//! Domain models for the catalog.
//!
//! Row types double as domain types: every column decodes into a validated
//! `pantry-core` value, so a `Product` read from the store already satisfies
//! its invariants.

pub mod product;
pub mod session;
pub mod user;

pub use product::{Product, ProductInput};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
