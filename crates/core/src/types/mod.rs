//! Core types for Pantry.
//!
//! This module provides type-safe wrappers for the catalog's domain values.

pub mod id;
pub mod price;
pub mod units;
pub mod username;

pub use id::*;
pub use price::{Price, PriceError};
pub use units::{UnitsPerBox, UnitsPerBoxError};
pub use username::{Username, UsernameError};
