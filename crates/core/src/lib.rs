//! Corner Shop Core - Shared domain types.
//!
//! This crate provides the validated value types used by every Corner Shop
//! component:
//! - `storefront` - JSON API and server-rendered pages
//! - `cli` - Command-line tools for migrations, seeding and account management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. Parsing a value through one of these types is the validation
//! step; anything holding a `Price` or `Quantity` is already known to be
//! in range.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, usernames, emails, prices and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
