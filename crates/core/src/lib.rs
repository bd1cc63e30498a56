//! Papalote Core - Shared domain types.
//!
//! This crate provides the types used across all Papalote Market components:
//! - `storefront` - Marketplace web application and JSON API
//! - `cli` - Fixture validation, pricing and maintenance tooling
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no HTTP, no
//! fixture loading. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses
//! - [`models`] - Marketplace records mirrored from the JSON fixtures
//! - [`pricing`] - Fair-trade pricing calculator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod pricing;
pub mod types;

pub use types::*;
