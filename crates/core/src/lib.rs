//! User Service Core - Shared types library.
//!
//! This crate provides the types used across the user service components:
//! - `server` - HTTP resource handler and record store adapter
//! - `integration-tests` - End-to-end tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - The user identifier and the user record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
