//! Core types for the user service.
//!
//! This module provides type-safe wrappers for the user resource.

pub mod id;
pub mod user;

pub use id::{UserId, UserIdError};
pub use user::{User, UserFields, UserFieldsError};
