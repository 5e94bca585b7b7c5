//! # Domain Layer
//!
//! Pure domain logic: no I/O, no HTTP types.

pub mod action;
pub mod config;
pub mod errors;
pub mod snapshot;
