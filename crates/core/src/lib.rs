//! Domain types and pure logic for the Tally backend.
//!
//! This crate has zero internal dependencies so it can be shared by the
//! persistence layer, the HTTP server, and any future tooling.

pub mod clock;
pub mod error;
pub mod habit;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validation;
