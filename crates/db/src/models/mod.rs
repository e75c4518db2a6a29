//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Habits are the exception: their domain type lives in `tally_core` and
//! [`habit::HabitRow`] only converts to it.

pub mod habit;
pub mod item;
pub mod project;
pub mod task;
pub mod user;
