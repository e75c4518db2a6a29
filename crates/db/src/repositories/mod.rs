//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod habit_repo;
pub mod item_repo;
pub mod project_repo;
pub mod task_repo;
pub mod user_repo;

pub use habit_repo::HabitRepo;
pub use item_repo::ItemRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
