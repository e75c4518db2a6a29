pub mod habit;
pub mod item;
pub mod project;
pub mod task;
pub mod user;

use serde::{Deserialize, Serialize};

/// `?limit=&offset=` on paged listings. Both are clamped by
/// `tally_core::pagination`.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One page of rows plus the total number of rows visible to the caller.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub count: i64,
}
