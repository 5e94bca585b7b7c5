//! # Adapters
//!
//! Port implementations connecting the blocks API to the outside world.

pub mod fs_bucket;

pub use fs_bucket::{BucketError, FsBucket};
