//! # Shared Types Crate
//!
//! Block metadata and marker documents as they are stored in the bucket.
//!
//! ## Bucket Layout
//!
//! ```text
//! <bucket>/
//!   01EEB0ZRSQDJW51W11V4R6YP4T/
//!     meta.json              BlockMeta
//!     deletion-mark.json     DeletionMark (optional)
//!     no-compact-mark.json   NoCompactMark (optional)
//!     chunks/ index ...      (opaque to this workspace)
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every crate reads and writes these documents
//!   through the types defined here.
//! - **Wire Compatibility**: field names follow the on-bucket JSON exactly.

pub mod entities;
pub mod errors;
pub mod markers;

pub use entities::*;
pub use errors::*;
pub use markers::*;

/// Block identifier. A 128-bit lexicographically sortable ULID.
pub use ulid::Ulid as BlockId;
