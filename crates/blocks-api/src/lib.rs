//! # Blocks API
//!
//! Cached block inventories and the block mark endpoint used by the block
//! viewer UI.
//!
//! ## Architecture
//!
//! ```text
//!   refresher (external)                 HTTP handlers
//!        │ set_global / set_loaded          │ blocks / plan / mark
//!        ▼                                  ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        BlocksService                          │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐               │
//! │  │   global   │  │   loaded   │  │  planned   │  GuardedView  │
//! │  │  RwLock    │  │  RwLock    │  │  RwLock    │  (one each)   │
//! │  └────────────┘  └────────────┘  └─────▲──────┘               │
//! │                                        │ Planner port         │
//! │  ┌──────────────────────────────┐      │                      │
//! │  │ MarkDispatcher               │──────┼──► BlockMarker port  │
//! │  │ validate → classify → mark   │      │                      │
//! │  └──────────────────────────────┘                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Last good blocks | A failed refresh never clears or alters cached blocks |
//! | Atomic replace | Readers see a whole snapshot, never a mix of two refreshes |
//! | Independent views | Refreshing one view never blocks readers of another |
//! | Validate first | No marker is written unless the request fully validates |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Snapshots, action classification, errors, config
//! - `ports/` - Inbound API trait and outbound marker/planner/clock traits
//! - `service/` - `BlocksService` and `MarkDispatcher`
//! - `adapters/` - In-memory marker and the example planner
//! - `http/` - axum router, handlers and response envelope
//!
//! ## Usage
//!
//! ```ignore
//! use blocks_api::{BlocksApiConfig, BlocksDependencies, BlocksService};
//!
//! let service = Arc::new(BlocksService::new(deps, BlocksApiConfig::default()));
//! service.set_global(Ok(metas));
//! let router = blocks_api::http::build_router(service, &config);
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod http;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use domain::action::{ActionKind, MarkRequest};
pub use domain::config::BlocksApiConfig;
pub use domain::errors::{ApiError, ErrorType, MarkError, RefreshError};
pub use domain::snapshot::{GuardedView, Snapshot};
pub use ports::inbound::BlocksApi;
pub use ports::outbound::{
    BlockMarker, MarkerError, PlanError, Planner, SystemTimeSource, TimeSource,
};
pub use service::{BlocksDependencies, BlocksService, MarkDispatcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
