//! # HTTP Layer
//!
//! axum router over [`BlocksApi`](crate::ports::inbound::BlocksApi).
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/api/v1/blocks?view=` | cached inventory |
//! | POST | `/api/v1/blocks/mark` | write a marker |
//! | GET | `/api/v1/blocks/plan` | compaction plan |
//! | GET | `/api/v1/status/flags` | process flags |
//! | GET | `/-/healthy` | liveness |

pub mod cors;
pub mod form;
pub mod response;
pub mod router;

pub use cors::create_cors_layer;
pub use form::MarkForm;
pub use response::{Envelope, Status};
pub use router::{build_router, AppState, BlocksQuery};
