//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (API used by handlers and the refresher)
//! - `outbound.rs` - Driven ports (marker writer, planner, clock)

pub mod inbound;
pub mod outbound;
