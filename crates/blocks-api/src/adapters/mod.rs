//! # Adapters Module
//!
//! - `memory`: in-process marker store
//! - `planner`: stand-in compaction planner

pub mod memory;
pub mod planner;

pub use memory::InMemoryMarker;
pub use planner::ExamplePlanner;
