//! Demo Setup
//!
//! Sample hero classes and roster spawning for the demo match.

pub mod arena;
pub mod heroes;

pub use arena::*;
pub use heroes::*;
