//! Configuration module for Mark It Down
//!
//! User preferences, their JSON representation, and persistence to the
//! platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
