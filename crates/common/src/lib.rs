//! Shared value types for the wavefield workspace.

mod types;

pub use types::GridCoord;
