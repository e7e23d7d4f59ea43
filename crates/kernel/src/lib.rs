//! Wave kernel: the authoritative height-field simulation.
//!
//! # Invariants
//! - Grid dimensions, spatial step and update coefficients never change after
//!   construction.
//! - Boundary vertices are never advanced by a step.
//! - Identical parameters and identical call sequences give bit-identical
//!   state; nothing here reads clocks or global state.
//! - Invalid input is rejected before any mutation.

mod error;
mod events;
mod field;
mod params;

pub use error::WaveError;
pub use events::WaveEvent;
pub use field::{MAX_STEPS_PER_UPDATE, WaveField};
pub use params::{Coefficients, MIN_GRID_EXTENT, WaveParams};
