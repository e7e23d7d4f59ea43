//! Ripple cadence: the host-side policy that keeps the water moving.
//!
//! # Invariants
//! - The wave kernel stays deterministic; all randomness lives here and is
//!   driven by an explicit seed.
//! - At most one ripple is injected per tick.
//! - Ripples always land on interior vertices.

mod scheduler;

pub use scheduler::{Ripple, RippleConfig, RippleError, RippleScheduler};
