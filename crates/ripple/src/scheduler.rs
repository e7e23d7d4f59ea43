use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use wavefield_common::GridCoord;
use wavefield_kernel::{WaveError, WaveEvent, WaveField};

/// Ripple cadence configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Simulated seconds between ripples.
    pub interval_s: f32,
    /// Preferred distance (in vertices) between a ripple and the grid edge.
    /// Shrunk automatically on grids too small to honour it.
    pub margin: usize,
    /// Smallest ripple magnitude.
    pub magnitude_min: f32,
    /// Largest ripple magnitude.
    pub magnitude_max: f32,
    /// RNG seed; the same seed gives the same ripple sequence.
    pub seed: u64,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            interval_s: 0.25,
            margin: 4,
            magnitude_min: 0.2,
            magnitude_max: 0.5,
            seed: 42,
        }
    }
}

impl RippleConfig {
    pub fn validate(&self) -> Result<(), RippleError> {
        if !(self.interval_s.is_finite() && self.interval_s > 0.0) {
            return Err(RippleError::InvalidInterval(self.interval_s));
        }
        if !(self.magnitude_min.is_finite()
            && self.magnitude_max.is_finite()
            && self.magnitude_min <= self.magnitude_max)
        {
            return Err(RippleError::InvalidMagnitude {
                min: self.magnitude_min,
                max: self.magnitude_max,
            });
        }
        Ok(())
    }
}

/// Errors from ripple configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RippleError {
    #[error("ripple interval must be finite and > 0, got {0}")]
    InvalidInterval(f32),
    #[error("ripple magnitude range {min}..={max} is empty or not finite")]
    InvalidMagnitude { min: f32, max: f32 },
}

/// A disturbance chosen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub at: GridCoord,
    pub magnitude: f32,
}

impl From<Ripple> for WaveEvent {
    fn from(ripple: Ripple) -> Self {
        WaveEvent::Disturbed {
            at: ripple.at,
            magnitude: ripple.magnitude,
        }
    }
}

/// Injects one random ripple every `interval_s` of simulated time.
///
/// Call [`tick`](Self::tick) once per frame before advancing the field. If a
/// frame spans several intervals the backlog is worked off one ripple per
/// frame.
#[derive(Debug)]
pub struct RippleScheduler {
    config: RippleConfig,
    rng: StdRng,
    elapsed: f64,
    base: f64,
    fired: u64,
}

impl RippleScheduler {
    pub fn new(config: RippleConfig) -> Result<Self, RippleError> {
        config.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            elapsed: 0.0,
            base: 0.0,
            fired: 0,
        })
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    /// Number of ripples injected so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Simulated seconds seen by the scheduler.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advance the scheduler clock and, if an interval has passed, disturb
    /// `field` at a random interior vertex. Returns the ripple injected.
    /// Non-positive or non-finite deltas leave the clock where it is.
    pub fn tick(
        &mut self,
        field: &mut WaveField,
        delta_time: f32,
    ) -> Result<Option<Ripple>, WaveError> {
        if delta_time.is_finite() && delta_time > 0.0 {
            self.elapsed += f64::from(delta_time);
        }
        let interval = f64::from(self.config.interval_s);
        if self.elapsed - self.base < interval {
            return Ok(None);
        }
        self.base += interval;

        let ripple = self.sample(field.row_count(), field.column_count());
        field.disturb(ripple.at.row, ripple.at.col, ripple.magnitude)?;
        self.fired += 1;
        tracing::debug!(
            row = ripple.at.row,
            col = ripple.at.col,
            magnitude = ripple.magnitude,
            "ripple injected"
        );
        Ok(Some(ripple))
    }

    fn sample(&mut self, rows: usize, columns: usize) -> Ripple {
        let (row_lo, row_hi) = interior_span(rows, self.config.margin);
        let (col_lo, col_hi) = interior_span(columns, self.config.margin);
        let row = self.rng.gen_range(row_lo..=row_hi);
        let col = self.rng.gen_range(col_lo..=col_hi);
        let magnitude = self
            .rng
            .gen_range(self.config.magnitude_min..=self.config.magnitude_max);
        Ripple {
            at: GridCoord::new(row, col),
            magnitude,
        }
    }
}

/// Inclusive index span `margin ..= extent - 1 - margin`, falling back to the
/// full interior `1 ..= extent - 2` when the margin does not fit.
fn interior_span(extent: usize, margin: usize) -> (usize, usize) {
    let lo = margin.max(1);
    let hi = extent.saturating_sub(margin.saturating_add(1)).min(extent - 2);
    if lo <= hi { (lo, hi) } else { (1, extent - 2) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavefield_kernel::WaveParams;

    fn field(extent: usize) -> WaveField {
        WaveField::new(WaveParams::new(
            extent,
            extent,
            (extent - 1) as f32,
            0.03,
            4.0,
            0.2,
        ))
        .unwrap()
    }

    #[test]
    fn ripple_config_defaults() {
        let config = RippleConfig::default();
        assert_eq!(config.interval_s, 0.25);
        assert_eq!(config.margin, 4);
        assert_eq!(config.magnitude_min, 0.2);
        assert_eq!(config.magnitude_max, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = RippleConfig {
            interval_s: 0.0,
            ..RippleConfig::default()
        };
        assert_eq!(
            RippleScheduler::new(config).unwrap_err(),
            RippleError::InvalidInterval(0.0)
        );

        let config = RippleConfig {
            magnitude_min: 0.6,
            magnitude_max: 0.5,
            ..RippleConfig::default()
        };
        assert!(matches!(
            RippleScheduler::new(config),
            Err(RippleError::InvalidMagnitude { .. })
        ));
    }

    #[test]
    fn fires_once_per_interval() {
        let mut f = field(32);
        let mut sched = RippleScheduler::new(RippleConfig::default()).unwrap();

        assert!(sched.tick(&mut f, 0.125).unwrap().is_none());
        assert!(sched.tick(&mut f, 0.125).unwrap().is_some());
        assert!(sched.tick(&mut f, 0.125).unwrap().is_none());
        assert!(sched.tick(&mut f, 0.125).unwrap().is_some());
        assert_eq!(sched.fired(), 2);
        assert_eq!(sched.elapsed(), 0.5);
    }

    #[test]
    fn long_frame_fires_one_ripple_per_tick() {
        let mut f = field(32);
        let mut sched = RippleScheduler::new(RippleConfig::default()).unwrap();

        assert!(sched.tick(&mut f, 1.0).unwrap().is_some());
        assert_eq!(sched.fired(), 1);
        // Backlog drains on subsequent ticks even with no new time.
        assert!(sched.tick(&mut f, 0.0).unwrap().is_some());
        assert!(sched.tick(&mut f, 0.0).unwrap().is_some());
        assert!(sched.tick(&mut f, 0.0).unwrap().is_some());
        assert!(sched.tick(&mut f, 0.0).unwrap().is_none());
    }

    #[test]
    fn ripples_stay_inside_margin_and_range() {
        let mut f = field(32);
        let mut sched = RippleScheduler::new(RippleConfig::default()).unwrap();
        for _ in 0..200 {
            if let Some(r) = sched.tick(&mut f, 0.25).unwrap() {
                assert!((4..=27).contains(&r.at.row), "row {}", r.at.row);
                assert!((4..=27).contains(&r.at.col), "col {}", r.at.col);
                assert!((0.2..=0.5).contains(&r.magnitude));
            }
            f.update(0.25);
        }
        assert_eq!(sched.fired(), 200);
    }

    #[test]
    fn small_grid_falls_back_to_interior() {
        let mut f = field(6);
        let mut sched = RippleScheduler::new(RippleConfig::default()).unwrap();
        for _ in 0..50 {
            let r = sched.tick(&mut f, 0.25).unwrap().unwrap();
            assert!((1..=4).contains(&r.at.row));
            assert!((1..=4).contains(&r.at.col));
        }
    }

    #[test]
    fn interior_span_clamps() {
        assert_eq!(interior_span(128, 4), (4, 123));
        assert_eq!(interior_span(10, 4), (4, 5));
        assert_eq!(interior_span(8, 4), (1, 6));
        assert_eq!(interior_span(4, 0), (1, 2));
        assert_eq!(interior_span(16, usize::MAX), (1, 14));
    }

    #[test]
    fn oversized_margin_from_config_falls_back_to_interior() {
        let config: RippleConfig =
            serde_json::from_str(r#"{ "margin": 18446744073709551615 }"#).unwrap();
        assert_eq!(config.margin, usize::MAX);

        let mut f = field(16);
        let mut sched = RippleScheduler::new(config).unwrap();
        for _ in 0..20 {
            let r = sched.tick(&mut f, 0.25).unwrap().unwrap();
            assert!((1..=14).contains(&r.at.row));
            assert!((1..=14).contains(&r.at.col));
        }
    }

    #[test]
    fn infinite_delta_does_not_advance_clock() {
        let mut f = field(16);
        let mut sched = RippleScheduler::new(RippleConfig::default()).unwrap();
        assert!(sched.tick(&mut f, f32::INFINITY).unwrap().is_none());
        assert!(sched.tick(&mut f, f32::NAN).unwrap().is_none());
        assert_eq!(sched.elapsed(), 0.0);

        assert!(sched.tick(&mut f, 0.25).unwrap().is_some());
        assert!(sched.tick(&mut f, 0.0).unwrap().is_none());
        assert_eq!(sched.fired(), 1);
    }

    #[test]
    fn ripple_disturbs_field() {
        let mut f = field(16);
        let mut sched = RippleScheduler::new(RippleConfig::default()).unwrap();
        let r = sched.tick(&mut f, 0.25).unwrap().unwrap();
        let h = f.height(r.at.row, r.at.col).unwrap();
        assert!((h - r.magnitude * 0.5).abs() < 1e-6);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut fa = field(64);
        let mut fb = field(64);
        let mut a = RippleScheduler::new(RippleConfig::default()).unwrap();
        let mut b = RippleScheduler::new(RippleConfig::default()).unwrap();
        for _ in 0..40 {
            assert_eq!(a.tick(&mut fa, 0.1).unwrap(), b.tick(&mut fb, 0.1).unwrap());
        }
        assert_eq!(fa.state_hash(), fb.state_hash());
    }

    #[test]
    fn ripple_converts_to_event() {
        let ripple = Ripple {
            at: GridCoord::new(5, 6),
            magnitude: 0.3,
        };
        let event: WaveEvent = ripple.into();
        assert_eq!(
            event,
            WaveEvent::Disturbed {
                at: GridCoord::new(5, 6),
                magnitude: 0.3
            }
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: RippleConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.interval_s, 0.25);
    }
}
