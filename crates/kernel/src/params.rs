use serde::{Deserialize, Serialize};

use crate::error::WaveError;

/// Smallest grid extent along either axis.
pub const MIN_GRID_EXTENT: usize = 4;

/// Construction parameters for a [`WaveField`](crate::WaveField).
///
/// All values are fixed for the lifetime of the field. Defaults reproduce the
/// water surface of the scene demo: a 128x128 grid with a unit spatial step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    /// Vertex rows (depth axis).
    pub rows: usize,
    /// Vertex columns (width axis).
    pub columns: usize,
    /// Physical width of the grid in world units.
    pub spatial_size: f32,
    /// Fixed simulation quantum in seconds.
    pub time_step: f32,
    /// Wave propagation speed in world units per second.
    pub wave_speed: f32,
    /// Damping coefficient (1/s). Zero means undamped.
    pub damping: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            rows: 128,
            columns: 128,
            spatial_size: 127.0,
            time_step: 0.03,
            wave_speed: 4.0,
            damping: 0.2,
        }
    }
}

/// Closed-form update weights of the explicit damped wave scheme.
///
/// `next = k1 * prev + k2 * curr + k3 * (sum of the four neighbours)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub k1: f32,
    pub k2: f32,
    pub k3: f32,
}

impl WaveParams {
    pub fn new(
        rows: usize,
        columns: usize,
        spatial_size: f32,
        time_step: f32,
        wave_speed: f32,
        damping: f32,
    ) -> Self {
        Self {
            rows,
            columns,
            spatial_size,
            time_step,
            wave_speed,
            damping,
        }
    }

    /// Check every construction precondition.
    pub fn validate(&self) -> Result<(), WaveError> {
        if self.rows < MIN_GRID_EXTENT {
            return Err(WaveError::invalid(format!(
                "rows must be at least {MIN_GRID_EXTENT}, got {}",
                self.rows
            )));
        }
        if self.columns < MIN_GRID_EXTENT {
            return Err(WaveError::invalid(format!(
                "columns must be at least {MIN_GRID_EXTENT}, got {}",
                self.columns
            )));
        }
        positive("spatial_size", self.spatial_size)?;
        positive("time_step", self.time_step)?;
        positive("wave_speed", self.wave_speed)?;
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(WaveError::invalid(format!(
                "damping must be finite and >= 0, got {}",
                self.damping
            )));
        }
        Ok(())
    }

    /// Distance between neighbouring vertices, identical along both axes.
    pub fn spatial_step(&self) -> f32 {
        self.spatial_size / (self.columns - 1) as f32
    }

    /// `c^2 * dt^2 / dx^2`, the dimensionless term of the scheme.
    pub fn diffusion_term(&self) -> f32 {
        let dx = self.spatial_step();
        (self.wave_speed * self.wave_speed * self.time_step * self.time_step) / (dx * dx)
    }

    /// Courant number `c * dt / dx`.
    pub fn courant_number(&self) -> f32 {
        self.wave_speed * self.time_step / self.spatial_step()
    }

    /// Whether the explicit scheme stays bounded for these parameters.
    ///
    /// For the 2D five-point stencil this is `c * dt / dx <= 1/sqrt(2)`,
    /// equivalently `diffusion_term() <= 0.5`.
    pub fn is_stable(&self) -> bool {
        self.diffusion_term() <= 0.5
    }

    /// Derive the stepping weights. Callers must validate first.
    pub fn coefficients(&self) -> Coefficients {
        let mu_t = self.damping * self.time_step;
        let d = mu_t + 2.0;
        let e = self.diffusion_term();
        Coefficients {
            k1: (mu_t - 2.0) / d,
            k2: (4.0 - 8.0 * e) / d,
            k3: (2.0 * e) / d,
        }
    }
}

fn positive(name: &str, value: f32) -> Result<(), WaveError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WaveError::invalid(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> WaveParams {
        WaveParams::new(8, 8, 8.0, 0.03, 4.0, 0.2)
    }

    #[test]
    fn defaults_are_valid_and_stable() {
        let p = WaveParams::default();
        assert!(p.validate().is_ok());
        assert!(p.is_stable());
        assert_eq!(p.spatial_step(), 1.0);
    }

    #[test]
    fn rejects_small_grids() {
        let mut p = scenario();
        p.rows = 3;
        assert!(matches!(p.validate(), Err(WaveError::InvalidArgument(_))));

        let mut p = scenario();
        p.columns = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_scalars() {
        let mutations: [fn(&mut WaveParams); 5] = [
            |p| p.spatial_size = 0.0,
            |p| p.time_step = -0.1,
            |p| p.wave_speed = f32::NAN,
            |p| p.damping = -1.0,
            |p| p.time_step = f32::INFINITY,
        ];
        for mutate in mutations {
            let mut p = scenario();
            mutate(&mut p);
            assert!(p.validate().is_err(), "{p:?} should be rejected");
        }
    }

    #[test]
    fn zero_damping_is_allowed() {
        let mut p = scenario();
        p.damping = 0.0;
        assert!(p.validate().is_ok());
        let k = p.coefficients();
        assert!((k.k1 + 1.0).abs() < 1e-5);
    }

    #[test]
    fn coefficients_match_closed_form() {
        let p = scenario();
        let dx = 8.0_f32 / 7.0;
        let e = 16.0 * 0.03 * 0.03 / (dx * dx);
        let d = 0.2 * 0.03 + 2.0;
        let k = p.coefficients();
        assert!((k.k1 - (0.2 * 0.03 - 2.0) / d).abs() < 1e-5);
        assert!((k.k2 - (4.0 - 8.0 * e) / d).abs() < 1e-5);
        assert!((k.k3 - 2.0 * e / d).abs() < 1e-5);
    }

    #[test]
    fn stability_tracks_courant_number() {
        let mut p = scenario();
        assert!(p.is_stable());
        assert!(p.courant_number() < 1.0 / std::f32::consts::SQRT_2);

        p.time_step = 1.0;
        assert!(!p.is_stable());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let p: WaveParams = serde_json::from_str(r#"{ "rows": 16, "columns": 16 }"#).unwrap();
        assert_eq!(p.rows, 16);
        assert_eq!(p.time_step, WaveParams::default().time_step);
    }
}
