use glam::Vec3;

use crate::error::WaveError;
use crate::params::{Coefficients, WaveParams};

/// Upper bound on discrete steps taken by a single [`WaveField::update`].
///
/// Backlog beyond this after a long stall is dropped, not carried over.
pub const MAX_STEPS_PER_UPDATE: u32 = 8;

/// A height field evolved by an explicit finite-difference scheme for the
/// damped 2D wave equation.
///
/// Three height generations (`t-1`, `t`, `t+1`) live in fixed buffers; each
/// step writes the scratch generation and then rotates roles by index, so no
/// memory is allocated after construction. Boundary vertices are never
/// advanced and keep whatever height they last had.
///
/// The field is single-writer: `update` and `disturb` mutate it, and readers
/// must finish with [`position`](Self::position) / [`normal`](Self::normal)
/// before the next mutating call.
#[derive(Debug, Clone)]
pub struct WaveField {
    params: WaveParams,
    coefficients: Coefficients,
    spatial_step: f32,
    heights: [Vec<f32>; 3],
    /// Slot in `heights` holding generation `t`. `t-1` is at `current + 2`,
    /// scratch `t+1` at `current + 1` (mod 3).
    current: usize,
    /// Fixed world-space X/Z of every vertex.
    plane: Vec<[f32; 2]>,
    normals: Vec<Vec3>,
    accumulator: f32,
    steps: u64,
}

impl WaveField {
    /// Build a flat, motionless field.
    ///
    /// Fails with [`WaveError::InvalidArgument`] if any parameter violates its
    /// precondition. Parameters outside the stability region are accepted
    /// with a warning, since keeping the scheme bounded is the caller's
    /// tuning decision.
    pub fn new(params: WaveParams) -> Result<Self, WaveError> {
        params.validate()?;

        let rows = params.rows;
        let columns = params.columns;
        let dx = params.spatial_step();
        let coefficients = params.coefficients();
        if !params.is_stable() {
            tracing::warn!(
                courant = params.courant_number(),
                "wave parameters exceed the stability limit; heights may diverge"
            );
        }

        let half_width = (columns - 1) as f32 * dx * 0.5;
        let half_depth = (rows - 1) as f32 * dx * 0.5;
        let mut plane = Vec::with_capacity(rows * columns);
        for i in 0..rows {
            let z = half_depth - i as f32 * dx;
            for j in 0..columns {
                plane.push([-half_width + j as f32 * dx, z]);
            }
        }

        let count = rows * columns;
        tracing::debug!(
            rows,
            columns,
            dx,
            k1 = coefficients.k1,
            k2 = coefficients.k2,
            k3 = coefficients.k3,
            "wave field created"
        );

        Ok(Self {
            params,
            coefficients,
            spatial_step: dx,
            heights: [vec![0.0; count], vec![0.0; count], vec![0.0; count]],
            current: 0,
            plane,
            normals: vec![Vec3::Y; count],
            accumulator: 0.0,
            steps: 0,
        })
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub fn row_count(&self) -> usize {
        self.params.rows
    }

    pub fn column_count(&self) -> usize {
        self.params.columns
    }

    pub fn vertex_count(&self) -> usize {
        self.params.rows * self.params.columns
    }

    /// Two triangles per grid quad.
    pub fn triangle_count(&self) -> usize {
        2 * (self.params.rows - 1) * (self.params.columns - 1)
    }

    /// Extent along X.
    pub fn width(&self) -> f32 {
        (self.params.columns - 1) as f32 * self.spatial_step
    }

    /// Extent along Z. Equals [`width`](Self::width) for square grids.
    pub fn depth(&self) -> f32 {
        (self.params.rows - 1) as f32 * self.spatial_step
    }

    pub fn spatial_step(&self) -> f32 {
        self.spatial_step
    }

    /// Total discrete steps taken since construction.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated time not yet consumed by a step. Always below `time_step`
    /// between calls.
    pub fn accumulated_time(&self) -> f32 {
        self.accumulator
    }

    /// Heights of generation `t`, row-major.
    pub fn heights(&self) -> &[f32] {
        &self.heights[self.current]
    }

    /// Heights of generation `t-1`, row-major.
    pub fn previous_heights(&self) -> &[f32] {
        &self.heights[(self.current + 2) % 3]
    }

    pub fn height(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.params.rows && col < self.params.columns {
            Some(self.heights()[row * self.params.columns + col])
        } else {
            None
        }
    }

    /// World-space position of vertex `index` (row-major): fixed X/Z plus the
    /// current height.
    ///
    /// # Panics
    /// If `index >= vertex_count()`.
    pub fn position(&self, index: usize) -> Vec3 {
        let [x, z] = self.plane[index];
        Vec3::new(x, self.heights()[index], z)
    }

    /// Unit surface normal of vertex `index` as of the last update that
    /// advanced the field.
    ///
    /// # Panics
    /// If `index >= vertex_count()`.
    pub fn normal(&self, index: usize) -> Vec3 {
        self.normals[index]
    }

    /// `(position, normal)` for every vertex in index order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = (Vec3, Vec3)> + '_ {
        let heights = self.heights();
        self.plane
            .iter()
            .zip(heights)
            .zip(&self.normals)
            .map(|((&[x, z], &y), &n)| (Vec3::new(x, y, z), n))
    }

    /// Largest absolute height in generation `t`.
    pub fn max_abs_height(&self) -> f32 {
        self.heights().iter().fold(0.0_f32, |m, h| m.max(h.abs()))
    }

    /// Advance simulated time by a frame delta.
    ///
    /// Whole `time_step` quanta are consumed from an accumulator, at most
    /// [`MAX_STEPS_PER_UPDATE`] per call. Non-positive or NaN deltas are
    /// ignored.
    pub fn update(&mut self, delta_time: f32) {
        if delta_time.is_nan() || delta_time <= 0.0 {
            return;
        }
        self.accumulator += delta_time;

        let time_step = self.params.time_step;
        let mut taken = 0;
        while self.accumulator >= time_step {
            if taken == MAX_STEPS_PER_UPDATE {
                tracing::debug!(
                    discarded = self.accumulator,
                    "step cap reached, dropping backlog"
                );
                self.accumulator = 0.0;
                break;
            }
            self.step();
            self.accumulator -= time_step;
            taken += 1;
        }

        if taken > 0 {
            self.recompute_normals();
        }
        tracing::trace!(
            steps = taken,
            accumulator = self.accumulator,
            "wave field updated"
        );
    }

    /// Inject an impulse at interior vertex `(row, col)`: half the magnitude
    /// on the vertex itself, a quarter on each of its four neighbours.
    ///
    /// Only generation `t` changes; normals catch up on the next update.
    pub fn disturb(&mut self, row: usize, col: usize, magnitude: f32) -> Result<(), WaveError> {
        let rows = self.params.rows;
        let columns = self.params.columns;
        if row == 0 || col == 0 || row >= rows - 1 || col >= columns - 1 {
            return Err(WaveError::invalid(format!(
                "disturbance at ({row}, {col}) is outside the interior rows 1..={} and columns 1..={}",
                rows - 2,
                columns - 2
            )));
        }
        if !magnitude.is_finite() {
            return Err(WaveError::invalid(format!(
                "disturbance magnitude must be finite, got {magnitude}"
            )));
        }

        let heights = &mut self.heights[self.current];
        let idx = row * columns + col;
        let quarter = 0.25 * magnitude;
        heights[idx] += 0.5 * magnitude;
        heights[idx - 1] += quarter;
        heights[idx + 1] += quarter;
        heights[idx - columns] += quarter;
        heights[idx + columns] += quarter;
        Ok(())
    }

    /// One discrete step: fill generation `t+1`, then rotate roles.
    fn step(&mut self) {
        let rows = self.params.rows;
        let columns = self.params.columns;
        let Coefficients { k1, k2, k3 } = self.coefficients;
        let (prev, curr, next) = split_generations(&mut self.heights, self.current);

        // Boundary rows are frozen.
        next[..columns].copy_from_slice(&curr[..columns]);
        let last = (rows - 1) * columns;
        next[last..].copy_from_slice(&curr[last..]);

        for i in 1..rows - 1 {
            let row = i * columns;
            next[row] = curr[row];
            next[row + columns - 1] = curr[row + columns - 1];
            for idx in row + 1..row + columns - 1 {
                let neighbours =
                    curr[idx - columns] + curr[idx + columns] + curr[idx - 1] + curr[idx + 1];
                next[idx] = k1 * prev[idx] + k2 * curr[idx] + k3 * neighbours;
            }
        }

        self.current = (self.current + 1) % 3;
        self.steps += 1;
    }

    /// Central differences in the interior, one-sided on the outer ring.
    fn recompute_normals(&mut self) {
        let rows = self.params.rows;
        let columns = self.params.columns;
        let dx = self.spatial_step;
        let h = &self.heights[self.current];

        for i in 0..rows {
            // Row index grows toward -Z.
            let up = i.saturating_sub(1);
            let down = (i + 1).min(rows - 1);
            for j in 0..columns {
                let left = j.saturating_sub(1);
                let right = (j + 1).min(columns - 1);
                let dh_dx =
                    (h[i * columns + right] - h[i * columns + left]) / ((right - left) as f32 * dx);
                let dh_dz =
                    (h[up * columns + j] - h[down * columns + j]) / ((down - up) as f32 * dx);
                self.normals[i * columns + j] = Vec3::new(-dh_dx, 1.0, -dh_dz).normalize();
            }
        }
    }

    /// FNV-1a over the exact bits of the simulation state: generations `t-1`
    /// and `t`, step count and accumulator. Two fields driven by the same
    /// call sequence hash equal.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.steps.to_le_bytes());
        mix(&mut h, &self.accumulator.to_bits().to_le_bytes());
        for value in self.previous_heights().iter().chain(self.heights()) {
            mix(&mut h, &value.to_bits().to_le_bytes());
        }
        h
    }
}

/// Borrow `(t-1, t, t+1)` out of the ring given the slot of `t`.
fn split_generations(
    heights: &mut [Vec<f32>; 3],
    current: usize,
) -> (&[f32], &[f32], &mut [f32]) {
    match current {
        0 => {
            let [curr, next, prev] = heights;
            (prev.as_slice(), curr.as_slice(), next.as_mut_slice())
        }
        1 => {
            let [prev, curr, next] = heights;
            (prev.as_slice(), curr.as_slice(), next.as_mut_slice())
        }
        _ => {
            let [next, prev, curr] = heights;
            (prev.as_slice(), curr.as_slice(), next.as_mut_slice())
        }
    }
}
