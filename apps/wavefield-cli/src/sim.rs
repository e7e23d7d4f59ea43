use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use wavefield_kernel::{WaveEvent, WaveField};
use wavefield_render::SurfaceMesh;
use wavefield_ripple::{Ripple, RippleScheduler};

use crate::config::SimConfig;

/// One host loop: ripple cadence, field update and mesh refresh per frame,
/// optionally recording every mutating call for replay.
pub struct Simulation {
    field: WaveField,
    mesh: SurfaceMesh,
    ripples: RippleScheduler,
    events: Option<Vec<WaveEvent>>,
}

impl Simulation {
    pub fn new(config: &SimConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let field = WaveField::new(config.wave)?;
        let mesh = SurfaceMesh::new(&field);
        let ripples = RippleScheduler::new(config.ripple.clone())?;
        Ok(Self {
            field,
            mesh,
            ripples,
            events: None,
        })
    }

    /// Keep a [`WaveEvent`] log of every call made against the field.
    pub fn recording(mut self) -> Self {
        self.events = Some(Vec::new());
        self
    }

    pub fn field(&self) -> &WaveField {
        &self.field
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    pub fn ripples_fired(&self) -> u64 {
        self.ripples.fired()
    }

    pub fn events(&self) -> &[WaveEvent] {
        self.events.as_deref().unwrap_or(&[])
    }

    /// Advance one frame: maybe inject a ripple, update, refresh the mesh.
    pub fn frame(&mut self, delta_time: f32) -> anyhow::Result<Option<Ripple>> {
        let ripple = self.ripples.tick(&mut self.field, delta_time)?;
        self.field.update(delta_time);

        if let Some(log) = self.events.as_mut() {
            if let Some(r) = ripple {
                log.push(r.into());
            }
            log.push(WaveEvent::Advanced { delta_time });
        }

        self.mesh.refresh(&self.field)?;
        Ok(ripple)
    }
}

/// Final heights of a run, as written by `run --export`.
#[derive(Debug, Serialize)]
pub struct HeightExport<'a> {
    pub rows: usize,
    pub columns: usize,
    pub spatial_step: f32,
    pub steps: u64,
    /// Current generation, row-major.
    pub heights: &'a [f32],
}

impl<'a> HeightExport<'a> {
    pub fn of(field: &'a WaveField) -> Self {
        Self {
            rows: field.row_count(),
            columns: field.column_count(),
            spatial_step: field.spatial_step(),
            steps: field.steps(),
            heights: field.heights(),
        }
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating export file {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)
            .with_context(|| format!("writing heights to {}", path.display()))?;
        Ok(())
    }
}
