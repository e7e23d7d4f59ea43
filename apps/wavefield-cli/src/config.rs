use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use wavefield_kernel::WaveParams;
use wavefield_ripple::RippleConfig;

/// Everything a run needs, loadable from YAML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub wave: WaveParams,
    pub ripple: RippleConfig,
    /// Seconds of simulated time per frame.
    pub frame_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            wave: WaveParams::default(),
            ripple: RippleConfig::default(),
            frame_dt: 1.0 / 60.0,
        }
    }
}

impl SimConfig {
    /// Load a config file. `.yaml`/`.yml` parse as YAML, anything else as JSON.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let config: Self = if is_yaml {
            serde_yaml::from_str(&text)
                .with_context(|| format!("parsing YAML config {}", path.display()))?
        } else {
            serde_json::from_str(&text)
                .with_context(|| format!("parsing JSON config {}", path.display()))?
        };
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Defaults, or the contents of `path` when given.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.wave.validate()?;
        self.ripple.validate()?;
        if !(self.frame_dt.is_finite() && self.frame_dt > 0.0) {
            bail!("frame_dt must be finite and > 0, got {}", self.frame_dt);
        }
        Ok(())
    }
}
