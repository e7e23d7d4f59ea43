use wavefield_kernel::WaveField;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the field between mutating calls and produces output.
/// It never mutates the field.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the current field state.
    fn render(&self, field: &WaveField) -> Self::Output;
}

/// Brightness ramp from deepest trough to highest crest.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Text renderer: an ASCII height map with one character per vertex.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    /// Height mapped to the top (and, negated, the bottom) of the ramp.
    /// `None` scales to the field's current maximum.
    pub full_scale: Option<f32>,
    /// Render every n-th row and column.
    pub stride: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            full_scale: None,
            stride: 1,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample every `stride`-th vertex so large grids fit a terminal.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride.max(1);
        self
    }

    pub fn with_full_scale(mut self, full_scale: f32) -> Self {
        self.full_scale = Some(full_scale);
        self
    }

    fn glyph(&self, height: f32, scale: f32) -> char {
        let top = RAMP.len() - 1;
        // [-scale, scale] -> [0, 1]
        let t = if scale > 0.0 {
            ((height / scale).clamp(-1.0, 1.0) + 1.0) * 0.5
        } else {
            0.5
        };
        RAMP[(t * top as f32).round() as usize] as char
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, field: &WaveField) -> String {
        let peak = field.max_abs_height();
        let scale = self.full_scale.unwrap_or(peak);
        let stride = self.stride.max(1);

        let mut out = String::new();
        out.push_str(&format!(
            "=== Wave field {}x{} (steps={}) ===\n",
            field.row_count(),
            field.column_count(),
            field.steps()
        ));
        out.push_str(&format!("max |height|: {peak:.4}\n"));

        for row in (0..field.row_count()).step_by(stride) {
            for col in (0..field.column_count()).step_by(stride) {
                let h = field.height(row, col).unwrap_or(0.0);
                out.push(self.glyph(h, scale));
            }
            out.push('\n');
        }
        out
    }
}
