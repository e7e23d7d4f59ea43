use bytemuck::{Pod, Zeroable};
use wavefield_kernel::WaveField;

/// GPU-facing vertex of the water surface.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// Errors from building or refreshing a surface mesh.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("{vertices} vertices do not fit 16-bit indices")]
    TooManyVertices { vertices: usize },
    #[error("mesh has {expected} vertices but the field has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Triangulated surface for a wave field: a fixed index buffer plus a vertex
/// buffer refreshed from the field after every update.
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    rows: usize,
    columns: usize,
    vertices: Vec<SurfaceVertex>,
    indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Build the index buffer for `field` and fill the vertex buffer from its
    /// current state.
    pub fn new(field: &WaveField) -> Self {
        let rows = field.row_count();
        let columns = field.column_count();
        let mut mesh = Self {
            rows,
            columns,
            vertices: vec![SurfaceVertex::default(); field.vertex_count()],
            indices: grid_indices(rows, columns),
        };
        mesh.fill(field);
        mesh
    }

    pub fn vertices(&self) -> &[SurfaceVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex bytes, ready for a buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer narrowed to 16 bits.
    pub fn compact_indices(&self) -> Result<Vec<u16>, MeshError> {
        let vertices = self.vertices.len();
        if vertices >= usize::from(u16::MAX) {
            return Err(MeshError::TooManyVertices { vertices });
        }
        Ok(self.indices.iter().map(|&i| i as u16).collect())
    }

    /// Copy positions and normals out of `field` and derive texture
    /// coordinates by mapping `[-w/2, w/2]` onto `[0, 1]`.
    ///
    /// Must run before the field's next `update` or `disturb`.
    pub fn refresh(&mut self, field: &WaveField) -> Result<(), MeshError> {
        if field.row_count() != self.rows || field.column_count() != self.columns {
            return Err(MeshError::DimensionMismatch {
                expected: self.vertices.len(),
                actual: field.vertex_count(),
            });
        }
        self.fill(field);
        tracing::trace!(
            vertices = self.vertices.len(),
            steps = field.steps(),
            "surface mesh refreshed"
        );
        Ok(())
    }

    fn fill(&mut self, field: &WaveField) {
        let width = field.width();
        let depth = field.depth();
        for (vertex, (position, normal)) in self.vertices.iter_mut().zip(field.vertices()) {
            *vertex = SurfaceVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                tex_coord: [0.5 + position.x / width, 0.5 - position.z / depth],
            };
        }
    }
}

/// Two triangles per grid quad, row-major.
fn grid_indices(rows: usize, columns: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(6 * (rows - 1) * (columns - 1));
    for i in 0..rows - 1 {
        for j in 0..columns - 1 {
            let top_left = (i * columns + j) as u32;
            let top_right = top_left + 1;
            let bottom_left = ((i + 1) * columns + j) as u32;
            let bottom_right = bottom_left + 1;

            indices.extend_from_slice(&[
                top_left,
                top_right,
                bottom_left,
                bottom_left,
                top_right,
                bottom_right,
            ]);
        }
    }
    indices
}
