use serde::{Deserialize, Serialize};

/// A vertex position in the height grid, addressed by row and column.
///
/// Rows run along the depth (Z) axis and columns along the width (X) axis.
/// Vertex storage everywhere in the workspace is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major linear index for a grid with `columns` columns.
    pub fn to_index(self, columns: usize) -> usize {
        self.row * columns + self.col
    }

    /// Inverse of [`GridCoord::to_index`].
    pub fn from_index(index: usize, columns: usize) -> Self {
        Self {
            row: index / columns,
            col: index % columns,
        }
    }

    /// True if the coordinate lies on the outer ring of a `rows x columns` grid.
    pub fn is_boundary(self, rows: usize, columns: usize) -> bool {
        self.row == 0 || self.col == 0 || self.row + 1 == rows || self.col + 1 == columns
    }
}

impl From<(usize, usize)> for GridCoord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_row_major() {
        assert_eq!(GridCoord::new(0, 0).to_index(8), 0);
        assert_eq!(GridCoord::new(1, 0).to_index(8), 8);
        assert_eq!(GridCoord::new(2, 3).to_index(8), 19);
    }

    #[test]
    fn from_index_inverts_to_index() {
        let c = GridCoord::new(5, 7);
        assert_eq!(GridCoord::from_index(c.to_index(12), 12), c);
    }

    #[test]
    fn boundary_detection() {
        assert!(GridCoord::new(0, 3).is_boundary(8, 8));
        assert!(GridCoord::new(3, 7).is_boundary(8, 8));
        assert!(GridCoord::new(7, 7).is_boundary(8, 8));
        assert!(!GridCoord::new(1, 1).is_boundary(8, 8));
        assert!(!GridCoord::new(6, 6).is_boundary(8, 8));
    }
}
