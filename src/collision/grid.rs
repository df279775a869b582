//! Cell grid provider for tile mazes
//!
//! `true` cells are paths, `false` cells are walls. Positions are continuous
//! and map to the cell they fall in; with a cell size of 1 a position is just
//! `(col, row)`.

use glam::Vec2;

use super::CollisionProvider;
use crate::error::RegionError;

#[derive(Debug, Clone, PartialEq)]
pub struct GridCollisionProvider {
    cells: Vec<Vec<bool>>,
    cols: usize,
    cell_size: f32,
}

impl GridCollisionProvider {
    /// Rows of walkability flags, all the same non-zero length
    pub fn new(cells: Vec<Vec<bool>>, cell_size: f32) -> Result<Self, RegionError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RegionError::BadCellSize(cell_size));
        }
        let cols = cells.first().map_or(0, Vec::len);
        if cols == 0 || cells.iter().any(|row| row.len() != cols) {
            return Err(RegionError::RaggedGrid);
        }
        Ok(Self {
            cells,
            cols,
            cell_size,
        })
    }

    /// Build from a `0`/`1` pattern (1 = path)
    pub fn from_pattern<R: AsRef<[u8]>>(pattern: &[R], cell_size: f32) -> Result<Self, RegionError> {
        let cells = pattern
            .iter()
            .map(|row| row.as_ref().iter().map(|&c| c == 1).collect())
            .collect();
        Self::new(cells, cell_size)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing `pos`, `None` outside the grid
    pub fn cell_at(&self, pos: Vec2) -> Option<(usize, usize)> {
        if !pos.is_finite() {
            return None;
        }
        let cell = (pos / self.cell_size).floor();
        if cell.x < 0.0 || cell.y < 0.0 {
            return None;
        }
        let (col, row) = (cell.x as usize, cell.y as usize);
        (row < self.rows() && col < self.cols).then_some((row, col))
    }

    /// Centre point of a cell, handy for placing actors on paths
    pub fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        (Vec2::new(col as f32, row as f32) + 0.5) * self.cell_size
    }

    /// Whether the cell at `row`, `col` is a path
    pub fn is_path(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }
}

impl CollisionProvider for GridCollisionProvider {
    fn point_walkable(&self, pos: Vec2) -> bool {
        self.cell_at(pos)
            .is_some_and(|(row, col)| self.cells[row][col])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_maze() -> GridCollisionProvider {
        GridCollisionProvider::from_pattern(
            &[[1u8, 1, 0], [0, 1, 0], [0, 1, 1]],
            10.0,
        )
        .unwrap()
    }

    #[test]
    fn test_cells_and_walls() {
        let grid = small_maze();
        assert_eq!((grid.rows(), grid.cols()), (3, 3));
        assert!(grid.point_walkable(Vec2::new(5.0, 5.0)));
        assert!(!grid.point_walkable(Vec2::new(25.0, 5.0)));
        assert!(grid.point_walkable(Vec2::new(15.0, 25.0)));
        assert!(!grid.point_walkable(Vec2::new(-0.1, 5.0)));
        assert!(!grid.point_walkable(Vec2::new(5.0, 30.0)));
        assert!(grid.is_path(2, 2));
        assert!(!grid.is_path(5, 5));
    }

    #[test]
    fn test_cell_center_and_area() {
        let grid = small_maze();
        let c = grid.cell_center(1, 1);
        assert_eq!(c, Vec2::new(15.0, 15.0));
        assert_eq!(grid.cell_at(c), Some((1, 1)));
        // A disk wider than the corridor touches walls
        assert!(grid.area_walkable(c, 4.0));
        assert!(!grid.area_walkable(c, 6.0));
    }

    #[test]
    fn test_rejects_bad_grids() {
        assert_eq!(
            GridCollisionProvider::new(vec![], 1.0),
            Err(RegionError::RaggedGrid)
        );
        assert_eq!(
            GridCollisionProvider::new(vec![vec![true], vec![true, false]], 1.0),
            Err(RegionError::RaggedGrid)
        );
        assert!(matches!(
            GridCollisionProvider::new(vec![vec![true]], 0.0),
            Err(RegionError::BadCellSize(_))
        ));
    }

    proptest! {
        #[test]
        fn area_implies_point(x in -10.0f32..40.0, y in -10.0f32..40.0, r in 0.0f32..15.0) {
            let grid = small_maze();
            let p = Vec2::new(x, y);
            if grid.area_walkable(p, r) {
                prop_assert!(grid.point_walkable(p));
            }
        }

        #[test]
        fn points_match_cells(x in 0.0f32..29.9, y in 0.0f32..29.9) {
            let grid = small_maze();
            let p = Vec2::new(x, y);
            let (row, col) = grid.cell_at(p).unwrap();
            prop_assert_eq!(grid.point_walkable(p), grid.is_path(row, col));
        }
    }
}
