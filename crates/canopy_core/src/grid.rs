//! Map grid primitives.
//!
//! Cells use the host's `(x, y, z)` layout where `y` is the vertical layer and
//! the map plane is spanned by `x` and `z`. Rectangles are always on layer 0.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance on the map plane; the layer `y` is ignored.
    pub fn distance_to(self, other: Cell) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dz = (self.z - other.z) as f32;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Inclusive rectangle of cells on the map plane.
///
/// A rectangle built with a non-positive width or height holds no cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub min_x: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_z: i32,
}

impl CellRect {
    /// Rectangle anchored at its bottom-left corner `(x, z)`.
    pub const fn new(x: i32, z: i32, width: i32, height: i32) -> Self {
        Self {
            min_x: x,
            min_z: z,
            max_x: x + width - 1,
            max_z: z + height - 1,
        }
    }

    pub fn width(&self) -> i32 {
        (self.max_x - self.min_x + 1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.max_z - self.min_z + 1).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn bottom_left(&self) -> Cell {
        Cell::new(self.min_x, 0, self.min_z)
    }

    /// Translate the rectangle by `offset` (`x`, `z`).
    pub fn moved_by(self, offset: IVec2) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_z: self.min_z + offset.y,
            max_x: self.max_x + offset.x,
            max_z: self.max_z + offset.y,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.min_x && cell.x <= self.max_x && cell.z >= self.min_z && cell.z <= self.max_z
    }

    /// Iterate cells row by row, starting at the bottom-left corner.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_z..=self.max_z)
            .flat_map(move |z| (min_x..=max_x).map(move |x| Cell::new(x, 0, z)))
    }
}

/// Size of a map. Valid cells satisfy `0 <= x < size_x` and `0 <= z < size_z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapBounds {
    pub size_x: i32,
    pub size_z: i32,
}

impl MapBounds {
    pub const fn new(size_x: i32, size_z: i32) -> Self {
        Self { size_x, size_z }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.size_x && cell.z >= 0 && cell.z < self.size_z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_cells_cover_width_times_height() {
        let rect = CellRect::new(2, 3, 3, 2);
        let cells: Vec<Cell> = rect.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(2, 0, 3));
        assert_eq!(cells[5], Cell::new(4, 0, 4));
    }

    #[test]
    fn zero_sized_rect_is_empty() {
        let rect = CellRect::new(5, 5, 0, 4);
        assert!(rect.is_empty());
        assert_eq!(rect.cells().count(), 0);
    }

    #[test]
    fn moved_rect_shifts_both_corners() {
        let rect = CellRect::new(5, 5, 3, 3).moved_by(IVec2::new(-1, -1));
        assert_eq!(rect.bottom_left(), Cell::new(4, 0, 4));
        assert!(rect.contains(Cell::new(6, 0, 6)));
        assert!(!rect.contains(Cell::new(7, 0, 6)));
    }

    #[test]
    fn bounds_reject_negative_and_edge_cells() {
        let bounds = MapBounds::new(10, 10);
        assert!(bounds.contains(Cell::new(0, 0, 9)));
        assert!(!bounds.contains(Cell::new(-1, 0, 0)));
        assert!(!bounds.contains(Cell::new(10, 0, 0)));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Cell::new(0, 0, 0);
        assert_eq!(a.distance_to(Cell::new(3, 0, 4)), 5.0);
    }

    #[test]
    fn distance_ignores_layer() {
        let a = Cell::new(0, 0, 0);
        assert_eq!(a.distance_to(Cell::new(3, 7, 4)), 5.0);
    }

    #[test]
    fn cell_serializes_as_object() {
        let json = serde_json::to_string(&Cell::new(1, 0, 2)).unwrap();
        assert_eq!(json, r#"{"x":1,"y":0,"z":2}"#);
    }
}
