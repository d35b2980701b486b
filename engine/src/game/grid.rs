use super::session_rng::SessionRng;
use super::types::Point;

/// The board is always this many cells on each side; the playable surface is
/// divided by it to derive the cell size.
pub const GRID_CELLS: u32 = 20;

pub const SURFACE_WIDTH_FRACTION: f32 = 0.7;
pub const SURFACE_HEIGHT_FRACTION: f32 = 0.5;

/// Playable surface geometry, in pixels. `width` and `height` are exact
/// multiples of `cell`, and `cell` is never 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub cell: u32,
    pub width: u32,
    pub height: u32,
}

impl Grid {
    /// Derives the square playable surface from the viewport: a fraction of
    /// each dimension, capped to the smaller of the two.
    pub fn from_viewport(viewport_width: f32, viewport_height: f32) -> Self {
        let surface = (viewport_width * SURFACE_WIDTH_FRACTION)
            .min(viewport_height * SURFACE_HEIGHT_FRACTION)
            .max(0.0);
        Self::from_surface(surface as u32)
    }

    pub fn from_surface(surface: u32) -> Self {
        let cell = (surface / GRID_CELLS).max(1);
        Self {
            cell,
            width: cell * GRID_CELLS,
            height: cell * GRID_CELLS,
        }
    }

    /// Floors a coordinate to the nearest lower multiple of the cell size.
    pub fn snap(&self, value: u32) -> u32 {
        (value / self.cell) * self.cell
    }

    /// Re-quantizes a point to this grid and clamps it into bounds.
    pub fn snap_clamp(&self, point: Point) -> Point {
        Point::new(
            self.snap(point.x).min(self.width - self.cell),
            self.snap(point.y).min(self.height - self.cell),
        )
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x + self.cell <= self.width && point.y + self.cell <= self.height
    }

    /// Where a new snake spawns: centered horizontally, 70% down the board.
    pub fn start_cell(&self) -> Point {
        Point::new(self.snap(self.width / 2), self.snap(self.height * 7 / 10))
    }

    pub fn random_cell(&self, rng: &mut SessionRng) -> Point {
        Point::new(
            rng.random_range(0..GRID_CELLS) * self.cell,
            rng.random_range(0..GRID_CELLS) * self.cell,
        )
    }

    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..GRID_CELLS).flat_map(move |row| {
            (0..GRID_CELLS).map(move |col| Point::new(col * self.cell, row * self.cell))
        })
    }
}
