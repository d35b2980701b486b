use std::collections::{HashSet, VecDeque};

use super::grid::Grid;
use super::types::{Direction, Point};

/// The snake body, head-first, with a hash-set mirror for O(1) occupancy
/// checks. Disjointness of segments is not enforced structurally; collision
/// detection ends the game instead.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
}

impl Snake {
    pub fn new(start: Point, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        let mut body_set = HashSet::new();
        body.push_back(start);
        body_set.insert(start);

        Self {
            body,
            body_set,
            direction,
            pending_direction: None,
        }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    pub fn grow_front(&mut self, head: Point) {
        self.body.push_front(head);
        self.body_set.insert(head);
    }

    pub fn shrink_back(&mut self) {
        let tail = self
            .body
            .pop_back()
            .expect("Snake body should never be empty");
        // Requantization can collapse two segments onto one cell; only clear
        // the occupancy bit when no other segment still uses it.
        if !self.body.contains(&tail) {
            self.body_set.remove(&tail);
        }
    }

    /// Head-first segment positions.
    pub fn cells(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    /// Remaps every segment onto a new grid: floor to the new cell size,
    /// then clamp into bounds.
    pub fn requantize(&mut self, grid: &Grid) {
        for segment in self.body.iter_mut() {
            *segment = grid.snap_clamp(*segment);
        }
        self.body_set = self.body.iter().copied().collect();
    }
}
