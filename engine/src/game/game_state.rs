use crate::log;

use super::grid::Grid;
use super::session_rng::SessionRng;
use super::snake::Snake;
use super::types::{DeathReason, Direction, FOOD_STYLE_COUNT, FoodStyleMode, Point};

/// Uniform random attempts before falling back to sampling the free-cell
/// complement, which guarantees placement terminates at any occupancy.
const FOOD_PLACEMENT_ATTEMPTS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceOutcome {
    pub ate: bool,
    /// Food could not be placed because the snake covers every cell.
    pub board_full: bool,
}

/// One play session's board: snake, food, score, and the grid they live on.
#[derive(Clone, Debug)]
pub struct GameState {
    pub snake: Snake,
    pub food: Point,
    pub food_style: usize,
    pub score: u32,
    pub grid: Grid,
    food_style_mode: FoodStyleMode,
}

impl GameState {
    pub fn new(grid: Grid, food_style_mode: FoodStyleMode, rng: &mut SessionRng) -> Self {
        let mut state = Self {
            snake: Snake::new(grid.start_cell(), Direction::Up),
            food: Point::new(0, 0),
            food_style: 0,
            score: 1,
            grid,
            food_style_mode,
        };
        state.place_food(rng);
        state
    }

    /// Records a direction intent for the next tick. The exact opposite of
    /// the committed direction is rejected; anything else overwrites the
    /// pending value, so only the latest intent before a tick survives.
    pub fn set_direction(&mut self, direction: Direction) {
        if !direction.is_opposite(&self.snake.direction) {
            self.snake.pending_direction = Some(direction);
        }
    }

    /// Advances the snake by one cell, growing through food. Wall and self
    /// collisions are reported as terminal reasons, not applied.
    pub fn advance(&mut self, rng: &mut SessionRng) -> Result<AdvanceOutcome, DeathReason> {
        if let Some(direction) = self.snake.pending_direction.take() {
            self.snake.direction = direction;
        }

        let next_head = self.next_head_position()?;

        // Any occupied cell is fatal, including the tail cell that would be
        // vacated this tick.
        if self.snake.occupies(&next_head) {
            return Err(DeathReason::SelfCollision);
        }

        self.snake.grow_front(next_head);

        if next_head == self.food {
            self.score += 1;
            log!(
                "Ate food at ({}, {}). Score: {}",
                next_head.x,
                next_head.y,
                self.score
            );
            let board_full = !self.place_food(rng);
            Ok(AdvanceOutcome {
                ate: true,
                board_full,
            })
        } else {
            self.snake.shrink_back();
            Ok(AdvanceOutcome {
                ate: false,
                board_full: false,
            })
        }
    }

    fn next_head_position(&self) -> Result<Point, DeathReason> {
        let head = self.snake.head();
        let cell = self.grid.cell;

        let next_head = match self.snake.direction {
            Direction::Up => {
                if head.y == 0 {
                    return Err(DeathReason::WallCollision);
                }
                Point::new(head.x, head.y - cell)
            }
            Direction::Down => {
                if head.y + cell >= self.grid.height {
                    return Err(DeathReason::WallCollision);
                }
                Point::new(head.x, head.y + cell)
            }
            Direction::Left => {
                if head.x == 0 {
                    return Err(DeathReason::WallCollision);
                }
                Point::new(head.x - cell, head.y)
            }
            Direction::Right => {
                if head.x + cell >= self.grid.width {
                    return Err(DeathReason::WallCollision);
                }
                Point::new(head.x + cell, head.y)
            }
        };

        Ok(next_head)
    }

    /// Places food on a random free cell. Returns false when no free cell
    /// exists.
    pub fn place_food(&mut self, rng: &mut SessionRng) -> bool {
        for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
            let pos = self.grid.random_cell(rng);
            if !self.snake.occupies(&pos) {
                self.put_food(pos, rng);
                return true;
            }
        }

        // Dense board: sample the free-cell complement directly.
        let free: Vec<Point> = self
            .grid
            .cells()
            .filter(|pos| !self.snake.occupies(pos))
            .collect();
        if free.is_empty() {
            return false;
        }

        let pos = free[rng.random_range(0..free.len())];
        self.put_food(pos, rng);
        true
    }

    fn put_food(&mut self, pos: Point, rng: &mut SessionRng) {
        self.food = pos;
        self.food_style = match self.food_style_mode {
            FoodStyleMode::Single => 0,
            FoodStyleMode::Rotating => rng.random_range(0..FOOD_STYLE_COUNT),
        };
        log!("Food spawned at ({}, {})", pos.x, pos.y);
    }

    /// Moves the session onto a new grid after a resize: every entity is
    /// floored to the new cell size and clamped into bounds, and food is
    /// re-placed if requantization landed it on the snake.
    pub fn apply_grid(&mut self, grid: Grid, rng: &mut SessionRng) {
        self.snake.requantize(&grid);
        self.grid = grid;

        let food = grid.snap_clamp(self.food);
        if self.snake.occupies(&food) {
            self.place_food(rng);
        } else {
            self.food = food;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_food_position(&mut self, pos: Point) {
        self.food = pos;
    }

    /// Test helper: rebuilds the snake from head-first cells.
    #[cfg(test)]
    pub(crate) fn set_snake_cells(&mut self, cells: Vec<Point>, direction: Direction) {
        let mut cells = cells.into_iter().rev();
        let tail = cells.next().expect("test snake needs at least one cell");
        let mut snake = Snake::new(tail, direction);
        for cell in cells {
            snake.grow_front(cell);
        }
        self.snake = snake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::GRID_CELLS;

    fn create_state() -> (GameState, SessionRng) {
        let mut rng = SessionRng::new(42);
        // 200x200 surface -> cell 10, start cell (100, 140).
        let state = GameState::new(Grid::from_surface(200), FoodStyleMode::Single, &mut rng);
        (state, rng)
    }

    #[test]
    fn test_initial_state() {
        let (state, _) = create_state();
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Point::new(100, 140));
        assert_eq!(state.snake.direction, Direction::Up);
        assert!(!state.snake.occupies(&state.food));
        assert!(state.grid.in_bounds(state.food));
    }

    #[test]
    fn test_set_direction_rejects_exact_opposite() {
        let (mut state, _) = create_state();
        state.set_direction(Direction::Down);
        assert_eq!(state.snake.pending_direction, None);
    }

    #[test]
    fn test_set_direction_accepts_turns_and_keeps_latest() {
        let (mut state, _) = create_state();
        state.set_direction(Direction::Left);
        state.set_direction(Direction::Right);
        assert_eq!(state.snake.pending_direction, Some(Direction::Right));
    }

    #[test]
    fn test_advance_moves_one_cell_without_growth() {
        let (mut state, mut rng) = create_state();
        state.set_food_position(Point::new(0, 0));

        let outcome = state.advance(&mut rng).unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome {
                ate: false,
                board_full: false
            }
        );
        assert_eq!(state.snake.head(), Point::new(100, 130));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_upward_walk_hits_wall_on_fifteenth_tick() {
        let (mut state, mut rng) = create_state();
        state.set_food_position(Point::new(0, 0));

        for _ in 0..14 {
            state.advance(&mut rng).unwrap();
        }
        assert_eq!(state.snake.head(), Point::new(100, 0));

        assert_eq!(state.advance(&mut rng), Err(DeathReason::WallCollision));
        // The failed move is not applied.
        assert_eq!(state.snake.head(), Point::new(100, 0));
    }

    #[test]
    fn test_wall_collision_on_every_edge() {
        for (direction, steps) in [
            (Direction::Up, 14),
            (Direction::Left, 10),
            (Direction::Right, 9),
            (Direction::Down, 5),
        ] {
            let (mut state, mut rng) = create_state();
            state.set_food_position(Point::new(0, 0));
            state.set_snake_cells(vec![Point::new(100, 140)], direction);
            for _ in 0..steps {
                state.advance(&mut rng).unwrap();
            }
            assert_eq!(state.advance(&mut rng), Err(DeathReason::WallCollision));
        }
    }

    #[test]
    fn test_self_collision_includes_vacating_tail_cell() {
        let (mut state, mut rng) = create_state();
        state.set_food_position(Point::new(0, 0));
        // Square loop, head at (50, 50) moving right into the tail at (60, 50).
        state.set_snake_cells(
            vec![
                Point::new(50, 50),
                Point::new(50, 60),
                Point::new(60, 60),
                Point::new(60, 50),
            ],
            Direction::Right,
        );

        assert_eq!(state.advance(&mut rng), Err(DeathReason::SelfCollision));
    }

    #[test]
    fn test_single_segment_snake_never_self_collides() {
        let (mut state, mut rng) = create_state();
        state.set_food_position(Point::new(0, 0));
        for _ in 0..5 {
            assert!(state.advance(&mut rng).is_ok());
        }
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let (mut state, mut rng) = create_state();
        state.set_food_position(Point::new(100, 130));

        let outcome = state.advance(&mut rng).unwrap();
        assert!(outcome.ate);
        assert!(!outcome.board_full);
        assert_eq!(state.score, 2);
        assert_eq!(state.snake.len(), 2);
        assert!(!state.snake.occupies(&state.food));
        assert!(state.grid.in_bounds(state.food));
    }

    #[test]
    fn test_food_is_never_placed_on_a_nearly_full_snake() {
        let (mut state, mut rng) = create_state();
        let cell = state.grid.cell;

        // Snake covers every cell except the origin.
        let occupied: Vec<Point> = state
            .grid
            .cells()
            .filter(|pos| *pos != Point::new(0, 0))
            .collect();
        state.set_snake_cells(occupied, Direction::Up);
        assert_eq!(
            state.snake.len(),
            (GRID_CELLS * GRID_CELLS - 1) as usize,
            "snake should cover all but one of the {cell}-px cells"
        );

        assert!(state.place_food(&mut rng));
        assert_eq!(state.food, Point::new(0, 0));
    }

    #[test]
    fn test_place_food_fails_only_on_a_full_board() {
        let (mut state, mut rng) = create_state();
        let all: Vec<Point> = state.grid.cells().collect();
        state.set_snake_cells(all, Direction::Up);

        assert!(!state.place_food(&mut rng));
    }

    #[test]
    fn test_eating_the_last_free_cell_reports_board_full() {
        let (mut state, mut rng) = create_state();
        // Head at (0, 10) moving up into the only free cell (0, 0).
        let mut cells: Vec<Point> = state
            .grid
            .cells()
            .filter(|pos| *pos != Point::new(0, 0) && *pos != Point::new(0, 10))
            .collect();
        cells.insert(0, Point::new(0, 10));
        state.set_snake_cells(cells, Direction::Up);
        state.set_food_position(Point::new(0, 0));

        let outcome = state.advance(&mut rng).unwrap();
        assert!(outcome.ate);
        assert!(outcome.board_full);
    }

    #[test]
    fn test_apply_grid_requantizes_and_keeps_entities_in_bounds() {
        let mut rng = SessionRng::new(42);
        let mut state = GameState::new(Grid::from_surface(400), FoodStyleMode::Single, &mut rng);
        // cell 20, start (200, 280); shrink the surface to cell 10.
        state.apply_grid(Grid::from_surface(200), &mut rng);

        assert_eq!(state.grid.cell, 10);
        for segment in state.snake.cells() {
            assert!(state.grid.in_bounds(*segment));
            assert_eq!(segment.x % state.grid.cell, 0);
            assert_eq!(segment.y % state.grid.cell, 0);
        }
        assert!(state.grid.in_bounds(state.food));
        assert!(!state.snake.occupies(&state.food));
    }

    #[test]
    fn test_apply_grid_replaces_food_that_lands_on_the_snake() {
        let (mut state, mut rng) = create_state();
        // Food one cell right of the head: both snap onto the same cell when
        // the board shrinks enough.
        state.set_snake_cells(vec![Point::new(100, 140)], Direction::Up);
        state.set_food_position(Point::new(110, 140));

        state.apply_grid(Grid::from_surface(40), &mut rng);
        assert!(!state.snake.occupies(&state.food));
        assert!(state.grid.in_bounds(state.food));
    }

    #[test]
    fn test_rotating_mode_picks_styles_from_the_pool() {
        let mut rng = SessionRng::new(7);
        let mut state = GameState::new(Grid::from_surface(200), FoodStyleMode::Rotating, &mut rng);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            state.place_food(&mut rng);
            assert!(state.food_style < FOOD_STYLE_COUNT);
            seen.insert(state.food_style);
        }
        assert!(seen.len() > 1);
    }
}
