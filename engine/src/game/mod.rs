mod game_state;
mod grid;
mod input;
mod presenter;
mod session;
mod session_rng;
mod settings;
mod snake;
mod types;

pub use game_state::{AdvanceOutcome, GameState};
pub use grid::{GRID_CELLS, Grid, SURFACE_HEIGHT_FRACTION, SURFACE_WIDTH_FRACTION};
pub use input::{DEFAULT_MIN_SWIPE_DISTANCE, SwipeTracker, classify_swipe};
pub use presenter::{AudioSink, FramePresenter, FrameSnapshot, SoundCue};
pub use session::{SessionCommand, SessionPhase, SnakeSession, TickOutcome, run_session};
pub use session_rng::SessionRng;
pub use settings::SessionSettings;
pub use snake::Snake;
pub use types::{DeathReason, Direction, FOOD_STYLE_COUNT, FoodStyleMode, Point};
