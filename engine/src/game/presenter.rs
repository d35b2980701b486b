use super::grid::Grid;
use super::types::{DeathReason, Point};

/// Everything a renderer needs to draw one tick's state.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    /// Snake segments, head first.
    pub snake: Vec<Point>,
    pub food: Point,
    pub food_style: usize,
    pub score: u32,
    pub grid: Grid,
    pub tick: u64,
}

/// Output seam between the session and whatever draws it. The session calls
/// these on lifecycle transitions and after every successful tick; it never
/// draws anything itself.
pub trait FramePresenter: Send + 'static {
    fn render(&self, frame: FrameSnapshot);
    fn show_start_screen(&self);
    fn show_game_over_screen(&self, reason: DeathReason);
    fn hide_overlays(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Eat,
    GameOver,
    /// Looping background music, started on game start.
    Background,
}

/// Best-effort sound output. Implementations must swallow playback failures;
/// the session never checks whether a cue actually played.
pub trait AudioSink: Send + 'static {
    fn play(&self, cue: SoundCue);
    fn stop_background(&self);
}
