use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::log;

use super::game_state::GameState;
use super::grid::Grid;
use super::presenter::{AudioSink, FramePresenter, FrameSnapshot, SoundCue};
use super::session_rng::SessionRng;
use super::settings::SessionSettings;
use super::types::{DeathReason, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionCommand {
    Start,
    Reset,
    Steer(Direction),
    Resize { width: f32, height: f32 },
    Shutdown,
}

#[derive(Clone, Debug)]
pub enum TickOutcome {
    /// The session was not Playing; nothing happened.
    Skipped,
    Advanced {
        frame: FrameSnapshot,
        ate: bool,
    },
    GameOver {
        reason: DeathReason,
        score: u32,
    },
}

/// The session state machine: Idle -> Playing -> GameOver, restartable from
/// anywhere via `start`. Synchronous so the lifecycle is testable without
/// timers; `run_session` drives it.
pub struct SnakeSession {
    phase: SessionPhase,
    state: Option<GameState>,
    grid: Grid,
    rng: SessionRng,
    settings: SessionSettings,
    tick_count: u64,
}

impl SnakeSession {
    pub fn new(settings: SessionSettings, grid: Grid, rng: SessionRng) -> Self {
        Self {
            phase: SessionPhase::Idle,
            state: None,
            grid,
            rng,
            settings,
            tick_count: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Starts a fresh game, discarding whatever came before. Also serves as
    /// `reset`: the session is fully re-initialized, never resumed.
    pub fn start(&mut self) -> FrameSnapshot {
        self.state = Some(GameState::new(
            self.grid,
            self.settings.food_style_mode,
            &mut self.rng,
        ));
        self.phase = SessionPhase::Playing;
        self.tick_count = 0;
        log!("Game started (seed {})", self.rng.seed());
        self.frame().expect("state exists after start")
    }

    /// Records a direction intent; read once per tick. Ignored outside
    /// Playing, so stale input cannot leak into the next game.
    pub fn steer(&mut self, direction: Direction) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        if let Some(state) = self.state.as_mut() {
            state.set_direction(direction);
        }
    }

    /// Advances the game by one tick. No-op unless Playing; the transition
    /// into GameOver is reported exactly once.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Playing {
            return TickOutcome::Skipped;
        }

        let state = self
            .state
            .as_mut()
            .expect("Playing session always has game state");
        self.tick_count += 1;

        match state.advance(&mut self.rng) {
            Ok(outcome) if outcome.board_full => {
                let score = state.score;
                self.phase = SessionPhase::GameOver;
                log!("Board full after {} ticks. Final score: {}", self.tick_count, score);
                TickOutcome::GameOver {
                    reason: DeathReason::BoardFull,
                    score,
                }
            }
            Ok(outcome) => TickOutcome::Advanced {
                frame: snapshot(state, self.tick_count),
                ate: outcome.ate,
            },
            Err(reason) => {
                let score = state.score;
                self.phase = SessionPhase::GameOver;
                log!(
                    "Game over ({:?}) after {} ticks. Final score: {}",
                    reason,
                    self.tick_count,
                    score
                );
                TickOutcome::GameOver { reason, score }
            }
        }
    }

    /// Recomputes the grid for a new viewport and re-quantizes live entities.
    /// Returns a frame to draw when the change is visible mid-game.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) -> Option<FrameSnapshot> {
        let grid = Grid::from_viewport(viewport_width, viewport_height);
        if grid == self.grid {
            return None;
        }
        self.grid = grid;

        if let Some(state) = self.state.as_mut() {
            state.apply_grid(grid, &mut self.rng);
        }

        if self.phase == SessionPhase::Playing {
            self.frame()
        } else {
            None
        }
    }

    pub fn frame(&self) -> Option<FrameSnapshot> {
        self.state
            .as_ref()
            .map(|state| snapshot(state, self.tick_count))
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        self.state.as_mut().expect("no game state")
    }
}

fn snapshot(state: &GameState, tick: u64) -> FrameSnapshot {
    FrameSnapshot {
        snake: state.snake.cells().copied().collect(),
        food: state.food,
        food_style: state.food_style,
        score: state.score,
        grid: state.grid,
        tick,
    }
}

/// Drives a session from a command channel: a `select!` over commands and a
/// tick sleep that is armed only while Playing and re-armed only after tick
/// processing finishes, so exactly one tick is ever pending and starting or
/// ending a game drops the previous one.
pub async fn run_session<P: FramePresenter, A: AudioSink>(
    settings: SessionSettings,
    rng: SessionRng,
    viewport: (f32, f32),
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    presenter: P,
    audio: A,
) {
    let tick_interval = settings.tick_interval;
    let grid = Grid::from_viewport(viewport.0, viewport.1);
    let mut session = SnakeSession::new(settings, grid, rng);

    presenter.show_start_screen();

    let mut tick_timer = Box::pin(sleep(tick_interval));

    loop {
        tokio::select! {
            _ = &mut tick_timer, if session.phase() == SessionPhase::Playing => {
                match session.tick() {
                    TickOutcome::Advanced { frame, ate } => {
                        if ate {
                            audio.play(SoundCue::Eat);
                        }
                        presenter.render(frame);
                    }
                    TickOutcome::GameOver { reason, .. } => {
                        audio.stop_background();
                        audio.play(SoundCue::GameOver);
                        presenter.show_game_over_screen(reason);
                    }
                    TickOutcome::Skipped => {}
                }
                if session.phase() == SessionPhase::Playing {
                    tick_timer = Box::pin(sleep(tick_interval));
                }
            }
            command = commands.recv() => {
                match command {
                    Some(SessionCommand::Start | SessionCommand::Reset) => {
                        let frame = session.start();
                        presenter.hide_overlays();
                        presenter.render(frame);
                        audio.play(SoundCue::Background);
                        tick_timer = Box::pin(sleep(tick_interval));
                    }
                    Some(SessionCommand::Steer(direction)) => {
                        session.steer(direction);
                    }
                    Some(SessionCommand::Resize { width, height }) => {
                        if let Some(frame) = session.resize(width, height) {
                            presenter.render(frame);
                        }
                    }
                    Some(SessionCommand::Shutdown) | None => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Point;
    use std::sync::{Arc, Mutex};

    fn create_session() -> SnakeSession {
        // 200x200 surface -> cell 10, start cell (100, 140).
        SnakeSession::new(
            SessionSettings::default(),
            Grid::from_surface(200),
            SessionRng::new(42),
        )
    }

    fn park_food(session: &mut SnakeSession) {
        session.state_mut().set_food_position(Point::new(0, 0));
    }

    #[test]
    fn test_new_session_is_idle_with_no_frame() {
        let session = create_session();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.frame().is_none());
    }

    #[test]
    fn test_tick_outside_playing_is_skipped() {
        let mut session = create_session();
        assert!(matches!(session.tick(), TickOutcome::Skipped));
    }

    #[test]
    fn test_start_resets_to_canonical_state() {
        let mut session = create_session();
        let frame = session.start();

        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(frame.snake, vec![Point::new(100, 140)]);
        assert_eq!(frame.score, 1);
        assert_eq!(frame.tick, 0);
        assert_ne!(frame.food, Point::new(100, 140));
    }

    #[test]
    fn test_tick_advances_and_counts() {
        let mut session = create_session();
        session.start();
        park_food(&mut session);

        match session.tick() {
            TickOutcome::Advanced { frame, ate } => {
                assert!(!ate);
                assert_eq!(frame.snake, vec![Point::new(100, 130)]);
                assert_eq!(frame.tick, 1);
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_game_over_fires_once_then_ticks_are_skipped() {
        let mut session = create_session();
        session.start();
        park_food(&mut session);

        let mut game_overs = 0;
        for _ in 0..20 {
            if let TickOutcome::GameOver { reason, score } = session.tick() {
                assert_eq!(reason, DeathReason::WallCollision);
                assert_eq!(score, 1);
                game_overs += 1;
            }
        }

        assert_eq!(game_overs, 1);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(matches!(session.tick(), TickOutcome::Skipped));
    }

    #[test]
    fn test_fifteenth_upward_tick_hits_the_wall() {
        let mut session = create_session();
        session.start();
        park_food(&mut session);

        for _ in 0..14 {
            assert!(matches!(session.tick(), TickOutcome::Advanced { .. }));
        }
        assert!(matches!(
            session.tick(),
            TickOutcome::GameOver {
                reason: DeathReason::WallCollision,
                ..
            }
        ));
    }

    #[test]
    fn test_restart_from_game_over_restores_everything() {
        let mut session = create_session();
        session.start();
        park_food(&mut session);
        while !matches!(session.tick(), TickOutcome::GameOver { .. }) {}

        let frame = session.start();
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(frame.score, 1);
        assert_eq!(frame.snake, vec![Point::new(100, 140)]);
        assert_eq!(frame.tick, 0);
    }

    #[test]
    fn test_steer_is_ignored_outside_playing() {
        let mut session = create_session();
        session.steer(Direction::Left);
        assert_eq!(session.phase(), SessionPhase::Idle);

        let frame = session.start();
        // The pre-start intent must not survive into the new game.
        assert_eq!(frame.snake, vec![Point::new(100, 140)]);
        park_food(&mut session);
        match session.tick() {
            TickOutcome::Advanced { frame, .. } => {
                assert_eq!(frame.snake, vec![Point::new(100, 130)]);
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_steer_changes_next_tick() {
        let mut session = create_session();
        session.start();
        park_food(&mut session);

        session.steer(Direction::Left);
        match session.tick() {
            TickOutcome::Advanced { frame, .. } => {
                assert_eq!(frame.snake, vec![Point::new(90, 140)]);
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_resize_requantizes_mid_game() {
        let mut session = create_session();
        session.start();

        let frame = session
            .resize(1000.0, 800.0) // surface 400, cell 20
            .expect("grid changed while Playing");
        assert_eq!(frame.grid.cell, 20);
        for segment in &frame.snake {
            assert!(frame.grid.in_bounds(*segment));
        }
        assert!(frame.grid.in_bounds(frame.food));
        assert!(!frame.snake.contains(&frame.food));
    }

    #[test]
    fn test_resize_to_same_grid_is_a_no_op() {
        let mut session = create_session();
        session.start();
        // from_viewport(x, 400) with 0.5 fraction reproduces surface 200.
        assert!(session.resize(10000.0, 400.0).is_none());
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn push(&self, event: &str) {
            self.events.lock().unwrap().push(event.to_string());
        }

        fn count(&self, event: &str) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| *e == event)
                .count()
        }
    }

    impl FramePresenter for Recorder {
        fn render(&self, _frame: FrameSnapshot) {
            self.push("render");
        }
        fn show_start_screen(&self) {
            self.push("start_screen");
        }
        fn show_game_over_screen(&self, _reason: DeathReason) {
            self.push("game_over_screen");
        }
        fn hide_overlays(&self) {
            self.push("hide_overlays");
        }
    }

    impl AudioSink for Recorder {
        fn play(&self, cue: SoundCue) {
            self.push(match cue {
                SoundCue::Eat => "eat_cue",
                SoundCue::GameOver => "game_over_cue",
                SoundCue::Background => "background_cue",
            });
        }
        fn stop_background(&self) {
            self.push("stop_background");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_ticks_until_game_over_then_stops() {
        let recorder = Recorder::default();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(run_session(
            SessionSettings::default(),
            SessionRng::new(42),
            (286.0, 400.0), // surface 200, cell 10
            command_rx,
            recorder.clone(),
            recorder.clone(),
        ));

        command_tx.send(SessionCommand::Start).unwrap();
        // Walking straight up from (100, 140) collides within 15 ticks; give
        // the paused clock room for all of them.
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;

        assert_eq!(recorder.count("start_screen"), 1);
        assert_eq!(recorder.count("hide_overlays"), 1);
        assert_eq!(recorder.count("background_cue"), 1);
        assert_eq!(recorder.count("game_over_screen"), 1);
        assert_eq!(recorder.count("stop_background"), 1);
        assert_eq!(recorder.count("game_over_cue"), 1);
        let renders = recorder.count("render");
        assert!((1..=15).contains(&renders), "renders: {}", renders);

        // No more ticks after game over.
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        assert_eq!(recorder.count("render"), renders);

        command_tx.send(SessionCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
