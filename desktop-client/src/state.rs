use std::sync::{Arc, Mutex};

use snake_engine::game::{DeathReason, FrameSnapshot};

/// Which layer of the UI is in front.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    GameOver,
}

#[derive(Clone, Debug)]
pub struct ViewState {
    pub screen: Screen,
    /// Latest rendered frame; survives into the game-over screen so the
    /// final board stays visible behind the overlay.
    pub frame: Option<FrameSnapshot>,
    pub death_reason: Option<DeathReason>,
}

/// State shared between the session task (writer) and the egui thread
/// (reader).
pub struct SharedState {
    view: Arc<Mutex<ViewState>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            view: Arc::new(Mutex::new(ViewState {
                screen: Screen::Start,
                frame: None,
                death_reason: None,
            })),
        }
    }

    pub fn get_view(&self) -> ViewState {
        self.view.lock().unwrap().clone()
    }

    pub fn set_frame(&self, frame: FrameSnapshot) {
        self.view.lock().unwrap().frame = Some(frame);
    }

    pub fn set_screen(&self, screen: Screen) {
        self.view.lock().unwrap().screen = screen;
    }

    pub fn set_game_over(&self, reason: DeathReason) {
        let mut view = self.view.lock().unwrap();
        view.screen = Screen::GameOver;
        view.death_reason = Some(reason);
    }
}

impl Clone for SharedState {
    fn clone(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
        }
    }
}
