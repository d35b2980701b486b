use snake_engine::game::{DeathReason, FramePresenter, FrameSnapshot};

use crate::state::{Screen, SharedState};

/// Presenter that only writes the shared view state; the egui thread picks
/// the changes up on its next repaint.
#[derive(Clone)]
pub struct LocalPresenter {
    shared_state: SharedState,
}

impl LocalPresenter {
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

impl FramePresenter for LocalPresenter {
    fn render(&self, frame: FrameSnapshot) {
        self.shared_state.set_frame(frame);
    }

    fn show_start_screen(&self) {
        self.shared_state.set_screen(Screen::Start);
    }

    fn show_game_over_screen(&self, reason: DeathReason) {
        self.shared_state.set_game_over(reason);
    }

    fn hide_overlays(&self) {
        self.shared_state.set_screen(Screen::Playing);
    }
}
