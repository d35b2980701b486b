use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use snake_engine::game::{DeathReason, Direction, SessionCommand, SwipeTracker};

use crate::board;
use crate::state::{Screen, SharedState, ViewState};

const SCORE_POP_DURATION: Duration = Duration::from_millis(300);

pub struct SnakeApp {
    shared_state: SharedState,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    swipe: SwipeTracker,
    last_input_direction: Option<Direction>,
    last_viewport: egui::Vec2,
    last_score: u32,
    score_popped_at: Option<Instant>,
}

impl SnakeApp {
    pub fn new(
        shared_state: SharedState,
        command_tx: mpsc::UnboundedSender<SessionCommand>,
        min_swipe_distance: f32,
    ) -> Self {
        Self {
            shared_state,
            command_tx,
            swipe: SwipeTracker::new(min_swipe_distance),
            last_input_direction: None,
            last_viewport: egui::Vec2::ZERO,
            last_score: 1,
            score_popped_at: None,
        }
    }

    fn send(&self, command: SessionCommand) {
        let _ = self.command_tx.send(command);
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            let mut new_direction = None;

            if i.key_pressed(egui::Key::ArrowUp) {
                new_direction = Some(Direction::Up);
            } else if i.key_pressed(egui::Key::ArrowDown) {
                new_direction = Some(Direction::Down);
            } else if i.key_pressed(egui::Key::ArrowLeft) {
                new_direction = Some(Direction::Left);
            } else if i.key_pressed(egui::Key::ArrowRight) {
                new_direction = Some(Direction::Right);
            }

            if i.pointer.any_pressed()
                && let Some(pos) = i.pointer.press_origin()
            {
                self.swipe.touch_start(pos.x, pos.y);
            }
            if i.pointer.any_released()
                && let Some(pos) = i.pointer.latest_pos()
                && let Some(direction) = self.swipe.touch_end(pos.x, pos.y)
            {
                new_direction = Some(direction);
            }

            if let Some(direction) = new_direction
                && Some(direction) != self.last_input_direction
            {
                self.send(SessionCommand::Steer(direction));
                self.last_input_direction = Some(direction);
            }
        });
    }

    fn watch_viewport(&mut self, ctx: &egui::Context) {
        let size = ctx.screen_rect().size();
        if (size - self.last_viewport).length() > 1.0 {
            self.last_viewport = size;
            self.send(SessionCommand::Resize {
                width: size.x,
                height: size.y,
            });
        }
    }

    fn track_score(&mut self, view: &ViewState) {
        let Some(frame) = &view.frame else {
            return;
        };
        if frame.score > self.last_score {
            self.score_popped_at = Some(Instant::now());
        }
        self.last_score = frame.score;
    }

    fn render_score_line(&self, ui: &mut egui::Ui, view: &ViewState) {
        let score = view.frame.as_ref().map_or(1, |frame| frame.score);
        let popping = self
            .score_popped_at
            .is_some_and(|at| at.elapsed() < SCORE_POP_DURATION);

        let text = egui::RichText::new(format!("Points: {}", score))
            .size(if popping { 26.0 } else { 20.0 });
        ui.label(if popping { text.strong() } else { text });
    }

    fn render_start_overlay(&self, ctx: &egui::Context) {
        egui::Window::new("Snake")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Steer with the arrow keys, or swipe on the board.");
                ui.label("Eat the food, avoid the walls and your own tail.");
                if ui.button("Start Game").clicked() {
                    self.send(SessionCommand::Start);
                }
            });
    }

    fn render_game_over_overlay(&self, ctx: &egui::Context, view: &ViewState) {
        egui::Window::new("Game Over")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                let reason = match view.death_reason {
                    Some(DeathReason::WallCollision) => "You hit the wall.",
                    Some(DeathReason::SelfCollision) => "You ran into your own tail.",
                    Some(DeathReason::BoardFull) => "You filled the whole board!",
                    None => "",
                };
                ui.label(reason);
                ui.label(format!(
                    "Final score: {}",
                    view.frame.as_ref().map_or(1, |frame| frame.score)
                ));
                if ui.button("Play Again").clicked() {
                    self.send(SessionCommand::Reset);
                }
            });
    }
}

impl eframe::App for SnakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.watch_viewport(ctx);

        let view = self.shared_state.get_view();
        self.track_score(&view);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                self.render_score_line(ui, &view);
                ui.separator();
                board::draw_board(ui, view.frame.as_ref(), ctx.screen_rect().size());
            });
        });

        match view.screen {
            Screen::Start => self.render_start_overlay(ctx),
            Screen::GameOver => self.render_game_over_overlay(ctx, &view),
            Screen::Playing => {}
        }

        ctx.request_repaint();
    }
}

impl Drop for SnakeApp {
    fn drop(&mut self) {
        let _ = self.command_tx.send(SessionCommand::Shutdown);
    }
}
