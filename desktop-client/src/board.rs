use eframe::egui;

use snake_engine::game::{FOOD_STYLE_COUNT, FrameSnapshot, Grid};

const BOARD_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x88, 0xFF, 0x88);
const SNAKE_HEAD: egui::Color32 = egui::Color32::from_rgb(0x1B, 0x5E, 0x20);
const SNAKE_BODY: egui::Color32 = egui::Color32::from_rgb(0x2E, 0x7D, 0x32);

/// One color per food style; the engine rotates through the pool.
const FOOD_STYLES: [egui::Color32; FOOD_STYLE_COUNT] = [
    egui::Color32::from_rgb(0xD3, 0x2F, 0x2F), // apple
    egui::Color32::from_rgb(0xF5, 0x7C, 0x00), // orange
    egui::Color32::from_rgb(0xFB, 0xC0, 0x2D), // banana
    egui::Color32::from_rgb(0x7B, 0x1F, 0xA2), // plum
    egui::Color32::from_rgb(0x30, 0x3F, 0x9F), // blueberry
];

/// Draws the board 1:1 in frame pixels. Before the first game there is no
/// frame yet, so an empty board is sized from the viewport the same way the
/// engine would size it.
pub fn draw_board(ui: &mut egui::Ui, frame: Option<&FrameSnapshot>, viewport: egui::Vec2) {
    let grid = match frame {
        Some(frame) => frame.grid,
        None => Grid::from_viewport(viewport.x, viewport.y),
    };

    let (response, painter) = ui.allocate_painter(
        egui::Vec2::new(grid.width as f32, grid.height as f32),
        egui::Sense::hover(),
    );
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, BOARD_BACKGROUND);

    let Some(frame) = frame else {
        return;
    };

    let cell = grid.cell as f32;
    let origin = rect.min;

    let food_center = origin
        + egui::vec2(
            frame.food.x as f32 + cell / 2.0,
            frame.food.y as f32 + cell / 2.0,
        );
    painter.circle_filled(
        food_center,
        cell * 0.45,
        FOOD_STYLES[frame.food_style % FOOD_STYLE_COUNT],
    );

    for (i, segment) in frame.snake.iter().enumerate() {
        let segment_rect = egui::Rect::from_min_size(
            origin + egui::vec2(segment.x as f32, segment.y as f32),
            egui::Vec2::splat(cell),
        );
        let color = if i == 0 { SNAKE_HEAD } else { SNAKE_BODY };
        painter.rect_filled(segment_rect.shrink(cell * 0.05), cell * 0.2, color);
    }
}
