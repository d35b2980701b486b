mod app;
mod audio;
mod board;
mod presenter;
mod state;

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use tokio::sync::mpsc;

use snake_engine::game::{SessionRng, SessionSettings, run_session};
use snake_engine::logger::init_logger;
use snake_engine::{GameConfig, log};

use app::SnakeApp;
use audio::SoundPlayer;
use presenter::LocalPresenter;
use state::SharedState;

const DEFAULT_WINDOW_SIZE: [f32; 2] = [600.0, 700.0];

#[derive(Parser, Debug)]
#[command(name = "snake_client", about = "Grid snake for the desktop")]
struct Args {
    /// Path to the YAML config file; defaults are used when it is absent.
    #[arg(long, default_value = "snake_config.yaml")]
    config: PathBuf,

    /// Seed for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let args = Args::parse();

    let config = GameConfig::load(&args.config)?;
    let settings = SessionSettings::from(&config);
    let min_swipe_distance = settings.min_swipe_distance;

    let rng = SessionRng::new(args.seed.unwrap_or_else(rand::random));
    log!("Session seed: {}", rng.seed());

    let shared_state = SharedState::new();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let presenter = LocalPresenter::new(shared_state.clone());
    let audio = SoundPlayer::new(config.sound.clone());

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        rt.block_on(run_session(
            settings,
            rng,
            (DEFAULT_WINDOW_SIZE[0], DEFAULT_WINDOW_SIZE[1]),
            command_rx,
            presenter,
            audio,
        ));
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(DEFAULT_WINDOW_SIZE)
            .with_title("Snake")
            .with_icon(window_icon()),
        ..Default::default()
    };

    eframe::run_native(
        "Snake",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(SnakeApp::new(
                shared_state,
                command_tx,
                min_swipe_distance,
            )))
        }),
    )?;

    Ok(())
}

/// A little coiled snake and an apple, drawn into pixels so no image asset
/// has to ship with the binary.
fn window_icon() -> egui::IconData {
    const CELLS: &[(u32, u32)] = &[
        (1, 1),
        (2, 1),
        (3, 1),
        (4, 1),
        (5, 1),
        (6, 1),
        (6, 2),
        (6, 3),
        (6, 4),
        (6, 5),
        (6, 6),
        (5, 6),
        (4, 6),
        (3, 6),
        (2, 6),
        (1, 6),
        (1, 5),
        (1, 4),
        (1, 3),
    ];
    const FOOD: (u32, u32) = (3, 4);
    const SIZE: u32 = 32;

    let image = image::RgbaImage::from_fn(SIZE, SIZE, |x, y| {
        let cell = (x / 4, y / 4);
        if cell == CELLS[0] {
            image::Rgba([0x1B, 0x5E, 0x20, 0xFF])
        } else if CELLS.contains(&cell) {
            image::Rgba([0x2E, 0x7D, 0x32, 0xFF])
        } else if cell == FOOD {
            image::Rgba([0xD3, 0x2F, 0x2F, 0xFF])
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    });

    egui::IconData {
        rgba: image.into_raw(),
        width: SIZE,
        height: SIZE,
    }
}
