use std::f32::consts::TAU;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

use snake_engine::SoundConfig;
use snake_engine::game::{AudioSink, SoundCue};
use snake_engine::log;

const SAMPLE_RATE: u32 = 44_100;

enum AudioCommand {
    Play(SoundCue),
    StopBackground,
}

/// Best-effort sound output. The output stream is not `Send`, so playback
/// runs on its own thread fed by a channel; every failure is logged and
/// swallowed, and a disabled config degrades to a silent sink.
pub struct SoundPlayer {
    tx: Option<mpsc::Sender<AudioCommand>>,
}

impl SoundPlayer {
    pub fn new(config: SoundConfig) -> Self {
        if !config.enabled {
            return Self { tx: None };
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || audio_thread(rx, config));
        Self { tx: Some(tx) }
    }
}

impl AudioSink for SoundPlayer {
    fn play(&self, cue: SoundCue) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(AudioCommand::Play(cue));
        }
    }

    fn stop_background(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(AudioCommand::StopBackground);
        }
    }
}

fn audio_thread(rx: mpsc::Receiver<AudioCommand>, config: SoundConfig) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            log!("Audio output unavailable, playing silently: {}", e);
            return;
        }
    };

    let mut background: Option<Sink> = None;

    while let Ok(command) = rx.recv() {
        match command {
            AudioCommand::Play(SoundCue::Eat) => {
                play_once(&handle, eat_cue(), config.eat_volume);
            }
            AudioCommand::Play(SoundCue::GameOver) => {
                play_once(&handle, game_over_cue(), config.game_over_volume);
            }
            AudioCommand::Play(SoundCue::Background) => {
                if let Some(old) = background.take() {
                    old.stop();
                }
                match Sink::try_new(&handle) {
                    Ok(sink) => {
                        sink.set_volume(config.background_volume);
                        sink.append(background_loop().repeat_infinite());
                        background = Some(sink);
                    }
                    Err(e) => log!("Failed to start background loop: {}", e),
                }
            }
            AudioCommand::StopBackground => {
                if let Some(sink) = background.take() {
                    sink.stop();
                }
            }
        }
    }
}

fn play_once(handle: &OutputStreamHandle, source: SamplesBuffer<f32>, volume: f32) {
    match Sink::try_new(handle) {
        Ok(sink) => {
            sink.set_volume(volume);
            sink.append(source);
            sink.detach();
        }
        Err(e) => log!("Sound playback failed: {}", e),
    }
}

/// Appends a sine tone with a linear fade-out so cues don't click.
fn tone(frequency: f32, duration: Duration, samples: &mut Vec<f32>) {
    let count = (SAMPLE_RATE as f32 * duration.as_secs_f32()) as usize;
    for i in 0..count {
        let t = i as f32 / SAMPLE_RATE as f32;
        let envelope = 1.0 - i as f32 / count as f32;
        samples.push((t * frequency * TAU).sin() * envelope);
    }
}

fn eat_cue() -> SamplesBuffer<f32> {
    let mut samples = Vec::new();
    tone(880.0, Duration::from_millis(90), &mut samples);
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

fn game_over_cue() -> SamplesBuffer<f32> {
    let mut samples = Vec::new();
    tone(392.0, Duration::from_millis(180), &mut samples);
    tone(196.0, Duration::from_millis(350), &mut samples);
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

fn background_loop() -> SamplesBuffer<f32> {
    let mut samples = Vec::new();
    for frequency in [262.0, 330.0, 392.0, 330.0] {
        tone(frequency, Duration::from_millis(280), &mut samples);
    }
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}
