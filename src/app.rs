use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::game::{GameEvent, GameState, step};
use crate::highscore::HighScoreStore;
use crate::input::{HostCommand, InputManager};
use crate::renderer::{GameRenderer, RenderView};

/// Longest simulated step; a stall (window drag, suspend) is not replayed in full
const MAX_FRAME_MS: f32 = 100.0;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// The main application: owns the game state and its collaborators.
pub struct App {
    running: bool,
    state: GameState,
    last_frame_time: Instant,
    fps: u32,
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
    high_scores: Box<dyn HighScoreStore>,
}

impl App {
    pub fn new(
        state: GameState,
        input_manager: InputManager,
        audio_manager: AudioManager,
        high_scores: Box<dyn HighScoreStore>,
    ) -> Self {
        Self {
            running: true,
            state,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager,
            renderer: GameRenderer::new(),
            audio_manager,
            high_scores,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            for command in self.input_manager.poll_events()? {
                self.handle_command(command);
            }
            if !self.running {
                break;
            }

            let dt = (frame_time.as_secs_f32() * 1000.0).min(MAX_FRAME_MS);
            let controls = self.input_manager.controls();
            step(&mut self.state, &controls, dt);
            self.dispatch_events();

            terminal.draw(|frame| {
                let area = frame.area();
                let view = RenderView {
                    state: &self.state,
                    area,
                    edge_width: edge_width_for(
                        area.width,
                        area.height,
                        self.state.config.width,
                        self.state.config.height,
                    ),
                    fps: self.fps,
                    muted: self.audio_manager.is_muted(),
                };
                self.renderer.render(frame, &view);
            })?;

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }
        log::info!("Exiting with high score {}", self.state.high_score);
        Ok(())
    }

    fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::Quit => self.running = false,
            HostCommand::ToggleMute => {
                self.audio_manager.toggle_mute();
            }
        }
    }

    /// Hand queued game events to audio and persistence
    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(cue) => self.audio_manager.play(cue),
                GameEvent::NewHighScore(score) => {
                    if let Err(err) = self.high_scores.save(score) {
                        log::warn!("Failed to save high score {score}: {err:#}");
                    }
                }
            }
        }
    }
}

/// Columns to leave empty on each side so the playfield keeps its shape
pub fn edge_width_for(area_width: u16, area_height: u16, field_width: f32, field_height: f32) -> u16 {
    let rows = area_height.saturating_sub(2) as f32;
    // +2 for the side borders
    let wanted = (rows * field_width / field_height * CELL_ASPECT).round() as u16 + 2;
    area_width.saturating_sub(wanted) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::entities::{Enemy, EnemyKind};
    use crate::highscore::MemoryHighScoreStore;
    use crate::input::Controls;

    fn app_with(state: GameState) -> App {
        App::new(
            state,
            InputManager::new(false),
            AudioManager::silent(),
            Box::new(MemoryHighScoreStore::default()),
        )
    }

    #[test]
    fn test_edge_width_keeps_aspect() {
        // 42 rows -> 40 playfield rows -> 60 columns + 2 borders
        assert_eq!(edge_width_for(162, 42, 600.0, 800.0), 50);
        // Narrow terminal: no margin
        assert_eq!(edge_width_for(40, 42, 600.0, 800.0), 0);
    }

    #[test]
    fn test_quit_command_stops_app() {
        let mut app = app_with(GameState::new(Config::default(), 0, 1));
        app.handle_command(HostCommand::Quit);
        assert!(!app.running);
    }

    #[test]
    fn test_mute_command_toggles_audio() {
        let mut app = app_with(GameState::new(Config::default(), 0, 1));
        assert!(app.audio_manager.is_muted());
        app.handle_command(HostCommand::ToggleMute);
        assert!(!app.audio_manager.is_muted());
    }

    #[test]
    fn test_new_high_score_is_persisted() {
        let mut state = GameState::new(Config::default(), 0, 1);
        state.lives = 1;
        state.score = 300;
        let mut enemy = Enemy::new(EnemyKind::Asteroid, state.player.x, 1.0);
        enemy.y = state.player.y;
        enemy.speed_y = 0.0;
        state.enemies.push(enemy);

        let mut app = app_with(state);
        step(&mut app.state, &Controls::default(), 16.0);
        app.dispatch_events();

        assert_eq!(app.high_scores.load(), 300);
        assert!(app.state.drain_events().is_empty());
    }
}
