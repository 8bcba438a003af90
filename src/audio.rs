use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::time::Duration;

/// Sound effects the game can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Shoot,
    Explosion,
    PowerUp,
    CollectCoin,
    GameOver,
}

impl Cue {
    /// Tone sequence as (frequency in Hz, length in ms), played back to back
    pub fn tones(&self) -> &'static [(f32, u64)] {
        match self {
            Cue::Shoot => &[(880.0, 100), (600.0, 100)],
            Cue::Explosion => &[(100.0, 300)],
            Cue::PowerUp => &[(1200.0, 100), (1500.0, 200)],
            Cue::CollectCoin => &[(2000.0, 100)],
            Cue::GameOver => &[(300.0, 500), (200.0, 500)],
        }
    }
}

/// Audio manager for synthesized sound effects
pub struct AudioManager {
    /// Output device; None when no device could be opened
    output: Option<(OutputStream, OutputStreamHandle)>,
    muted: bool,
    volume: f32,
}

impl AudioManager {
    pub const DEFAULT_VOLUME: f32 = 0.3;

    /// Open the default output device. Falls back to silence if there is none.
    pub fn new(muted: bool) -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(err) => {
                log::warn!("Failed to initialize audio, continuing without sound: {err}");
                None
            }
        };

        Self {
            output,
            muted,
            volume: Self::DEFAULT_VOLUME,
        }
    }

    /// An audio manager that never touches a device
    pub fn silent() -> Self {
        Self {
            output: None,
            muted: true,
            volume: Self::DEFAULT_VOLUME,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute and return the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn play(&self, cue: Cue) {
        if self.muted {
            return;
        }
        let Some((_, handle)) = &self.output else {
            return;
        };

        // Playback errors are not worth interrupting the game for
        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                for &(frequency, millis) in cue.tones() {
                    sink.append(
                        SineWave::new(frequency)
                            .take_duration(Duration::from_millis(millis))
                            .amplify(0.5),
                    );
                }
                sink.detach();
            }
            Err(err) => log::debug!("Dropped {cue:?}: {err}"),
        }
    }
}
