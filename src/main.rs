use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};

use spacecraft::app::App;
use spacecraft::audio::AudioManager;
use spacecraft::config::Config;
use spacecraft::game::GameState;
use spacecraft::highscore::{FileHighScoreStore, HighScoreStore};
use spacecraft::input::InputManager;

#[derive(Parser)]
#[command(name = "spacecraft")]
#[command(about = "Arcade shoot-em-up for the terminal")]
struct Cli {
    /// Seed for the random stream; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding the default tuning values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "highscore.json")]
    high_score_file: PathBuf,

    /// Where log output goes while the terminal is in raw mode
    #[arg(long, default_value = "spacecraft.log")]
    log_file: PathBuf,

    /// Start with sound off (toggle in game with M)
    #[arg(long)]
    mute: bool,

    /// Sound effect volume from 0.0 to 1.0
    #[arg(long, default_value_t = AudioManager::DEFAULT_VOLUME)]
    volume: f32,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let seed = cli.seed.unwrap_or_else(rand::random);
    let high_scores = FileHighScoreStore::new(&cli.high_score_file);
    let high_score = high_scores.load();
    log::info!(
        "Starting with seed {seed}, high score {high_score} from {}",
        high_scores.path().display()
    );

    let state = GameState::new(config, high_score, seed);
    let mut audio = AudioManager::new(cli.mute);
    audio.set_volume(cli.volume);

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    log::info!("Keyboard enhancement supported: {supports_keyboard_enhancement}");

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Enable keyboard enhancement AFTER entering alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let input = InputManager::new(supports_keyboard_enhancement);
    let result = App::new(state, input, audio, Box::new(high_scores)).run(&mut terminal);

    // Cleanup
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
