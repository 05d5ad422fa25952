//! Retro Arcade: four quick mini-games in the terminal.

mod app;
mod background;
mod cache;
mod config;
mod event;
mod games;
mod geometry;
mod input;
mod scores;
mod session;
mod ui;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use cache::{HttpFetcher, OfflineCache, Source};
use config::Config;
use event::{Event, EventHandler};
use games::GameKind;
use scores::{HttpScoreReporter, LogOnlyReporter, ScoreReporter};

/// Retro Arcade - four quick mini-games in your terminal
#[derive(Parser)]
#[command(name = "retroarcade", version)]
#[command(about = "Four quick mini-games in your terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to <config dir>/retroarcade/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Score server base URL
    #[arg(short, long)]
    server: Option<String>,

    /// Player name shown in the arcade
    #[arg(short, long)]
    player: Option<String>,

    /// Keep scores local; do not post them to the server
    #[arg(long)]
    no_submit: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the arcade, optionally straight into one game
    Play {
        #[arg(value_enum)]
        game: Option<GameKind>,
    },

    /// Manage the offline asset cache
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Fetch and store the asset list
    Install,
    /// Print a resource, from the cache when stored
    Get { path: String },
    /// List stored resources
    List,
}

/// Restore terminal state - called on panic or unexpected exit
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Logs go to a file; stdout belongs to the TUI. `RUST_LOG` overrides the
/// configured level.
fn init_logging(config: &Config) -> Result<()> {
    let path = config.log_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = File::create(&path).with_context(|| format!("opening log file {}", path.display()))?;

    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&config.log_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(server) = &cli.server {
        config.server_url = server.clone();
    }
    if let Some(player) = &cli.player {
        config.player_name = Some(player.clone());
    }
    if cli.no_submit {
        config.submit_scores = false;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config)?;
    log::info!("retroarcade {} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Cache { action }) => run_cache(&config, action),
        Some(Commands::Play { game }) => run_arcade(&config, game),
        None => run_arcade(&config, None),
    }
}

fn run_cache(config: &Config, action: CacheCommands) -> Result<()> {
    let cache = OfflineCache::open(&config.cache, HttpFetcher::new(&config.server_url))?;
    match action {
        CacheCommands::Install => {
            let count = cache.install()?;
            println!("Installed {} assets into {}", count, cache.root().display());
        }
        CacheCommands::Get { path } => {
            let resource = cache.respond(&path)?;
            if resource.source == Source::Network {
                log::info!("{} served from network", path);
            }
            io::stdout().write_all(&resource.body)?;
        }
        CacheCommands::List => {
            for path in cache.list()? {
                println!("{}", path);
            }
        }
    }
    Ok(())
}

fn run_arcade(config: &Config, game: Option<GameKind>) -> Result<()> {
    // Set up panic hook to restore terminal state
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let reporter: Box<dyn ScoreReporter> = if config.submit_scores {
        let reporter = HttpScoreReporter::new(&config.server_url);
        log::info!("submitting scores to {}", reporter.endpoint());
        Box::new(reporter)
    } else {
        Box::new(LogOnlyReporter)
    };
    let mut app = App::new(config, reporter);
    if let Some(kind) = game {
        app.open(kind);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut app, config.tick_rate_ms);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate_ms: u64,
) -> Result<()> {
    let clock = FrameClock::new();
    let event_handler = EventHandler::new(tick_rate_ms);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next()? {
            Event::Tick => app.on_tick(clock.now()),
            Event::Key(key) => app.on_key(key, clock.now()),
            Event::Mouse(mouse) => app.on_mouse(mouse, clock.now()),
            Event::Resize(w, h) => log::debug!("terminal resized to {}x{}", w, h),
        }

        if app.should_quit {
            log::info!("quitting");
            return Ok(());
        }
    }
}

/// Monotonic time since the arcade opened; every game timestamp is relative
/// to it.
struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_play_and_flags() {
        let cli = Cli::try_parse_from([
            "retroarcade",
            "--server",
            "http://arcade.local",
            "--no-submit",
            "play",
            "shooter",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://arcade.local"));
        assert!(cli.no_submit);
        assert!(matches!(
            cli.command,
            Some(Commands::Play {
                game: Some(GameKind::Shooter)
            })
        ));
    }

    #[test]
    fn test_cli_parses_cache_get() {
        let cli = Cli::try_parse_from(["retroarcade", "cache", "get", "/static/style.css"]).unwrap();
        match cli.command {
            Some(Commands::Cache {
                action: CacheCommands::Get { path },
            }) => assert_eq!(path, "/static/style.css"),
            _ => panic!("expected cache get"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_game() {
        assert!(Cli::try_parse_from(["retroarcade", "play", "pinball"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server_url = \"http://from-file\"\n").unwrap();
        let cli = Cli::try_parse_from([
            "retroarcade",
            "--config",
            path.to_str().unwrap(),
            "--player",
            "Ada_1",
            "--no-submit",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.server_url, "http://from-file");
        assert_eq!(config.player_name.as_deref(), Some("Ada_1"));
        assert!(!config.submit_scores);

        let bad = Cli::try_parse_from([
            "retroarcade",
            "--config",
            path.to_str().unwrap(),
            "--player",
            "no/slashes",
        ])
        .unwrap();
        assert!(load_config(&bad).is_err());
    }

    #[test]
    fn test_frame_clock_is_monotonic() {
        let clock = FrameClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
