use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
};
use votebox::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    error::SetupError,
    markup::{self, PollDefinition},
    runtime::{CrosstermEventSource, Runner},
    ui,
};

/// single-choice polls in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Vote in single-choice polls under a local name, watch the percentages move and open each poll's votes panel to see who picked what. Nothing is stored: votes live as long as the program runs."
)]
pub struct Cli {
    /// markup (<poll pollTitle=".." items="a|b">) or JSON file with poll definitions
    #[clap(short = 'd', long)]
    definitions: Option<PathBuf>,

    /// inline poll definition as TITLE=ITEM|ITEM, may be repeated
    #[clap(short = 'p', long = "poll")]
    polls: Vec<String>,

    /// bundled definitions to use when no file or inline poll is given
    #[clap(long)]
    demo: Option<String>,

    /// sign in with this name at start-up
    #[clap(short = 'u', long)]
    user: Option<String>,

    /// do not capture the mouse
    #[clap(long)]
    no_mouse: bool,

    /// write logs to the default state directory
    #[clap(long)]
    log: bool,

    /// write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// parse the definitions, print them and exit
    #[clap(long)]
    check: bool,

    /// store the effective definitions/demo/user/mouse options as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags layered over the stored configuration
    fn merge(&self, stored: Config) -> Config {
        Config {
            definitions: self.definitions.clone().or(stored.definitions),
            demo: self.demo.clone().unwrap_or(stored.demo),
            user: self.user.clone().or(stored.user),
            mouse: stored.mouse && !self.no_mouse,
        }
    }

    fn log_path(&self) -> Option<PathBuf> {
        match (&self.log_file, self.log) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => AppDirs::log_path(),
            (None, false) => None,
        }
    }
}

/// Inline polls win over a definitions file, which wins over the bundled demo.
fn resolve_definitions(cli: &Cli, config: &Config) -> Result<Vec<PollDefinition>, SetupError> {
    if !cli.polls.is_empty() {
        return cli.polls.iter().map(|arg| markup::parse_inline(arg)).collect();
    }
    match &config.definitions {
        Some(path) => markup::load_file(path),
        None => markup::load_demo(&config.demo),
    }
}

fn init_logging(path: Option<PathBuf>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_path())?;

    let store = FileConfigStore::new();
    let config = cli.merge(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!("saved config to {}", store.path().display());
    }

    let definitions = match resolve_definitions(&cli, &config) {
        Ok(definitions) => definitions,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e).exit()
        }
    };

    if cli.check {
        println!(
            "{}",
            definitions.iter().map(PollDefinition::summary).join("\n")
        );
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(&definitions).with_user(config.user.as_deref().unwrap_or_default());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    if config.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new());
    runner.run(app, |app| terminal.draw(|f| ui::draw(app, f)).map(|_| ()))?;
    Ok(())
}
