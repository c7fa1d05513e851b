use archery_mind_trainer::{
    app::{App, AppAction, AppState, CHANNEL_URL},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, DrillEvent, FixedTicker, Runner},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};
use webbrowser::Browser;

/// decision-making drill timer for archers
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Walks you through a set of arrows: a preparation countdown, a fixed hold at full draw, then a randomized SHOOT or LET DOWN command. Trains the decision to release under unpredictable stimulus."
)]
pub struct Cli {
    /// seconds to nock and prepare before drawing
    #[clap(short = 'p', long = "prep")]
    prep_secs: Option<u32>,

    /// seconds to hold at full draw before the command (fractions allowed)
    #[clap(short = 'H', long = "hold")]
    hold_secs: Option<f64>,

    /// chance in percent that the command is SHOOT
    #[clap(short = 's', long = "shoot")]
    shoot_percent: Option<u32>,

    /// number of arrows in the session
    #[clap(short = 'a', long)]
    arrows: Option<u32>,

    /// start with sound off
    #[clap(short = 'm', long)]
    mute: bool,

    /// text-to-speech program used to speak commands, e.g. "espeak" or "say"
    #[clap(long)]
    speech_command: Option<String>,

    /// skip the setup screen and begin the drill immediately
    #[clap(long)]
    start: bool,
}

impl Cli {
    /// Layer command line flags over the remembered settings
    fn apply(&self, mut settings: Config) -> Config {
        if let Some(prep) = self.prep_secs {
            settings.prep_secs = prep;
        }
        if let Some(hold) = self.hold_secs {
            settings.hold_secs = hold;
        }
        if let Some(shoot) = self.shoot_percent {
            settings.shoot_percent = shoot;
        }
        if let Some(arrows) = self.arrows {
            settings.arrows = arrows;
        }
        if self.mute {
            settings.sound = false;
        }
        if let Some(cmd) = &self.speech_command {
            settings.speech_command = Some(cmd.clone());
        }
        settings
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // before loading settings, so a corrupt config file is reported
    logging::init();

    let store = FileConfigStore::new();
    let settings = cli.apply(store.load());
    if let Err(e) = settings.drill().validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }

    let mut app = App::new(settings, Box::new(store));
    if cli.start {
        app.start_drill()?;
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            DrillEvent::Tick(elapsed) => {
                // only the drill screen changes without input
                if app.state != AppState::Active {
                    continue;
                }
                app.on_tick(elapsed);
            }
            DrillEvent::Resize => {}
            DrillEvent::Key(key) => match app.on_key(key) {
                AppAction::Quit => break,
                AppAction::OpenChannel => {
                    if Browser::is_available() {
                        webbrowser::open(CHANNEL_URL).unwrap_or_default();
                    }
                }
                AppAction::Continue => {}
            },
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
