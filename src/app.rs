use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::announcer::{Announcer, Cue, TerminalAnnouncer};
use crate::config::{Config, ConfigStore};
use crate::drill::{DrillSession, TickOutcome};
use crate::error::DrillError;
use crate::session::{DrillResult, DrillSnapshot, ResultSummary};
use crate::setup::SetupForm;

pub const CHANNEL_URL: &str = "https://www.youtube.com/@archerylove";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Active,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    Aborted,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    OpenChannel,
    Quit,
}

/// Everything the screens need: setup form, the running drill and the last
/// result log.
pub struct App<A: Announcer = TerminalAnnouncer, R: Rng = ThreadRng> {
    pub state: AppState,
    pub form: SetupForm,
    pub settings: Config,
    pub snapshot: Option<DrillSnapshot>,
    pub results: Vec<DrillResult>,
    pub session_end: Option<SessionEnd>,
    /// Highlighted row of the summary table
    pub summary_selected: usize,
    pub status: Option<String>,
    store: Box<dyn ConfigStore>,
    // parked here between sessions, lent to the drill while one runs
    announcer: Option<A>,
    rng: Option<R>,
    session: Option<DrillSession<A, R>>,
}

impl App<TerminalAnnouncer, ThreadRng> {
    pub fn new(settings: Config, store: Box<dyn ConfigStore>) -> Self {
        let announcer = TerminalAnnouncer::new(settings.speech_command.clone(), !settings.sound);
        Self::with_parts(settings, store, announcer, rand::thread_rng())
    }
}

impl<A: Announcer, R: Rng> App<A, R> {
    pub fn with_parts(settings: Config, store: Box<dyn ConfigStore>, announcer: A, rng: R) -> Self {
        Self {
            state: AppState::Setup,
            form: SetupForm::new(settings.drill()),
            settings,
            snapshot: None,
            results: Vec::new(),
            session_end: None,
            summary_selected: 0,
            status: None,
            store,
            announcer: Some(announcer),
            rng: Some(rng),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&DrillSession<A, R>> {
        self.session.as_ref()
    }

    pub fn sound_enabled(&self) -> bool {
        self.settings.sound
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_results(&self.results)
    }

    /// Start a drill with the settings currently in the setup form.
    pub fn start_drill(&mut self) -> Result<(), DrillError> {
        let drill = self.form.config;
        drill.validate()?;

        let (Some(mut announcer), Some(rng)) = (self.announcer.take(), self.rng.take()) else {
            // a session is already running
            return Ok(());
        };
        announcer.announce(Cue::Start);

        self.settings.set_drill(&drill);
        if let Err(e) = self.store.save(&self.settings) {
            log::warn!("could not save settings: {e}");
        }

        let session = DrillSession::start(drill, announcer, rng)?;
        self.snapshot = Some(session.snapshot());
        self.session = Some(session);
        self.results.clear();
        self.session_end = None;
        self.status = None;
        self.state = AppState::Active;
        Ok(())
    }

    /// Feed elapsed wall-clock time to the running drill
    pub fn on_tick(&mut self, elapsed: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.tick(elapsed) {
            TickOutcome::Running(snapshot) => self.snapshot = Some(snapshot),
            TickOutcome::Completed(results) => self.finish(results, SessionEnd::Completed),
            TickOutcome::Ignored => {}
        }
    }

    pub fn abort_drill(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let results = session.abort();
            self.finish(results, SessionEnd::Aborted);
        }
    }

    /// Show `results` on the summary screen and take back the parts lent to the drill
    fn finish(&mut self, results: Vec<DrillResult>, end: SessionEnd) {
        if let Some(session) = self.session.take() {
            self.snapshot = Some(session.snapshot());
            let (_, announcer, rng) = session.into_parts();
            self.announcer = Some(announcer);
            self.rng = Some(rng);
        }
        self.results = results;
        self.summary_selected = 0;
        self.session_end = Some(end);
        self.state = AppState::Summary;
    }

    fn select_result(&mut self, delta: isize) {
        let last = self.results.len().saturating_sub(1);
        self.summary_selected = self
            .summary_selected
            .saturating_add_signed(delta)
            .min(last);
    }

    pub fn toggle_sound(&mut self) {
        self.settings.sound = !self.settings.sound;
        let muted = !self.settings.sound;
        if let Some(session) = self.session.as_mut() {
            session.announcer_mut().set_muted(muted);
        } else if let Some(announcer) = self.announcer.as_mut() {
            announcer.set_muted(muted);
        }
    }

    pub fn audio_check(&mut self) {
        if let Some(announcer) = self.announcer.as_mut() {
            announcer.audio_check();
        }
    }

    /// Return to the setup screen keeping the last used settings
    pub fn new_session(&mut self) {
        self.form = SetupForm::new(self.settings.drill());
        self.snapshot = None;
        self.state = AppState::Setup;
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.abort_drill();
            return AppAction::Quit;
        }

        match self.state {
            AppState::Setup => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return AppAction::Quit,
                KeyCode::Up | KeyCode::Char('k') => self.form.select_prev(),
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.form.select_next(),
                KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => self.form.decrease(),
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => self.form.increase(),
                KeyCode::Char('t') => self.audio_check(),
                KeyCode::Char('m') => self.toggle_sound(),
                KeyCode::Char('y') => return AppAction::OpenChannel,
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if let Err(e) = self.start_drill() {
                        self.status = Some(e.to_string());
                    }
                }
                _ => {}
            },
            AppState::Active => match key.code {
                KeyCode::Esc | KeyCode::Char('a') => self.abort_drill(),
                KeyCode::Char('m') => self.toggle_sound(),
                _ => {}
            },
            AppState::Summary => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return AppAction::Quit,
                KeyCode::Enter | KeyCode::Char('n') => self.new_session(),
                KeyCode::Up | KeyCode::Char('k') => self.select_result(-1),
                KeyCode::Down | KeyCode::Char('j') => self.select_result(1),
                KeyCode::PageUp => self.select_result(-10),
                KeyCode::PageDown => self.select_result(10),
                KeyCode::Home | KeyCode::Char('g') => self.summary_selected = 0,
                KeyCode::End | KeyCode::Char('G') => self.select_result(isize::MAX),
                _ => {}
            },
        }
        AppAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcer::RecordingAnnouncer;
    use crate::config::MemoryConfigStore;
    use crate::session::{Decision, Phase};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app(settings: Config) -> App<RecordingAnnouncer, StdRng> {
        App::with_parts(
            settings,
            Box::new(MemoryConfigStore::default()),
            RecordingAnnouncer::default(),
            StdRng::seed_from_u64(3),
        )
    }

    fn quick_settings() -> Config {
        Config {
            prep_secs: 1,
            hold_secs: 1.0,
            shoot_percent: 100,
            arrows: 2,
            ..Config::default()
        }
    }

    #[test]
    fn starts_on_setup_screen() {
        let app = test_app(Config::default());
        assert_eq!(app.state, AppState::Setup);
        assert_eq!(app.form.config, Config::default().drill());
        assert!(app.session().is_none());
    }

    #[test]
    fn enter_starts_a_drill() {
        let mut app = test_app(quick_settings());
        assert_eq!(app.on_key(key(KeyCode::Enter)), AppAction::Continue);
        assert_eq!(app.state, AppState::Active);

        let session = app.session().expect("running session");
        assert_eq!(session.phase(), Phase::Preparation);
        assert_eq!(
            session.announcer().cues,
            vec![Cue::Start, Cue::Preparation(1)]
        );
        assert_eq!(app.snapshot.map(|s| s.arrow), Some(1));
    }

    #[test]
    fn invalid_settings_stay_on_setup_with_message() {
        let mut app = test_app(Config {
            shoot_percent: 150,
            ..Config::default()
        });
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Setup);
        assert!(app
            .status
            .as_deref()
            .is_some_and(|s| s.contains("shoot_percent")));
    }

    #[test]
    fn ticks_run_drill_to_summary() {
        let mut app = test_app(quick_settings());
        app.start_drill().unwrap();
        for _ in 0..200 {
            app.on_tick(Duration::from_millis(100));
        }
        assert_eq!(app.state, AppState::Summary);
        assert_eq!(app.session_end, Some(SessionEnd::Completed));
        assert_eq!(app.results.len(), 2);
        assert!(app.results.iter().all(|r| r.decision == Decision::Shoot));
        assert_eq!(app.summary().shots, 2);
        assert!(app.session().is_none());
    }

    #[test]
    fn escape_aborts_active_drill() {
        let mut app = test_app(quick_settings());
        app.start_drill().unwrap();
        app.on_tick(Duration::from_secs(1));
        assert_eq!(app.on_key(key(KeyCode::Esc)), AppAction::Continue);
        assert_eq!(app.state, AppState::Summary);
        assert_eq!(app.session_end, Some(SessionEnd::Aborted));
        assert!(app.results.is_empty());
    }

    #[test]
    fn summary_shows_the_log_the_session_handed_back() {
        let mut app = test_app(quick_settings());
        app.start_drill().unwrap();
        // arrow 1 reaches its command, arrow 2 is in its hold
        for _ in 0..5 {
            app.on_tick(Duration::from_secs(1));
        }
        assert_eq!(app.snapshot.map(|s| s.arrow), Some(2));

        let expected = app.session().unwrap().results().to_vec();
        app.abort_drill();
        assert_eq!(app.results, expected);
        assert_eq!(app.results.len(), 1);
        assert!(app.announcer.is_some() && app.rng.is_some());
    }

    #[test]
    fn summary_keys_move_through_long_logs() {
        let settings = Config {
            arrows: 40,
            hold_secs: 0.0,
            ..quick_settings()
        };
        let mut app = test_app(settings);
        app.start_drill().unwrap();
        for _ in 0..1_000 {
            app.on_tick(Duration::from_secs(1));
        }
        assert_eq!(app.state, AppState::Summary);
        assert_eq!(app.results.len(), 40);
        assert_eq!(app.summary_selected, 0);

        app.on_key(key(KeyCode::Up));
        assert_eq!(app.summary_selected, 0);
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Char('j')));
        assert_eq!(app.summary_selected, 2);
        app.on_key(key(KeyCode::PageDown));
        assert_eq!(app.summary_selected, 12);
        app.on_key(key(KeyCode::End));
        assert_eq!(app.summary_selected, 39);
        app.on_key(key(KeyCode::Down));
        assert_eq!(app.summary_selected, 39);
        app.on_key(key(KeyCode::Char('k')));
        assert_eq!(app.summary_selected, 38);
        app.on_key(key(KeyCode::Home));
        assert_eq!(app.summary_selected, 0);
    }

    #[test]
    fn empty_summary_keeps_selection_at_top() {
        let mut app = test_app(quick_settings());
        app.start_drill().unwrap();
        app.abort_drill();
        app.on_key(key(KeyCode::End));
        app.on_key(key(KeyCode::Down));
        assert_eq!(app.summary_selected, 0);
    }

    #[test]
    fn new_session_reuses_announcer_and_settings() {
        let mut app = test_app(quick_settings());
        app.start_drill().unwrap();
        app.abort_drill();
        app.on_key(key(KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Setup);
        assert_eq!(app.form.config, quick_settings().drill());

        app.start_drill().unwrap();
        assert_eq!(app.state, AppState::Active);
        // the same announcer heard both session starts
        assert_eq!(
            app.session().unwrap().announcer().cues,
            vec![
                Cue::Start,
                Cue::Preparation(1),
                Cue::Start,
                Cue::Preparation(1)
            ]
        );
    }

    #[test]
    fn sound_toggle_reaches_running_announcer() {
        let mut app = test_app(quick_settings());
        app.start_drill().unwrap();
        app.on_key(key(KeyCode::Char('m')));
        assert!(!app.sound_enabled());
        assert!(app.session().unwrap().announcer().is_muted());

        app.on_tick(Duration::from_secs(1));
        assert_eq!(app.session().unwrap().announcer().cues.len(), 2);
    }

    #[test]
    fn setup_keys_edit_form() {
        let mut app = test_app(Config::default());
        app.on_key(key(KeyCode::Right));
        assert_eq!(app.form.config.prep_secs, 11);
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Left));
        assert_eq!(app.form.config.hold_secs, 3.5);
        app.on_key(key(KeyCode::Char('t')));
        assert_eq!(app.announcer.as_ref().unwrap().audio_checks, 1);
        assert_eq!(app.on_key(key(KeyCode::Char('y'))), AppAction::OpenChannel);
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let mut app = test_app(quick_settings());
        app.start_drill().unwrap();
        let action = app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(action, AppAction::Quit);
        assert_eq!(app.session_end, Some(SessionEnd::Aborted));
    }

    #[test]
    fn starting_saves_settings() {
        let mut app = test_app(quick_settings());
        app.form.config.arrows = 8;
        app.start_drill().unwrap();
        assert_eq!(app.settings.arrows, 8);
        assert_eq!(app.store.load().arrows, 8);
    }
}
