use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use crate::session::Decision;

/// Phase-enter notification sent to the announcer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// The drill was just launched from the setup screen
    Start,
    Preparation(u32),
    Hold,
    Decision(Decision),
}

impl Cue {
    /// Words spoken for this cue
    pub fn phrase(&self) -> String {
        match self {
            Cue::Start => "Starting.".to_string(),
            Cue::Preparation(arrow) => format!("Arrow {arrow}. Ready."),
            Cue::Hold => "Draw.".to_string(),
            Cue::Decision(Decision::Shoot) => "Shoot!".to_string(),
            Cue::Decision(Decision::LetDown) => "Let down!".to_string(),
        }
    }

    /// Number of terminal bells rung for this cue. Shoot and let down must
    /// sound different so the archer can react without looking.
    pub fn bell_count(&self) -> usize {
        match self {
            Cue::Start => 0,
            Cue::Preparation(_) => 1,
            Cue::Hold => 2,
            Cue::Decision(Decision::Shoot) => 1,
            Cue::Decision(Decision::LetDown) => 3,
        }
    }
}

/// Audio/visual feedback sink. Notifications are fire-and-forget: the drill
/// never waits for an announcement to finish.
pub trait Announcer {
    fn announce(&mut self, cue: Cue);

    fn is_muted(&self) -> bool {
        false
    }

    fn set_muted(&mut self, _muted: bool) {}

    /// Beep and speak a fixed phrase so the user can verify their setup
    fn audio_check(&mut self) {}
}

/// Announcer that discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn announce(&mut self, _cue: Cue) {}

    fn is_muted(&self) -> bool {
        true
    }
}

/// Keeps every cue it receives, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingAnnouncer {
    pub cues: Vec<Cue>,
    pub muted: bool,
    pub audio_checks: usize,
}

impl Announcer for RecordingAnnouncer {
    fn announce(&mut self, cue: Cue) {
        if !self.muted {
            self.cues.push(cue);
        }
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn audio_check(&mut self) {
        self.audio_checks += 1;
    }
}

/// Rings the terminal bell and optionally speaks through an external
/// text-to-speech program such as `espeak` or `say`.
pub struct TerminalAnnouncer<W: Write = io::Stdout> {
    out: W,
    speech_command: Option<String>,
    utterance: Option<Child>,
    muted: bool,
}

impl TerminalAnnouncer<io::Stdout> {
    pub fn new(speech_command: Option<String>, muted: bool) -> Self {
        Self::with_writer(io::stdout(), speech_command, muted)
    }
}

impl<W: Write> TerminalAnnouncer<W> {
    pub fn with_writer(out: W, speech_command: Option<String>, muted: bool) -> Self {
        Self {
            out,
            speech_command: speech_command.filter(|c| !c.trim().is_empty()),
            utterance: None,
            muted,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn has_speech(&self) -> bool {
        self.speech_command.is_some()
    }

    fn ring(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let bells = "\x07".repeat(count);
        if let Err(e) = self
            .out
            .write_all(bells.as_bytes())
            .and_then(|_| self.out.flush())
        {
            log::warn!("failed to ring terminal bell: {e}");
        }
    }

    fn speak(&mut self, text: &str) {
        let Some(command) = self.speech_command.clone() else {
            return;
        };
        // A fresh utterance replaces whatever is still being spoken
        self.cancel_utterance();

        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return;
        };
        match Command::new(program)
            .args(parts)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => self.utterance = Some(child),
            Err(e) => log::warn!("speech command `{command}` failed to start: {e}"),
        }
    }

    fn cancel_utterance(&mut self) {
        if let Some(mut child) = self.utterance.take() {
            // The child may already have exited; either way reap it
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl<W: Write> Announcer for TerminalAnnouncer<W> {
    fn announce(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        self.ring(cue.bell_count());
        self.speak(&cue.phrase());
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        if muted {
            self.cancel_utterance();
        }
        self.muted = muted;
    }

    fn audio_check(&mut self) {
        self.ring(1);
        self.speak("Audio check.");
    }
}

impl<W: Write> Drop for TerminalAnnouncer<W> {
    fn drop(&mut self) {
        self.cancel_utterance();
    }
}
