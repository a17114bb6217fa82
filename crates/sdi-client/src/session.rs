//! Session-level UI state: which screen is up, what the status line says,
//! and the latest HUD values.
//!
//! The view is owned by the simulation thread and only the dispatcher and
//! the engine write to it. Presentation code reads it once per frame.
//!
//! ```text
//! Connecting → Waiting { players } → InGame { local_player }
//!      ↘              ↓                      ↙
//!                  Faulted (terminal)
//! ```

use sdi_protocol::HudValues;

/// Status line shown before the server accepts the connection.
pub const CONNECTING_MESSAGE: &str = "Connecting to server...";

/// Which top-level screen presentation should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Start,
    Game,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Connecting,
    /// The server is waiting for `players` more players before it starts.
    Waiting { players: u8 },
    /// The game has started and `local_player` is our entity id.
    InGame { local_player: u32 },
    Faulted,
}

/// How the status line should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub style: MessageStyle,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: MessageStyle::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: MessageStyle::Error,
        }
    }
}

/// Most recent HUD values, as carried by the last INTERFACE packet. All
/// zero until the first one arrives.
pub type HudSnapshot = HudValues;

/// The waiting-room status text, e.g. "Waiting for 2 more players".
pub fn waiting_message(players: u8) -> String {
    let plural = if players == 1 { "" } else { "s" };
    format!("Waiting for {players} more player{plural}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    screen: Screen,
    phase: SessionPhase,
    status: StatusMessage,
    hud: HudSnapshot,
}

impl SessionView {
    pub fn new() -> Self {
        Self {
            screen: Screen::Start,
            phase: SessionPhase::Connecting,
            status: StatusMessage::info(CONNECTING_MESSAGE),
            hud: HudSnapshot::default(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    pub fn hud(&self) -> &HudSnapshot {
        &self.hud
    }

    pub fn is_faulted(&self) -> bool {
        self.phase == SessionPhase::Faulted
    }

    /// Applies a WAITING packet. Ignored once the session is faulted.
    ///
    /// After START only the status text changes; the phase stays in game.
    pub fn set_waiting(&mut self, players: u8) {
        match self.phase {
            SessionPhase::Faulted => return,
            SessionPhase::InGame { .. } => {}
            SessionPhase::Connecting | SessionPhase::Waiting { .. } => {
                self.phase = SessionPhase::Waiting { players };
            }
        }
        self.status = StatusMessage::info(waiting_message(players));
    }

    /// Applies a START packet: switches to the game screen.
    pub fn start_game(&mut self, local_player: u32) {
        if self.is_faulted() {
            return;
        }
        self.phase = SessionPhase::InGame { local_player };
        self.screen = Screen::Game;
    }

    pub fn set_hud(&mut self, hud: HudSnapshot) {
        self.hud = hud;
    }

    /// Enters the terminal faulted phase and shows `message` on the start
    /// screen. Only the first fault is recorded.
    pub fn fault(&mut self, message: impl Into<String>) {
        if self.is_faulted() {
            return;
        }
        self.phase = SessionPhase::Faulted;
        self.screen = Screen::Start;
        self.status = StatusMessage::error(message);
    }
}

impl Default for SessionView {
    fn default() -> Self {
        Self::new()
    }
}
