/*!
Per-conversation toggle for the secure session.

In toggleable mode the choice is remembered in the host's preference store
under `<root>/conversation/<name>/enabled` and restored when the button is
created. In one-shot mode the button ("Go secure") starts the session once and
removes itself.
*/

mod prefs;

pub use prefs::{MemoryPreferences, Preferences};

use std::fmt;
use std::sync::Arc;

/// Label of the button in toggleable mode.
pub const TOGGLE_LABEL: &str = "Toggle encryption";
/// Label of the button in one-shot mode.
pub const ONE_SHOT_LABEL: &str = "Go secure";

const DEFAULT_PREFS_ROOT: &str = "/partyline";

/// A secure session for one conversation. Dropping it stops it.
pub trait SecureSession {
  /// Begin the secure exchange with the other participants.
  fn start(&mut self);
}

/// Opens sessions for conversations.
pub trait SessionFactory {
  /// Session type handed out.
  type Session: SecureSession;

  /// Create a session for `conversation`, not yet started.
  fn open(&self, conversation: &str) -> Self::Session;
}

/// How the button behaves on click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleMode {
  /// Each click flips the session on or off and remembers the choice.
  #[default]
  Toggleable,
  /// The first click starts the session and removes the button.
  OneShot,
}

/// Toggle button configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleConfig {
  /// Click behavior. Default: [`ToggleMode::Toggleable`].
  pub mode: ToggleMode,
  /// Preference subtree owned by this plugin. Default: `/partyline`.
  pub prefs_root: String,
}

impl Default for ToggleConfig {
  fn default() -> Self {
    Self {
      mode: ToggleMode::default(),
      prefs_root: DEFAULT_PREFS_ROOT.to_owned(),
    }
  }
}

/// The toggle button of one conversation window.
pub struct ToggleButton<F: SessionFactory> {
  conversation: String,
  config: ToggleConfig,
  prefs: Arc<dyn Preferences>,
  factory: F,
  session: Option<F::Session>,
  /// Label of the button while it is shown.
  button: Option<&'static str>,
}

impl<F: SessionFactory> fmt::Debug for ToggleButton<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ToggleButton")
      .field("conversation", &self.conversation)
      .field("config", &self.config)
      .field("enabled", &self.session.is_some())
      .field("button", &self.button)
      .finish_non_exhaustive()
  }
}

impl<F: SessionFactory> ToggleButton<F> {
  /// Show the button for `conversation`.
  ///
  /// In toggleable mode this creates the preference nodes if missing and, if
  /// the stored choice is on, starts the session right away.
  pub fn new(
    conversation: impl Into<String>,
    prefs: Arc<dyn Preferences>,
    factory: F,
    config: ToggleConfig,
  ) -> Self {
    let mut button = Self {
      conversation: conversation.into(),
      button: Some(match config.mode {
        ToggleMode::Toggleable => TOGGLE_LABEL,
        ToggleMode::OneShot => ONE_SHOT_LABEL,
      }),
      config,
      prefs,
      factory,
      session: None,
    };

    if button.config.mode == ToggleMode::Toggleable {
      button.ensure_pref_nodes();
      if button.prefs.get_bool(&button.enabled_key()) {
        button.enable();
      }
    }
    button
  }

  fn conversation_key(&self) -> String {
    format!("{}/conversation/{}", self.config.prefs_root, self.conversation)
  }

  /// Preference path holding the remembered choice.
  pub fn enabled_key(&self) -> String {
    format!("{}/enabled", self.conversation_key())
  }

  fn ensure_pref_nodes(&self) {
    let root = &self.config.prefs_root;
    for path in [
      root.clone(),
      format!("{root}/conversation"),
      self.conversation_key(),
    ] {
      if !self.prefs.exists(&path) {
        self.prefs.add_none(&path);
      }
    }
  }

  /// Handle a click on the button. No-op once a one-shot button is gone.
  pub fn click(&mut self) {
    if self.button.is_none() {
      log::debug!("click on removed button for {}", self.conversation);
      return;
    }

    match self.config.mode {
      ToggleMode::Toggleable => {
        let enable = self.session.is_none();
        self.prefs.set_bool(&self.enabled_key(), enable);
        if enable {
          self.enable();
        } else {
          self.disable();
        }
      }
      ToggleMode::OneShot => {
        self.button = None;
        self.enable();
      }
    }
  }

  fn enable(&mut self) {
    log::debug!("starting secure session for {}", self.conversation);
    let mut session = self.factory.open(&self.conversation);
    session.start();
    self.session = Some(session);
  }

  fn disable(&mut self) {
    log::debug!("stopping secure session for {}", self.conversation);
    self.session = None;
  }

  /// Name of the conversation this button belongs to.
  pub fn conversation(&self) -> &str {
    &self.conversation
  }

  /// Whether a secure session is running.
  pub const fn is_enabled(&self) -> bool {
    self.session.is_some()
  }

  /// The running session, if any.
  pub const fn session(&self) -> Option<&F::Session> {
    self.session.as_ref()
  }

  /// Label of the button, `None` once a one-shot button removed itself.
  pub const fn button_label(&self) -> Option<&'static str> {
    self.button
  }
}
