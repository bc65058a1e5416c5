use serenity_core::{Advisor, CompletionProvider, Config, Gender, LlmClient, SessionState, UserProfile};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app::session_log::SessionLogger;
use crate::theme::Theme;

#[derive(Clone, PartialEq, Debug)]
pub enum AppState {
    Editing,
    Busy(&'static str),
    Error(String),
}

/// Everything that can hold keyboard focus, in Tab order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Age,
    Gender,
    Nationality,
    Preferences,
    Message,
    Buttons,
}

impl Field {
    pub const ORDER: [Field; 7] = [
        Field::Name,
        Field::Age,
        Field::Gender,
        Field::Nationality,
        Field::Preferences,
        Field::Message,
        Field::Buttons,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Field {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Field {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FooterAction {
    Send,
    CollectiveAdvice,
    GeneratePrescription,
    Quit,
}

impl FooterAction {
    pub fn label(self) -> &'static str {
        match self {
            FooterAction::Send => " Send ",
            FooterAction::CollectiveAdvice => " Collective Advice ",
            FooterAction::GeneratePrescription => " Generate Prescription ",
            FooterAction::Quit => " Quit ",
        }
    }
}

pub const FOOTER_ACTIONS: [FooterAction; 4] = [
    FooterAction::Send,
    FooterAction::CollectiveAdvice,
    FooterAction::GeneratePrescription,
    FooterAction::Quit,
];

pub struct App {
    pub state: AppState,
    pub config: Config,
    pub theme: Theme,
    pub session: SessionState,
    pub advisor: Advisor,

    // Profile widgets; read fresh into a UserProfile at each action.
    pub name: String,
    pub age_input: String,
    pub gender: Option<Gender>,
    pub nationality: String,
    pub preferences: String,

    pub message: String,
    pub message_cursor: usize,

    pub focus: Field,
    pub footer_focus: usize,

    pub advice: Option<String>,
    pub notice: Option<String>,
    pub last_prescription: Option<PathBuf>,

    pub chat_scroll: u16,
    pub chat_max_scroll: u16,
    pub tick_count: u64,
    pub dirty: bool,
    pub session_logger: SessionLogger,
}

impl App {
    pub fn new(config: Config) -> Self {
        let client = LlmClient::new(
            config.effective_api_key(),
            config.base_url.clone(),
            config.model.clone(),
        );
        Self::with_provider(config, Arc::new(client))
    }

    pub fn with_provider(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        let theme = Theme::from_config(&config.theme);
        let session_logger = SessionLogger::new();
        session_logger.event("START", "Serenity session opened");
        if !config.has_api_key() {
            session_logger.event("WARN", "no API key configured; sends will fail");
        }
        let notice = session_logger
            .display_path()
            .map(|path| format!("Session log: {}", path));

        Self {
            state: AppState::Editing,
            config,
            theme,
            session: SessionState::new(),
            advisor: Advisor::new(provider),
            name: String::new(),
            age_input: String::new(),
            gender: None,
            nationality: String::new(),
            preferences: String::new(),
            message: String::new(),
            message_cursor: 0,
            focus: Field::Name,
            footer_focus: 0,
            advice: None,
            notice,
            last_prescription: None,
            chat_scroll: 0,
            chat_max_scroll: 0,
            tick_count: 0,
            dirty: true,
            session_logger,
        }
    }

    /// Snapshot of the profile widgets at this instant.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            age: self.age_input.trim().parse().ok(),
            gender: self.gender,
            nationality: self.nationality.clone(),
            preferences: self.preferences.clone(),
        }
    }

    pub fn cycle_gender(&mut self) {
        self.gender = Some(match self.gender {
            None | Some(Gender::Other) => Gender::Male,
            Some(Gender::Male) => Gender::Female,
            Some(Gender::Female) => Gender::Other,
        });
        self.dirty = true;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.dirty = true;
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
        self.dirty = true;
    }

    pub fn set_error(&mut self, message: String) {
        self.session_logger.event("ERROR", &message);
        self.state = AppState::Error(message);
        self.dirty = true;
    }

    pub fn set_notice<S: Into<String>>(&mut self, message: S) {
        self.notice = Some(message.into());
        self.dirty = true;
    }

    pub fn clear_error(&mut self) {
        if matches!(self.state, AppState::Error(_)) {
            self.state = AppState::Editing;
            self.dirty = true;
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, AppState::Busy(_))
    }
}
