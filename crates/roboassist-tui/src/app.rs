//! Application state and update logic for the roboassist TUI.
//!
//! The app never performs I/O itself. Actions that need the network
//! return a [`Command`]; the run loop executes it and feeds the result
//! back as a [`Completion`].

use crate::event::Action;
use crate::ui::widgets::TextInputState;
use roboassist_engine::{
    ApiError, ChatReply, ChatbotPanel, ChatbotState, CommunityMessage, CommunityPanel, EntryId,
    Panel, PendingChat, PostOutcome, PostResolution,
};
use std::cell::Cell;

/// Lines moved by one scroll step.
const SCROLL_STEP: usize = 5;

/// Which panel receives typing and Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Chatbot,
    Community,
}

impl Focus {
    fn toggle(self) -> Self {
        match self {
            Self::Chatbot => Self::Community,
            Self::Community => Self::Chatbot,
        }
    }
}

/// Network work requested by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SendChat(PendingChat),
    PostCommunity(String),
    RefreshCommunity,
}

/// Result of a [`Command`], handed back to the app.
#[derive(Debug)]
pub enum Completion {
    Chat {
        placeholder: EntryId,
        result: Result<ChatReply, ApiError>,
    },
    Posted(PostOutcome),
    Refreshed(Result<Vec<CommunityMessage>, ApiError>),
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Panel with keyboard focus.
    pub focus: Focus,

    /// Chatbot panel.
    pub chatbot: ChatbotPanel,

    /// Community panel.
    pub community: CommunityPanel,

    /// Input under the chatbot panel.
    pub chat_input: TextInputState,

    /// Input under the community panel.
    pub community_input: TextInputState,

    /// Blocking alert; while set, the next key only dismisses it.
    pub alert: Option<&'static str>,

    /// Backend root, shown in the status bar.
    pub base_url: String,

    /// Tick counter for animations.
    pub tick: usize,

    /// Furthest each panel could scroll back at the last render.
    pub(crate) chat_max_scroll: Cell<usize>,
    pub(crate) community_max_scroll: Cell<usize>,
}

impl App {
    /// Create a new app instance.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            focus: Focus::default(),
            chatbot: ChatbotPanel::new(),
            community: CommunityPanel::new(),
            chat_input: TextInputState::new(),
            community_input: TextInputState::new(),
            alert: None,
            base_url: base_url.into(),
            tick: 0,
            chat_max_scroll: Cell::new(0),
            community_max_scroll: Cell::new(0),
        }
    }

    /// Work to do once at start-up: the initial community load.
    pub fn startup(&mut self) -> Command {
        self.community.begin_refresh();
        Command::RefreshCommunity
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Handle an action, returning any network work it triggers.
    pub fn handle_action(&mut self, action: Action) -> Option<Command> {
        if action == Action::None {
            return None;
        }

        // Any key dismisses the alert and does nothing else
        if self.alert.is_some() {
            self.alert = None;
            return None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Submit => self.submit(),
            Action::FocusNext | Action::FocusPrev => {
                self.focus = self.focus.toggle();
                None
            }
            Action::ScrollUp => {
                let limit = self.focused_max_scroll();
                self.focused_panel_mut().scroll_up(SCROLL_STEP, limit);
                None
            }
            Action::ScrollDown => {
                self.focused_panel_mut().scroll_down(SCROLL_STEP);
                None
            }
            _ => {
                self.edit_input(action);
                None
            }
        }
    }

    /// Handle a mouse-wheel scroll. An alert only closes on a key, so the
    /// wheel does nothing while one is up.
    pub fn handle_wheel(&mut self, action: Action) {
        if self.alert.is_none() {
            self.handle_action(action);
        }
    }

    fn edit_input(&mut self, action: Action) {
        let input = self.focused_input_mut();
        match action {
            Action::Insert(c) => input.insert(c),
            Action::Backspace => input.backspace(),
            Action::Delete => input.delete(),
            Action::Left => input.move_left(),
            Action::Right => input.move_right(),
            Action::Home => input.move_home(),
            Action::End => input.move_end(),
            Action::HistoryPrev => input.history_prev(),
            Action::HistoryNext => input.history_next(),
            _ => {}
        }
    }

    fn submit(&mut self) -> Option<Command> {
        match self.focus {
            Focus::Chatbot => {
                let pending = self.chatbot.begin(self.chat_input.content())?;
                self.chat_input.remember();
                self.chat_input.clear();
                Some(Command::SendChat(pending))
            }
            Focus::Community => {
                let message = self.community.begin_post(self.community_input.content())?;
                self.community_input.remember();
                Some(Command::PostCommunity(message))
            }
        }
    }

    /// Apply the result of a finished command.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Chat {
                placeholder,
                result,
            } => self.chatbot.complete(placeholder, result),
            Completion::Posted(outcome) => match self.community.complete_post(outcome) {
                PostResolution::ClearInput => self.community_input.clear(),
                PostResolution::Alert(text) => self.alert = Some(text),
            },
            Completion::Refreshed(result) => self.community.apply_refresh(result),
        }
    }

    /// Short description of outstanding work, for the status bar.
    pub fn activity(&self) -> Option<&'static str> {
        if self.chatbot.state() == ChatbotState::Sending {
            Some("waiting for chatbot")
        } else if self.community.is_busy() {
            Some("syncing community")
        } else {
            None
        }
    }

    fn focused_panel_mut(&mut self) -> &mut Panel {
        match self.focus {
            Focus::Chatbot => self.chatbot.panel_mut(),
            Focus::Community => self.community.panel_mut(),
        }
    }

    fn focused_max_scroll(&self) -> usize {
        match self.focus {
            Focus::Chatbot => self.chat_max_scroll.get(),
            Focus::Community => self.community_max_scroll.get(),
        }
    }

    fn focused_input_mut(&mut self) -> &mut TextInputState {
        match self.focus {
            Focus::Chatbot => &mut self.chat_input,
            Focus::Community => &mut self.community_input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roboassist_engine::{
        EntryKind, CHAT_ERROR_TEXT, LOAD_ERROR_TEXT, POST_FAILED_ALERT, THINKING_TEXT,
    };

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle_action(Action::Insert(c)), None);
        }
    }

    fn decode_error() -> ApiError {
        ApiError::Decode(serde_json::from_str::<ChatReply>("").unwrap_err())
    }

    #[test]
    fn test_startup_requests_refresh() {
        let mut app = App::new("http://127.0.0.1:5000");
        assert_eq!(app.startup(), Command::RefreshCommunity);
        assert_eq!(app.activity(), Some("syncing community"));

        app.apply(Completion::Refreshed(Ok(vec![CommunityMessage::new("hi")])));
        assert_eq!(app.community.panel().texts(), vec!["hi"]);
        assert_eq!(app.activity(), None);
    }

    #[test]
    fn test_community_send_during_startup_refresh() {
        let mut app = App::new("http://x");
        app.startup();
        app.handle_action(Action::FocusNext);
        type_text(&mut app, "hello");

        assert_eq!(
            app.handle_action(Action::Submit),
            Some(Command::PostCommunity("hello".into()))
        );

        // The slow start-up load lands first, then the post resolves
        app.apply(Completion::Refreshed(Ok(vec![])));
        assert_eq!(app.activity(), Some("syncing community"));
        app.apply(Completion::Posted(PostOutcome::Posted(Ok(vec![
            CommunityMessage::new("hello"),
        ]))));
        assert_eq!(app.community.panel().texts(), vec!["hello"]);
        assert!(app.community_input.is_empty());
        assert_eq!(app.activity(), None);
    }

    #[test]
    fn test_wheel_does_not_dismiss_alert() {
        let mut app = App::new("http://x");
        app.chatbot.panel_mut().append("x", EntryKind::User);
        app.chat_max_scroll.set(10);
        app.alert = Some(POST_FAILED_ALERT);

        app.handle_wheel(Action::ScrollUp);
        assert_eq!(app.alert, Some(POST_FAILED_ALERT));
        assert_eq!(app.chatbot.panel().scroll_back(), 0);

        app.alert = None;
        app.handle_wheel(Action::ScrollUp);
        assert_eq!(app.chatbot.panel().scroll_back(), SCROLL_STEP);
    }

    #[test]
    fn test_blank_chat_submit_does_nothing() {
        let mut app = App::new("http://x");
        type_text(&mut app, "   ");
        assert_eq!(app.handle_action(Action::Submit), None);
        assert!(app.chatbot.panel().is_empty());
        assert_eq!(app.chat_input.content(), "   ");
    }

    #[test]
    fn test_chat_submit_clears_input_and_shows_placeholder() {
        let mut app = App::new("http://x");
        type_text(&mut app, "hello");

        let Some(Command::SendChat(pending)) = app.handle_action(Action::Submit) else {
            panic!("expected a chat command");
        };
        assert_eq!(pending.query, "hello");
        assert!(app.chat_input.is_empty());
        assert_eq!(app.chatbot.panel().texts(), vec!["hello", THINKING_TEXT]);
        assert_eq!(app.activity(), Some("waiting for chatbot"));

        app.apply(Completion::Chat {
            placeholder: pending.placeholder,
            result: Err(decode_error()),
        });
        assert_eq!(app.chatbot.panel().texts(), vec!["hello", CHAT_ERROR_TEXT]);
        assert_eq!(app.activity(), None);
    }

    #[test]
    fn test_community_success_clears_input() {
        let mut app = App::new("http://x");
        app.handle_action(Action::FocusNext);
        type_text(&mut app, "hi all");

        assert_eq!(
            app.handle_action(Action::Submit),
            Some(Command::PostCommunity("hi all".into()))
        );
        // Input stays until the post resolves
        assert_eq!(app.community_input.content(), "hi all");

        app.apply(Completion::Posted(PostOutcome::Posted(Ok(vec![
            CommunityMessage::new("hi all"),
        ]))));
        assert!(app.community_input.is_empty());
        assert_eq!(app.community.panel().texts(), vec!["hi all"]);
    }

    #[test]
    fn test_community_failure_raises_alert_and_keeps_input() {
        let mut app = App::new("http://x");
        app.apply(Completion::Refreshed(Ok(vec![CommunityMessage::new("old")])));
        app.focus = Focus::Community;
        type_text(&mut app, "retry me");
        app.handle_action(Action::Submit);

        app.apply(Completion::Posted(PostOutcome::Rejected(None)));
        assert_eq!(app.alert, Some(POST_FAILED_ALERT));
        assert_eq!(app.community_input.content(), "retry me");
        assert_eq!(app.community.panel().texts(), vec!["old"]);

        // The next key only dismisses the alert
        assert_eq!(app.handle_action(Action::Insert('x')), None);
        assert_eq!(app.alert, None);
        assert_eq!(app.community_input.content(), "retry me");
    }

    #[test]
    fn test_quit_while_alert_only_dismisses() {
        let mut app = App::new("http://x");
        app.alert = Some(POST_FAILED_ALERT);
        app.handle_action(Action::Quit);
        assert!(!app.should_quit);
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_focus_routes_typing() {
        let mut app = App::new("http://x");
        type_text(&mut app, "a");
        app.handle_action(Action::FocusPrev);
        type_text(&mut app, "b");
        app.handle_action(Action::FocusNext);
        type_text(&mut app, "c");

        assert_eq!(app.chat_input.content(), "ac");
        assert_eq!(app.community_input.content(), "b");
    }

    #[test]
    fn test_scroll_uses_last_render_limit() {
        let mut app = App::new("http://x");
        app.chatbot.panel_mut().append("x", EntryKind::User);
        app.chat_max_scroll.set(3);

        app.handle_action(Action::ScrollUp);
        assert_eq!(app.chatbot.panel().scroll_back(), 3);
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.chatbot.panel().scroll_back(), 0);
    }

    #[test]
    fn test_failed_refresh_shows_error_entry() {
        let mut app = App::new("http://x");
        app.startup();
        app.apply(Completion::Refreshed(Err(decode_error())));
        assert_eq!(app.community.panel().texts(), vec![LOAD_ERROR_TEXT]);
    }

    #[test]
    fn test_chat_history_recall() {
        let mut app = App::new("http://x");
        type_text(&mut app, "first question");
        app.handle_action(Action::Submit);
        app.handle_action(Action::HistoryPrev);
        assert_eq!(app.chat_input.content(), "first question");
    }
}
