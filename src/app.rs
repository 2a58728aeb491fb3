//! Interface model
//!
//! Exactly one screen is live at a time. The chat screen owns the
//! conversation driver, so dropping back to the welcome screen drops the
//! session with it.

mod welcome;

pub use welcome::WelcomeForm;

use crate::driver::{wait_for_cancels, ConversationDriver, DriverStatus};
use crate::service::ConversationService;
use crate::session::{start_session, CheckType, StartError, StartedSession};
use crate::state_machine::{ConvState, Event};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type StartOutcome = Result<StartedSession, StartError>;

/// Lines moved by PageUp / PageDown
const SCROLL_PAGE: u16 = 5;

/// The active session screen
pub struct ChatScreen<S>
where
    S: ConversationService + 'static,
{
    pub driver: ConversationDriver<S>,
    /// Reply being typed
    pub input: String,
    /// Transcript lines scrolled up from the newest one. Clamped when drawn.
    pub scroll_back: u16,
}

impl<S> ChatScreen<S>
where
    S: ConversationService + 'static,
{
    fn new(driver: ConversationDriver<S>) -> Self {
        Self {
            driver,
            input: String::new(),
            scroll_back: 0,
        }
    }

    /// Move the transcript view. Available in every state.
    fn scroll(&mut self, code: KeyCode) -> bool {
        self.scroll_back = match code {
            KeyCode::PageUp => self.scroll_back.saturating_add(SCROLL_PAGE),
            KeyCode::PageDown => self.scroll_back.saturating_sub(SCROLL_PAGE),
            KeyCode::Up => self.scroll_back.saturating_add(1),
            KeyCode::Down => self.scroll_back.saturating_sub(1),
            _ => return false,
        };
        true
    }
}

pub enum Screen<S>
where
    S: ConversationService + 'static,
{
    Welcome(WelcomeForm),
    Chat(ChatScreen<S>),
}

/// Asynchronous results the interface reacts to
#[derive(Debug)]
pub enum Update {
    Started(StartOutcome),
    Conversation(Event),
}

pub struct App<S>
where
    S: ConversationService + 'static,
{
    service: Arc<S>,
    screen: Screen<S>,
    start_tx: mpsc::Sender<StartOutcome>,
    start_rx: mpsc::Receiver<StartOutcome>,
    /// Cancel calls from sessions already left, awaited on shutdown
    pending_cancels: Vec<JoinHandle<()>>,
    should_quit: bool,
}

impl<S> App<S>
where
    S: ConversationService + 'static,
{
    pub fn new(service: Arc<S>) -> Self {
        let (start_tx, start_rx) = mpsc::channel(1);
        Self {
            service,
            screen: Screen::Welcome(WelcomeForm::default()),
            start_tx,
            start_rx,
            pending_cancels: Vec::new(),
            should_quit: false,
        }
    }

    pub fn screen(&self) -> &Screen<S> {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen<S> {
        &mut self.screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Wait for the next asynchronous result for the current screen. Cancel safe.
    pub async fn next_update(&mut self) -> Update {
        match &mut self.screen {
            Screen::Chat(chat) => match chat.driver.next_event().await {
                Some(event) => Update::Conversation(event),
                None => std::future::pending().await,
            },
            Screen::Welcome(_) => match self.start_rx.recv().await {
                Some(outcome) => Update::Started(outcome),
                None => std::future::pending().await,
            },
        }
    }

    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Started(outcome) => self.apply_start(outcome),
            Update::Conversation(event) => {
                if let Screen::Chat(chat) = &mut self.screen {
                    // Rejections are logged by the driver
                    if chat.driver.dispatch(event).is_ok() {
                        chat.scroll_back = 0;
                    }
                } else {
                    tracing::debug!(?event, "Dropped conversation event outside a session");
                }
            }
        }
    }

    fn apply_start(&mut self, outcome: StartOutcome) {
        let Screen::Welcome(form) = &mut self.screen else {
            tracing::debug!("Dropped start outcome during a session");
            return;
        };
        if !form.loading {
            return;
        }
        match outcome {
            Ok(started) => {
                let driver = ConversationDriver::new(started, Arc::clone(&self.service));
                self.screen = Screen::Chat(ChatScreen::new(driver));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not start session");
                form.start_failed(e.user_message());
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        if matches!(self.screen, Screen::Welcome(_)) {
            self.handle_welcome_key(key.code);
            return;
        }

        let next = match &mut self.screen {
            Screen::Chat(chat) => Self::handle_chat_key(chat, key.code),
            Screen::Welcome(_) => None,
        };
        if let Some(screen) = next {
            self.switch_screen(screen);
        }
    }

    /// Replace the screen, keeping a leaving session's cancel call alive
    fn switch_screen(&mut self, screen: Screen<S>) {
        if let Screen::Chat(chat) = std::mem::replace(&mut self.screen, screen) {
            self.pending_cancels.retain(|task| !task.is_finished());
            self.pending_cancels.extend(chat.driver.into_pending_cancel());
        }
    }

    fn handle_welcome_key(&mut self, code: KeyCode) {
        let Screen::Welcome(form) = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => {
                if let Some((name, check_type)) = form.begin_start() {
                    spawn_start(
                        Arc::clone(&self.service),
                        self.start_tx.clone(),
                        name,
                        check_type,
                    );
                }
            }
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right => form.toggle_check_type(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.type_char(c),
            _ => {}
        }
    }

    /// Returns the screen to switch to, if any
    fn handle_chat_key(chat: &mut ChatScreen<S>, code: KeyCode) -> Option<Screen<S>> {
        if chat.scroll(code) {
            return None;
        }

        let state = chat.driver.state();
        if state == ConvState::Completed {
            if code == KeyCode::Enter && chat.driver.reset() == Ok(DriverStatus::Ended) {
                return Some(Screen::Welcome(WelcomeForm::default()));
            }
            return None;
        }

        match code {
            KeyCode::Enter => {
                if chat.driver.submit(&chat.input).is_ok() {
                    chat.input.clear();
                    chat.scroll_back = 0;
                }
            }
            KeyCode::Esc => {
                if chat.driver.abandon() == Ok(DriverStatus::Ended) {
                    return Some(Screen::Welcome(WelcomeForm::default()));
                }
            }
            KeyCode::Backspace if state.accepts_input() => {
                chat.input.pop();
            }
            KeyCode::Char(c) if state.accepts_input() => chat.input.push(c),
            _ => {}
        }
        None
    }

    fn quit(&mut self) {
        if let Screen::Chat(chat) = &mut self.screen {
            if chat.driver.state().accepts_input() {
                let _ = chat.driver.abandon();
            }
        }
        self.should_quit = true;
    }

    /// Let pending cancel calls finish before exit
    pub async fn shutdown(mut self) {
        if let Screen::Chat(chat) = self.screen {
            self.pending_cancels.extend(chat.driver.into_pending_cancel());
        }
        wait_for_cancels(self.pending_cancels).await;
    }
}

fn spawn_start<S>(
    service: Arc<S>,
    start_tx: mpsc::Sender<StartOutcome>,
    name: String,
    check_type: CheckType,
) where
    S: ConversationService + 'static,
{
    tokio::spawn(async move {
        let outcome = start_session(service.as_ref(), &name, check_type).await;
        let _ = start_tx.send(outcome).await;
    });
}
