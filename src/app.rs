use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use crate::action::Action;
use crate::client::ItemSource;
use crate::controller::{Advance, Options, PageController, Snapshot};
use crate::event::Event;
use crate::types::Item;

const PAGE_JUMP: usize = 10;

pub struct App {
    pub snapshot: Snapshot,
    pub selected: usize,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub should_quit: bool,
    /// Bumped on refresh so results from an older controller are dropped
    session: u64,
    source: Arc<dyn ItemSource>,
    options: Options,
    controller: Arc<PageController>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        source: Arc<dyn ItemSource>,
        options: Options,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let controller = Arc::new(PageController::new(Arc::clone(&source), options));
        Self {
            snapshot: controller.snapshot(),
            selected: 0,
            error: None,
            notice: None,
            should_quit: false,
            session: 0,
            source,
            options,
            controller,
            action_tx,
        }
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.snapshot.items.get(self.selected)
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::LoadMore,
            Event::Tick => Action::Sync,
            Event::Key(key) => self.handle_key(key),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Action::Quit,
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Action::ScrollDown,
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Action::ScrollUp,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
                Action::PageDown
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => Action::PageUp,
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Action::GoToTop,
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::GoToBottom,
            (KeyCode::Char('n'), _) | (KeyCode::Char(' '), _) => Action::LoadMore,
            (KeyCode::Enter, _) | (KeyCode::Char('o'), _) => Action::OpenInBrowser,
            (KeyCode::Char('y'), _) => Action::YankUrl,
            (KeyCode::Char('r'), _) => Action::Refresh,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if !matches!(
            action,
            Action::Sync | Action::None | Action::PageLoaded { .. } | Action::LoadFailed { .. }
        ) {
            self.error = None;
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ScrollUp => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::ScrollDown => {
                if self.selected + 1 < self.snapshot.items.len() {
                    self.selected += 1;
                } else if !self.snapshot.items.is_empty() {
                    // Moving past the last posting asks for the next page
                    self.load_more();
                }
            }
            Action::PageUp => {
                self.selected = self.selected.saturating_sub(PAGE_JUMP);
            }
            Action::PageDown => {
                let last = self.snapshot.items.len().saturating_sub(1);
                self.selected = (self.selected + PAGE_JUMP).min(last);
            }
            Action::GoToTop => {
                self.selected = 0;
            }
            Action::GoToBottom => {
                self.selected = self.snapshot.items.len().saturating_sub(1);
            }

            Action::LoadMore => self.load_more(),
            Action::PageLoaded { snapshot, session } => {
                if session == self.session {
                    self.snapshot = snapshot;
                    self.clamp_selection();
                } else {
                    debug!(session, current = self.session, "dropping stale page");
                }
            }
            Action::LoadFailed { error, session } => {
                if session == self.session {
                    self.snapshot = self.controller.snapshot();
                    self.error = Some(error);
                }
            }
            Action::Sync => {
                self.snapshot = self.controller.snapshot();
                self.clamp_selection();
            }
            Action::Refresh => {
                self.session += 1;
                self.controller = Arc::new(PageController::new(
                    Arc::clone(&self.source),
                    self.options,
                ));
                self.snapshot = self.controller.snapshot();
                self.selected = 0;
                self.spawn_advance();
            }

            Action::OpenInBrowser => match self.selected_link() {
                Some(url) => {
                    if let Err(e) = open::that(&url) {
                        self.error = Some(format!("Could not open {}: {}", url, e));
                    }
                }
                None => self.notice = Some("This posting has no link".to_string()),
            },
            Action::YankUrl => match self.selected_link() {
                Some(url) => {
                    let copied = arboard::Clipboard::new().and_then(|mut c| c.set_text(url));
                    match copied {
                        Ok(()) => self.notice = Some("Copied link to clipboard".to_string()),
                        Err(e) => self.error = Some(format!("Clipboard error: {}", e)),
                    }
                }
                None => self.notice = Some("This posting has no link".to_string()),
            },

            Action::None => {}
        }
    }

    fn selected_link(&self) -> Option<String> {
        self.selected_item()
            .and_then(|item| item.link())
            .map(str::to_string)
    }

    fn clamp_selection(&mut self) {
        let len = self.snapshot.items.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn load_more(&self) {
        if self.snapshot.is_exhausted() || self.snapshot.is_loading() {
            return;
        }
        self.spawn_advance();
    }

    fn spawn_advance(&self) {
        let tx = self.action_tx.clone();
        let controller = Arc::clone(&self.controller);
        let session = self.session;
        tokio::spawn(async move {
            match controller.advance().await {
                Ok(Advance::Busy) => {}
                Ok(outcome) => {
                    if let Advance::Loaded { page, added } = outcome {
                        debug!(page, added, "page loaded");
                    }
                    tx.send(Action::PageLoaded {
                        snapshot: controller.snapshot(),
                        session,
                    })
                    .ok();
                }
                Err(e) => {
                    tx.send(Action::LoadFailed {
                        error: e.to_string(),
                        session,
                    })
                    .ok();
                }
            }
        });
    }
}
