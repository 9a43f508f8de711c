use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::event::Event;

pub type Backend = CrosstermBackend<Stdout>;

/// Raw-mode alternate screen, left again when dropped.
pub struct Session {
    pub terminal: Terminal<Backend>,
}

impl Session {
    pub fn enter() -> io::Result<Self> {
        execute!(io::stdout(), EnterAlternateScreen)?;
        enable_raw_mode()?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = restore();
    }
}

/// Leave the alternate screen. Safe to call more than once.
pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Feeds key presses plus tick and render beats into one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(pump(tx, cancel.clone(), tick_rate, render_rate));
        Self { rx, cancel, task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    tick_rate: Duration,
    render_rate: Duration,
) {
    let mut keys = EventStream::new();
    let mut ticks = interval(tick_rate);
    let mut frames = interval(render_rate);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    if tx.send(Event::Init).is_err() {
        return;
    }

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticks.tick() => Event::Tick,
            _ = frames.tick() => Event::Render,
            Some(Ok(TermEvent::Key(key))) = keys.next() => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                Event::Key(key)
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}
