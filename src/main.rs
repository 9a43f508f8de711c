mod action;
mod app;
mod cli;
mod client;
mod config;
mod controller;
mod error;
mod event;
mod print;
mod render;
#[cfg(test)]
mod testing;
mod tui;
mod types;
mod ui;

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::cli::Args;
use crate::client::{HackerNews, ItemSource};
use crate::config::Config;
use crate::controller::{Options, PageController};
use crate::event::Event;
use crate::tui::{EventHandler, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    args.apply(&mut config);
    config.validate()?;

    let source: Arc<dyn ItemSource> = Arc::new(HackerNews::new(
        &config.api.base_url,
        &config.api.feed,
        config.timeout(),
    )?);
    let options = config.controller_options();

    if args.print {
        let controller = PageController::new(source, options);
        let mut stdout = std::io::stdout().lock();
        print::run(&controller, args.pages, &mut stdout).await?;
        return Ok(());
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    run(source, options).await
}

async fn run(
    source: Arc<dyn ItemSource>,
    options: Options,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::enter()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut app = App::new(source, options, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        session.terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
