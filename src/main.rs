//! Standup check-in client
//!
//! A terminal chat client for morning and evening team check-ins, driven by
//! a remote conversation service.

mod app;
mod config;
mod driver;
mod service;
mod session;
mod state_machine;
mod ui;

use app::App;
use config::ClientConfig;
use crossterm::event::{Event as TermEvent, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use service::{ConversationService, HttpConversationService, LoggingService};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env();

    // Initialize logging
    std::fs::create_dir_all(&config.log_dir)?;
    let file_appender = tracing_appender::rolling::never(&config.log_dir, "checkin.log");
    let (log_writer, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "standup_checkin=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(log_writer)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    tracing::info!(
        api_url = %config.api_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Starting check-in client"
    );

    let service = Arc::new(LoggingService::new(HttpConversationService::new(
        config.clone(),
    )?));

    // Probe in the background so a slow service doesn't hold up the UI
    let probe = Arc::clone(&service);
    tokio::spawn(async move {
        match probe.health().await {
            Ok(health) => tracing::info!(
                status = %health.status,
                timestamp = ?health.timestamp,
                "Conversation service reachable"
            ),
            Err(e) => tracing::warn!(error = %e, "Conversation service health check failed"),
        }
    });

    let mut app = App::new(service);
    let mut terminal = ratatui::try_init()?;
    let result = run(&mut terminal, &mut app).await;
    ratatui::restore();

    app.shutdown().await;
    tracing::info!("Check-in client stopped");
    result
}

async fn run<S>(
    terminal: &mut DefaultTerminal,
    app: &mut App<S>,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: ConversationService + 'static,
{
    let mut term_events = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;
        if app.should_quit() {
            return Ok(());
        }

        tokio::select! {
            maybe_event = term_events.next() => match maybe_event {
                Some(Ok(TermEvent::Key(key))) => app.handle_key(key),
                // Resize and friends only need a redraw
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            update = app.next_update() => app.apply(update),
        }
    }
}
