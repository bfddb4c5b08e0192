use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lectern_core::{PendingFile, RecordOrder, Settings};
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod action;
mod app;
mod backend;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;
use theme::Theme;

/// Lectern TUI - upload, browse and delete course materials from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Files to pre-select for upload
    files: Vec<PathBuf>,

    /// Base URL of the material API
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long)]
    timeout: Option<u64>,

    /// Ordering of the uploaded-files list: newest-first (by upload time) or
    /// server-reversed (the server's array reversed, the legacy web-screen ordering)
    #[arg(long, value_parser = parse_order)]
    order: Option<RecordOrder>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Pre-fill the course field
    #[arg(long)]
    course: Option<String>,

    /// Pre-fill the subject field
    #[arg(long)]
    subject: Option<String>,
}

fn parse_order(raw: &str) -> Result<RecordOrder, String> {
    RecordOrder::from_name(raw)
        .ok_or_else(|| format!("unknown order {raw:?} (expected newest-first or server-reversed)"))
}

/// Log to a daily rolling file; the terminal belongs to the UI.
fn init_logging() -> Option<WorkerGuard> {
    let dir = dirs::data_local_dir()?.join("lectern").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::daily(&dir, "lectern-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("LECTERN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Validate any files provided on the command line
    for path in &args.files {
        if !path.is_file() {
            anyhow::bail!("File not found: {}", path.display());
        }
    }

    let _log_guard = init_logging();

    // Resolve config from CLI flags > env vars > config file > defaults
    let mut settings = Settings::load();
    if let Some(url) = args.api_url {
        settings.base_url = url;
    }
    if let Some(secs) = args.timeout {
        settings.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(order) = args.order {
        settings.order = order;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    tracing::info!(?settings, "starting lectern-tui");

    let api = Arc::new(settings.build_api()?);
    let theme = Theme::from_name(&settings.theme);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(theme, settings.order, api.base_url());
    app.upload
        .add_files(args.files.into_iter().map(PendingFile::from_path));
    if let Some(course) = args.course {
        app.upload.set_course(course);
    }
    if let Some(subject) = args.subject {
        app.upload.set_subject(subject);
    }

    // Backend command/event channels
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);
    tokio::spawn(backend::listen(
        api.clone(),
        cmd_rx,
        event_tx.clone(),
        cancel.clone(),
    ));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    app.mount();

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            // Backend events (non-blocking drain)
            Some(backend_event) = event_rx.recv() => {
                app.handle_backend_event(backend_event);
                while let Ok(evt) = event_rx.try_recv() {
                    app.handle_backend_event(evt);
                }
            }
            // Terminal input events
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit || cancel.is_cancelled() {
            cancel.cancel();
            break;
        }
    }
    // Keep the sender alive for the whole loop so recv() never reports closed.
    drop(event_tx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    Ok(())
}
