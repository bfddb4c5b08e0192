use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use lectern_core::{HttpMaterialApi, MaterialApi, PendingFile, RecordOrder, Session, Settings};
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Lectern - upload, list and delete course materials
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the material API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Ordering of the uploaded-files list: newest-first (by upload time) or
    /// server-reversed (the server's array reversed, the legacy web-screen ordering)
    #[arg(long, global = true, value_parser = parse_order)]
    order: Option<RecordOrder>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List uploaded files, newest first
    List {
        /// Only show files whose name contains this text (case-insensitive)
        #[arg(short, long, default_value = "")]
        filter: String,
    },

    /// Upload one or more files as a single batch
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Course the files belong to
        #[arg(short, long, default_value = "")]
        course: String,

        /// Subject the files belong to
        #[arg(short, long, default_value = "")]
        subject: String,
    },

    /// Delete an uploaded file by id
    Delete {
        /// Identifier shown by `lectern list`
        id: u64,
    },
}

fn parse_order(raw: &str) -> Result<RecordOrder, String> {
    RecordOrder::from_name(raw)
        .ok_or_else(|| format!("unknown order {raw:?} (expected newest-first or server-reversed)"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LECTERN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    // Resolve config from CLI flags > env vars > config file > defaults
    let mut settings = Settings::load();
    if let Some(url) = cli.api_url {
        settings.base_url = url;
    }
    if let Some(secs) = cli.timeout {
        settings.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(order) = cli.order {
        settings.order = order;
    }
    tracing::debug!(?settings, "resolved settings");

    let api = settings.build_api()?;
    let mut session = Session::new(api, settings.order);
    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());

    let ok = match cli.command {
        Command::List { filter } => list(&mut session, &filter, color).await?,
        Command::Upload {
            files,
            course,
            subject,
        } => upload(&mut session, files, course, subject, color).await?,
        Command::Delete { id } => delete(&mut session, id, color).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn list(
    session: &mut Session<HttpMaterialApi>,
    filter: &str,
    color: ColorMode,
) -> anyhow::Result<bool> {
    // A failed refresh is only logged by the screen, so ask the API directly
    // for the error to report it here.
    let records = session.api().list_files().await;
    let ok = records.is_ok();
    if let Err(e) = &records {
        eprintln!("Error fetching uploaded files: {e}");
    }
    session.screen_mut().apply_refresh(records);
    session.screen_mut().set_filter(filter);

    let mut stdout = std::io::stdout().lock();
    if ok {
        output::print_records(&mut stdout, &session.screen().filtered_records(), filter, color)?;
    }
    Ok(ok)
}

async fn upload(
    session: &mut Session<HttpMaterialApi>,
    files: Vec<PathBuf>,
    course: String,
    subject: String,
    color: ColorMode,
) -> anyhow::Result<bool> {
    for path in &files {
        if !path.is_file() {
            anyhow::bail!("File not found: {}", path.display());
        }
    }

    let screen = session.screen_mut();
    screen.add_files(files.into_iter().map(PendingFile::from_path));
    screen.set_course(course);
    screen.set_subject(subject);

    let Some(notice) = session.submit().await else {
        anyhow::bail!("nothing to upload");
    };

    let mut stdout = std::io::stdout().lock();
    output::print_notice(&mut stdout, &notice, color)?;
    if notice.is_failure() {
        return Ok(false);
    }
    writeln!(stdout)?;
    output::print_records(&mut stdout, &session.screen().filtered_records(), "", color)?;
    Ok(true)
}

async fn delete(
    session: &mut Session<HttpMaterialApi>,
    id: u64,
    color: ColorMode,
) -> anyhow::Result<bool> {
    let notice = session.delete(id).await;
    let mut stdout = std::io::stdout().lock();
    output::print_notice(&mut stdout, &notice, color)?;
    Ok(!notice.is_failure())
}
