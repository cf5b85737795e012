//! ScholarSlate command-line front end.
//!
//! # Responsibility
//! - Wire config, logging, SQLite stores and AI services into core services.
//! - Map each subcommand onto one library or assistant use-case.
//!
//! # Invariants
//! - All business rules live in `scholarslate_core`; this binary only
//!   parses arguments and prints results.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::warn;
use scholarslate_core::ai::data_uri::guess_image_mime;
use scholarslate_core::ai::http::HttpAiClient;
use scholarslate_core::config::AiConfig;
use scholarslate_core::db::open_db;
use scholarslate_core::highlight::render::join_with_markers;
use scholarslate_core::service::assistant_service::fallback_transcript;
use scholarslate_core::service::library_service::DASHBOARD_DEFAULT_LIMIT;
use scholarslate_core::{
    AppConfig, AssistantService, HighlightService, ImageDataUri, ItemId, ItemMetadata,
    LibraryService, NewNoteRequest, SqliteContentStore, SqliteItemCatalog,
    TranscriptionService, UnconfiguredAi,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const UNDERLINE_ON: &str = "\x1b[4m";
const UNDERLINE_OFF: &str = "\x1b[0m";

type Library<'conn> = LibraryService<SqliteItemCatalog<'conn>, SqliteContentStore<'conn>>;
type Assistant = AssistantService<Arc<dyn TranscriptionService>, Arc<dyn HighlightService>>;

#[derive(Debug, Parser)]
#[command(name = "scholarslate", version, about = "Study notes with manual highlights")]
struct Cli {
    /// TOML config file. Missing files fall back to defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print machine-readable JSON where supported.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check core linkage.
    Ping,
    /// List built-in subjects.
    Subjects,
    /// List items, most recently modified first.
    List {
        /// Subject slug, e.g. `molecular-biology`.
        #[arg(long)]
        subject: Option<String>,
    },
    /// Show recent notes and documents.
    Dashboard,
    /// Print an item body with manual highlights underlined.
    Show { id: String },
    /// Create a note.
    NewNote {
        #[arg(long)]
        title: String,
        /// Subject display name, e.g. `Molecular Biology`.
        #[arg(long)]
        subject: String,
        #[arg(long)]
        content: String,
    },
    /// Replace an item body.
    SetBody { id: String, text: String },
    /// Manage manual highlights.
    Highlight {
        #[command(subcommand)]
        action: HighlightAction,
    },
    /// Ask the AI service for key points of an item body.
    KeyPoints { id: String },
    /// Transcribe a handwritten-notes image from a file path or URL.
    Transcribe { source: String },
    /// Load the demo library into an empty database.
    Seed,
}

#[derive(Debug, Subcommand)]
enum HighlightAction {
    /// Add a phrase that occurs verbatim in the body.
    Add { id: String, phrase: String },
    /// Remove the highlight shown at `index` by `show`.
    Remove { id: String, index: usize },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Ping = cli.command {
        println!("scholarslate_core ping={}", scholarslate_core::ping());
        println!(
            "scholarslate_core version={}",
            scholarslate_core::core_version()
        );
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir
            .to_str()
            .context("log_dir must be valid UTF-8")?;
        scholarslate_core::init_logging(&config.log_level, log_dir)
            .context("failed to initialize logging")?;
    }

    let db_path = config.resolved_database_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
    let mut library = LibraryService::new(
        SqliteItemCatalog::try_new(&conn)?,
        SqliteContentStore::try_new(&conn)?,
    );
    let today = chrono::Local::now().date_naive();

    match cli.command {
        // Answered before the database is opened.
        Command::Ping => {}
        Command::Subjects => {
            let subjects = library.subjects();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(subjects)?);
            } else {
                for subject in subjects {
                    println!("{}\t{}", subject.id, subject.name);
                }
            }
        }
        Command::List { subject } => {
            let items = match subject.as_deref() {
                Some(slug) => library.subject_items(slug)?,
                None => library.all_items()?,
            };
            print_items(&items, cli.json)?;
        }
        Command::Dashboard => {
            let dashboard = library.dashboard(DASHBOARD_DEFAULT_LIMIT)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                println!("Recent notes");
                print_items(&dashboard.recent_notes, false)?;
                println!();
                println!("Recent documents");
                print_items(&dashboard.recent_documents, false)?;
            }
        }
        Command::Show { id } => show_item(&library, &ItemId::new(id), cli.json)?,
        Command::NewNote {
            title,
            subject,
            content,
        } => {
            let created = library.create_note(
                NewNoteRequest {
                    title,
                    subject,
                    content,
                },
                today,
            )?;
            println!("created {}", created.id);
        }
        Command::SetBody { id, text } => {
            let mut session = library.open_item(&ItemId::new(id))?;
            session.set_body(text);
            let saved = library.save_session(&mut session, today)?;
            println!("saved {}", saved.id);
        }
        Command::Highlight { action } => run_highlight(&mut library, action, today)?,
        Command::KeyPoints { id } => {
            let session = library.open_item(&ItemId::new(id))?;
            let assistant = build_assistant(&config.ai);
            let points = assistant.key_points(session.body()).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else if points.is_empty() {
                println!("no key points found");
            } else {
                for point in points {
                    println!("- {point}");
                }
            }
        }
        Command::Transcribe { source } => {
            let assistant = build_assistant(&config.ai);
            let outcome = match load_image(&config.ai, &source).await? {
                Some(image) => assistant.transcribe_note(Some(image)).await?,
                None => fallback_transcript(),
            };
            if outcome.fallback {
                eprintln!("transcription service unavailable; showing sample transcript");
            }
            println!("{}", outcome.text);
        }
        Command::Seed => {
            let added = library.seed_demo(today)?;
            if added == 0 {
                println!("library already has items; nothing seeded");
            } else {
                println!("seeded {added} items");
            }
        }
    }

    Ok(())
}

fn run_highlight(
    library: &mut Library<'_>,
    action: HighlightAction,
    today: NaiveDate,
) -> Result<()> {
    match action {
        HighlightAction::Add { id, phrase } => {
            let mut session = library.open_item(&ItemId::new(id))?;
            session.add_highlight(&phrase)?;
            let saved = library.save_session(&mut session, today)?;
            println!("{} now has {} highlight(s)", saved.id, saved.highlights.len());
        }
        HighlightAction::Remove { id, index } => {
            let mut session = library.open_item(&ItemId::new(id))?;
            let Some(removed) = session.remove_highlight_at(index) else {
                println!("no highlight at index {index}; nothing changed");
                return Ok(());
            };
            library.save_session(&mut session, today)?;
            println!("removed \"{}\"", removed.phrase);
        }
    }
    Ok(())
}

fn show_item(library: &Library<'_>, id: &ItemId, json: bool) -> Result<()> {
    let session = library.open_item(id)?;
    if json {
        let value = serde_json::json!({
            "item": session.item(),
            "body": session.body(),
            "segments": session.render(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let item = session.item();
    println!("{} [{}] {}", item.title, item.kind.as_str(), item.subject);
    println!("last modified {}", item.last_modified);
    println!();
    println!(
        "{}",
        join_with_markers(&session.render(), UNDERLINE_ON, UNDERLINE_OFF)
    );
    if !session.highlights().is_empty() {
        println!();
        println!("highlights:");
        for (index, entry) in session.highlights().iter().enumerate() {
            println!("  [{index}] {}", entry.phrase);
        }
    }
    Ok(())
}

fn print_items(items: &[ItemMetadata], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("  (none)");
    }
    for item in items {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            item.id,
            item.kind.as_str(),
            item.last_modified,
            item.subject,
            item.title
        );
    }
    Ok(())
}

fn build_assistant(config: &AiConfig) -> Assistant {
    match config.base_url.as_deref() {
        Some(base_url) => {
            let client = Arc::new(HttpAiClient::new(base_url));
            let transcriber: Arc<dyn TranscriptionService> = client.clone();
            let highlighter: Arc<dyn HighlightService> = client;
            AssistantService::new(transcriber, highlighter)
        }
        None => {
            let transcriber: Arc<dyn TranscriptionService> = Arc::new(UnconfiguredAi);
            let highlighter: Arc<dyn HighlightService> = Arc::new(UnconfiguredAi);
            AssistantService::new(transcriber, highlighter)
        }
    }
}

/// Reads a local image or downloads a remote one.
///
/// Returns `None` when a remote download fails; the caller then shows the
/// sample transcript like any other transcription failure.
async fn load_image(config: &AiConfig, source: &str) -> Result<Option<ImageDataUri>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let fetcher = HttpAiClient::new(config.base_url.clone().unwrap_or_default());
        return match fetcher.fetch_image(source).await {
            Ok(image) => Ok(Some(image)),
            Err(err) => {
                warn!("event=image_fetch module=cli status=error error={err}");
                Ok(None)
            }
        };
    }

    let path = Path::new(source);
    if !path.is_file() {
        bail!("image file `{}` does not exist", path.display());
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    Ok(Some(ImageDataUri::from_bytes(guess_image_mime(path), &bytes)))
}
