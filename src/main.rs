use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use eyre::{Result, eyre};
use log::{debug, info};

mod cli;

use cli::{Cli, Command, OutputFormat};
use ythistory::backend::FileBackend;
use ythistory::cache::TitleCache;
use ythistory::config::Config;
use ythistory::history::{HistoryStore, LoadStatus, WriteStatus};
use ythistory::{HistoryEntry, oembed};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ythistory.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ythistory")
        .join("logs")
}

fn build_after_help() -> String {
    format!(
        "\nConfig is read from: {}\nLogs are written to: {}",
        ythistory::config::config_path().display(),
        log_dir().join("ythistory.log").display()
    )
}

/// Retry an async operation with exponential backoff
async fn retry<F, Fut, T>(max_attempts: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..max_attempts {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if attempt + 1 < max_attempts {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    debug!("Attempt {} failed: {e}, retrying in {delay:?}", attempt + 1);
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| eyre!("operation was never attempted")))
}

fn parse_video_id(input: &str) -> Result<String> {
    ythistory::extract_video_id(input).ok_or_else(|| {
        eyre!(
            "could not extract video ID from: {input}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  https://www.youtube.com/v/ID\n  https://www.youtube.com/shorts/ID\n  <11-character video ID>"
        )
    })
}

/// Cache first, then oEmbed with retries, then the placeholder
async fn lookup_title(client: &reqwest::Client, cache: &TitleCache, video_id: &str) -> String {
    if let Some(title) = cache.get(video_id) {
        return title;
    }

    match retry(3, || oembed::fetch_metadata(client, video_id)).await {
        Ok(meta) => {
            if let Err(e) = cache.put(video_id, &meta.title) {
                debug!("Could not cache title for {video_id}: {e}");
            }
            meta.title
        }
        Err(e) => {
            debug!("Title lookup failed for {video_id}: {e}");
            ythistory::fallback_title(video_id)
        }
    }
}

fn print_entry(entry: &HistoryEntry) {
    println!("{}  {}", entry.video_id, entry.title);
    println!("  watched:   {}", ythistory::reltime::format_relative_time_now(entry.watched_at));
    println!("  thumbnail: {}", entry.thumbnail());
}

fn warn_load(status: LoadStatus) {
    match status {
        LoadStatus::Corrupted => eprintln!("warning: stored history was corrupted and has been discarded"),
        LoadStatus::Unavailable => eprintln!("warning: stored history could not be read"),
        LoadStatus::Loaded | LoadStatus::Missing => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        debug!("Ignoring invalid config: {e}");
        Config::default()
    });

    let data_dir = config.data_dir.clone().unwrap_or_else(FileBackend::default_dir);
    if cli.verbose {
        let config_path = ythistory::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("History: {}", data_dir.display());
    }

    if config.max_history_items == Some(0) {
        eprintln!("warning: max_history_items = 0 in config is not allowed, keeping 1 entry");
    }

    let mut store = HistoryStore::new(FileBackend::new(&data_dir))
        .with_max_items(config.max_history_items.unwrap_or(ythistory::MAX_HISTORY_ITEMS));
    if let Some(ref key) = config.storage_key {
        store = store.with_key(key.clone());
    }

    match cli.command {
        Command::Add { url, title, no_fetch } => {
            let video_id = parse_video_id(&url)?;
            let fetch = !no_fetch && config.fetch_titles.unwrap_or(true);

            let title = match title {
                Some(t) => Some(t),
                None if fetch => {
                    let client = reqwest::Client::new();
                    Some(lookup_title(&client, &TitleCache::default(), &video_id).await)
                }
                None => None,
            };

            let update = store.add(&url, &video_id, title.as_deref())?;
            warn_load(update.loaded);
            if update.write == WriteStatus::Failed {
                eprintln!("warning: history could not be saved; this entry will not persist");
            }
            if let Some(entry) = update.entries.first() {
                print_entry(entry);
            }
            if cli.verbose {
                eprintln!("History now holds {} of {} entries", update.entries.len(), store.max_items());
            }
        }
        Command::List { format, limit } => {
            let history = store.load();
            warn_load(history.status);

            let mut entries = history.entries;
            if let Some(n) = limit {
                entries.truncate(n);
            }

            let format = format.unwrap_or_else(|| match config.default_format.as_deref() {
                Some("json") => OutputFormat::Json,
                _ => OutputFormat::Text,
            });
            let rendered = match format {
                OutputFormat::Text if entries.is_empty() => "No videos watched yet".to_string(),
                OutputFormat::Text => ythistory::output::render_text(&entries, Utc::now()),
                OutputFormat::Json => ythistory::output::render_json(&entries)?,
            };
            println!("{rendered}");
        }
        Command::Clear => {
            if store.clear() == WriteStatus::Failed {
                eyre::bail!("could not clear history in {}", data_dir.display());
            }
            if cli.verbose {
                eprintln!("History cleared");
            }
        }
        Command::Info { url } => {
            let video_id = parse_video_id(&url)?;
            println!("Video ID:  {video_id}");
            println!("Watch:     {}", ythistory::watch_url(&video_id));
            println!("Embed:     {}", ythistory::embed_url(&video_id));
            println!("Thumbnail: {}", ythistory::thumbnail_url(&video_id));

            let client = reqwest::Client::new();
            match retry(3, || oembed::fetch_metadata(&client, &video_id)).await {
                Ok(meta) => {
                    println!("Title:     {}", meta.title);
                    if let Some(author) = meta.author_name {
                        println!("Author:    {author}");
                    }
                    if let Some(author_url) = meta.author_url {
                        println!("Channel:   {author_url}");
                    }
                }
                Err(e) => {
                    println!("Title:     {}", ythistory::fallback_title(&video_id));
                    if cli.verbose {
                        eprintln!("oEmbed lookup failed: {e}");
                    }
                }
            }
        }
    }

    Ok(())
}
