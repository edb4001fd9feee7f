use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use newsdeck::api::{ConfigurationError, CredentialRotator, NewsClient};
use newsdeck::app::{App, AppEvent};
use newsdeck::config::{Config, KEYS_ENV_VAR, NUMBERED_KEY_PREFIX};
use newsdeck::news::{Category, QueryIntent};
use newsdeck::theme::ThemeVariant;
use newsdeck::ui;
use newsdeck::util::{format_relative_time, strip_control_chars};

/// Get the config directory path (~/.config/newsdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdeck"))
}

/// Create the config directory with user-only permissions.
fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }
    Ok(())
}

/// Route logs to stderr for one-shot commands, and to a file while the TUI
/// owns the terminal.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "newsdeck", version, about = "Terminal news reader for NewsAPI")]
struct Args {
    /// Config file (default: ~/.config/newsdeck/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start on this category (business, entertainment, general, health, science, sports, technology)
    #[arg(long, value_name = "NAME")]
    category: Option<Category>,

    /// Start with a keyword search
    #[arg(long, value_name = "TERM")]
    search: Option<String>,

    /// Start with headlines from one source id (e.g. bbc-news)
    #[arg(long, value_name = "ID")]
    source: Option<String>,

    /// Fetch once, print headlines to stdout and exit
    #[arg(long)]
    print: bool,

    /// Print available source ids and names and exit
    #[arg(long, conflicts_with = "print")]
    list_sources: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    ensure_config_dir(&config_dir)?;

    let one_shot = args.print || args.list_sources;
    let log_path = config_dir.join("newsdeck.log");
    init_tracing((!one_shot).then_some(log_path.as_path()))?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    let keys = config.resolve_api_keys(|name| std::env::var(name).ok());
    let rotator = match CredentialRotator::new(keys) {
        Ok(rotator) => rotator,
        Err(ConfigurationError::NoCredentials) => {
            eprintln!("Error: No NewsAPI keys configured.");
            eprintln!();
            eprintln!("Set one of:");
            eprintln!("  {}=key1,key2", KEYS_ENV_VAR);
            eprintln!("  {}1=key1 {}2=key2 ...", NUMBERED_KEY_PREFIX, NUMBERED_KEY_PREFIX);
            eprintln!("or add api_keys = [\"...\"] to {}", config_path.display());
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to set up API keys"),
    };

    let client = Arc::new(
        NewsClient::new(config.client_settings(), rotator)
            .context("Failed to create news client")?,
    );

    let category = args.category.unwrap_or(config.default_category);
    let mut intent = QueryIntent::new(category);
    if let Some(term) = args.search.as_deref() {
        intent.on_search(term);
    }
    // a source overrides any search, as in the API's own precedence
    if let Some(source) = args.source.as_deref() {
        intent.on_source_select(Some(source));
    }

    if args.list_sources {
        return list_sources(&client).await;
    }
    if args.print {
        return print_headlines(&client, &intent).await;
    }

    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark");
        ThemeVariant::Dark
    });

    let mut app = App::new(client, category);
    app.intent = intent;
    app.active_query = app.intent.current_query();
    app.sync_category_cursor();
    app.set_theme(theme);

    let warnings = app.keybindings.apply_overrides(&config.keybindings);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    if !warnings.is_empty() {
        app.set_status(format!(
            "{} keybinding override(s) ignored, see {}",
            warnings.len(),
            log_path.display()
        ));
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}

/// `--print`: one fetch for the starting query, one line per article.
async fn print_headlines(client: &NewsClient, intent: &QueryIntent) -> Result<()> {
    let query = intent.current_query();
    let outcome = client.fetch(&query).await;
    if outcome.error_occurred {
        anyhow::bail!("Failed to fetch {} (see log output above)", query.describe());
    }
    if outcome.items.is_empty() {
        println!("No articles found");
        return Ok(());
    }

    let now = Utc::now();
    for article in &outcome.items {
        println!(
            "{}  [{}, {}]",
            strip_control_chars(&article.title),
            strip_control_chars(&article.source_name),
            format_relative_time(article.published_at, now)
        );
        println!("    {}", article.article_url);
    }
    Ok(())
}

/// `--list-sources`: source ids usable with `--source`.
async fn list_sources(client: &NewsClient) -> Result<()> {
    let outcome = client.fetch_sources().await;
    if outcome.error_occurred {
        anyhow::bail!("Failed to fetch sources (see log output above)");
    }
    for source in &outcome.items {
        println!("{:<28} {}", source.id, strip_control_chars(&source.name));
    }
    Ok(())
}
