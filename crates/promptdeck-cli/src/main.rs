//! PromptDeck CLI - Browse, copy and favorite prompts
//!
//! Reads the catalog from a local JSON file or a PromptDeck server and
//! records copies and favorites against the server.

mod api;
mod clipboard;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use promptdeck::{
    CatalogFilter, CatalogService, ClipboardStatus, ContentSource, DisplayMode, DomainError,
    EngagementService, EngagementTracker, FavoriteStatus, JsonContentSource, PromptDisplay,
    PromptId, SortKey, TagMatchMode, UserSession,
};
use tracing_subscriber::EnvFilter;

use api::PromptDeckClient;
use clipboard::SystemClipboard;
use config::Config;

type Deck = EngagementTracker<PromptDeckClient>;

#[derive(Parser)]
#[command(name = "promptdeck")]
#[command(about = "PromptDeck CLI - Browse, copy and favorite prompts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with a session token issued by the server
    Login {
        /// User name (will prompt if not provided)
        #[arg(short, long)]
        user: Option<String>,
        /// Session token (will prompt if not provided)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// List prompts
    List {
        /// Only prompts with this tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Require every tag instead of any
        #[arg(long)]
        all_tags: bool,
        /// Case-insensitive text search over title and body
        #[arg(short, long)]
        search: Option<String>,
        /// Sort order: weight-desc, id-asc
        #[arg(long, default_value = "weight-desc")]
        sort: String,
        /// Max results
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Results to skip
        #[arg(long, default_value = "0")]
        offset: usize,
        /// Display locale (overrides config)
        #[arg(long)]
        locale: Option<String>,
    },

    /// Show one prompt
    Show {
        id: u32,
        /// Show the plain-language restatement when there is one
        #[arg(short, long)]
        alternate: bool,
        /// Display locale (overrides config)
        #[arg(long)]
        locale: Option<String>,
    },

    /// List tags with prompt counts
    Tags,

    /// Copy a prompt to the clipboard
    Copy {
        id: u32,
        /// Copy the plain-language restatement when there is one
        #[arg(short, long)]
        alternate: bool,
        /// Display locale (overrides config)
        #[arg(long)]
        locale: Option<String>,
    },

    /// Toggle a prompt in your favorites
    Favorite { id: u32 },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the server URL
    SetUrl { url: String },
    /// Set the display locale (zh, en, en-US, ...)
    SetLocale { locale: String },
    /// Read the catalog from a JSON file; omit the path to use the server
    SetCatalog { path: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { user, token } => cmd_login(user, token).await,
        Commands::Logout => cmd_logout(),
        Commands::List {
            tags,
            all_tags,
            search,
            sort,
            limit,
            offset,
            locale,
        } => {
            let filter = build_filter(tags, all_tags, search, &sort, limit, offset)?;
            cmd_list(filter, locale).await
        }
        Commands::Show {
            id,
            alternate,
            locale,
        } => cmd_show(PromptId(id), alternate, locale).await,
        Commands::Tags => cmd_tags().await,
        Commands::Copy {
            id,
            alternate,
            locale,
        } => cmd_copy(PromptId(id), alternate, locale).await,
        Commands::Favorite { id } => cmd_favorite(PromptId(id)).await,
        Commands::Config { action } => cmd_config(action.unwrap_or(ConfigAction::Show)),
    }
}

// ============================================
// Setup
// ============================================

fn build_filter(
    tags: Vec<String>,
    all_tags: bool,
    search: Option<String>,
    sort: &str,
    limit: usize,
    offset: usize,
) -> Result<CatalogFilter> {
    let sort: SortKey = sort.parse().map_err(anyhow::Error::msg)?;
    let tag_match = if all_tags {
        TagMatchMode::All
    } else {
        TagMatchMode::Any
    };

    let mut filter = tags
        .into_iter()
        .fold(CatalogFilter::default(), |filter, tag| filter.with_tag(tag))
        .with_tag_match(tag_match)
        .with_sort(sort)
        .with_window(offset, Some(limit));
    if let Some(search) = search {
        filter = filter.with_search(search);
    }
    Ok(filter)
}

/// Load the catalog and wire the tracker to the server
async fn open_deck(config: &Config) -> Result<Deck> {
    let client = Arc::new(PromptDeckClient::new(&config.base_url));

    let catalog = match &config.catalog_path {
        Some(path) => {
            let source = JsonContentSource::new(path);
            CatalogService::from_source(&source)
                .await
                .with_context(|| format!("Failed to load catalog from {:?}", path))?
        }
        None => CatalogService::from_source(client.as_ref() as &dyn ContentSource)
            .await
            .context("Failed to load catalog from server")?,
    };

    let deck = EngagementTracker::new(
        Arc::new(catalog),
        client,
        Arc::new(SystemClipboard::new()),
    )
    .with_locale(Arc::new(config.locale()))
    .with_sessions(Arc::new(config.session.clone()));

    // A local catalog carries stale counters; the server is best effort
    if config.catalog_path.is_some() {
        if let Err(e) = deck.reconcile_counts().await {
            tracing::warn!("Could not refresh counters from server: {e}");
        }
    }

    Ok(deck)
}

fn config_with_locale(locale: Option<String>) -> Result<Config> {
    let mut config = Config::load()?;
    if locale.is_some() {
        config.locale = locale;
    }
    Ok(config)
}

/// Switch a prompt to its alternate body; false when there is none
async fn select_alternate(deck: &Deck, id: PromptId, config: &Config) -> Result<bool> {
    let mode = deck.catalog().toggle_display(id, config.locale()).await?;
    Ok(mode == DisplayMode::Alternate)
}

fn print_display(display: &PromptDisplay, tags: &[String], counts: (u64, u64)) {
    println!("{} {}", format!("#{}", display.id).dimmed(), display.title.bold());
    if !tags.is_empty() {
        println!("{}", format!("[{}]", tags.join(", ")).cyan());
    }
    println!("{}", format!("📋 {}  ⭐ {}", counts.0, counts.1).dimmed());
    println!();
    println!("{}", display.body);
    if !display.remark.is_empty() {
        println!();
        println!("{}", display.remark.dimmed());
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(user: Option<String>, token: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let user = match user {
        Some(u) => u,
        None => Input::new()
            .with_prompt("User")
            .interact_text()
            .context("Failed to read user")?,
    };
    let token = match token {
        Some(t) => t,
        None => Password::new()
            .with_prompt("Session token")
            .interact()
            .context("Failed to read session token")?,
    };

    // Test connection
    let client = PromptDeckClient::new(&config.base_url);
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => println!("{}", "OK".green()),
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to PromptDeck API at {}", config.base_url);
        }
    }

    let session = UserSession::new(user.clone(), token.clone());
    match client.list_favorites(&session).await {
        Ok(favorites) => println!("{} {} favorites on server", "✓".green(), favorites.len()),
        Err(DomainError::Unauthenticated) => bail!("Server rejected the session token"),
        Err(e) => bail!("Could not verify session: {e}"),
    }

    config.set_session(user, token);
    config.save()?;

    println!("{} Session saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

fn cmd_logout() -> Result<()> {
    let mut config = Config::load()?;
    if config.clear_session() {
        config.save()?;
        println!("{} Logged out", "✓".green());
    } else {
        println!("{}", "Not logged in".yellow());
    }
    Ok(())
}

async fn cmd_list(filter: CatalogFilter, locale: Option<String>) -> Result<()> {
    let config = config_with_locale(locale)?;
    let locale = config.locale();
    let deck = open_deck(&config).await?;
    let catalog = deck.catalog();

    let total = catalog.count(&filter, locale).await;
    let prompts = catalog.query(&filter, locale).await;

    if prompts.is_empty() {
        println!("{}", "No prompts match.".yellow());
        return Ok(());
    }

    for prompt in &prompts {
        let Some(display) = catalog.display(prompt.id, locale).await else {
            continue;
        };
        println!(
            "{:>5}  {}  {}",
            format!("#{}", prompt.id).dimmed(),
            display.title.bold(),
            format!("📋 {} ⭐ {}", prompt.copy_count(), prompt.favorite_count()).dimmed()
        );
        if !prompt.tags.is_empty() {
            println!("       {}", format!("[{}]", prompt.tags.join(", ")).cyan());
        }
    }

    println!(
        "\n{}",
        format!(
            "Showing {}-{} of {}",
            filter.offset + 1,
            filter.offset + prompts.len(),
            total
        )
        .dimmed()
    );
    Ok(())
}

async fn cmd_show(id: PromptId, alternate: bool, locale: Option<String>) -> Result<()> {
    let config = config_with_locale(locale)?;
    let deck = open_deck(&config).await?;

    if alternate && !select_alternate(&deck, id, &config).await? {
        println!("{}", "No alternate text in this locale; showing the prompt.".yellow());
    }

    let prompt = deck
        .catalog()
        .get(id)
        .await
        .with_context(|| format!("Prompt {id} not found"))?;
    let display = deck
        .catalog()
        .display(id, config.locale())
        .await
        .with_context(|| format!("Prompt {id} not found"))?;

    print_display(
        &display,
        &prompt.tags,
        (prompt.copy_count(), prompt.favorite_count()),
    );
    if display.can_toggle && display.mode == DisplayMode::Primary {
        println!(
            "\n{}",
            format!("Tip: promptdeck show {id} --alternate").dimmed()
        );
    }
    Ok(())
}

async fn cmd_tags() -> Result<()> {
    let config = Config::load()?;
    let deck = open_deck(&config).await?;

    for (tag, count) in deck.catalog().tag_counts().await {
        println!("{:<20} {}", tag.cyan(), count);
    }
    Ok(())
}

async fn cmd_copy(id: PromptId, alternate: bool, locale: Option<String>) -> Result<()> {
    let config = config_with_locale(locale)?;
    let deck = open_deck(&config).await?;

    if alternate && !select_alternate(&deck, id, &config).await? {
        println!("{}", "No alternate text in this locale; copying the prompt.".yellow());
    }

    let outcome = deck.record_copy(id).await?;

    match &outcome.clipboard {
        ClipboardStatus::Copied => {
            println!("{} Copied! ({} copies)", "✓".green(), outcome.copy_count);
        }
        ClipboardStatus::Denied { reason } => {
            println!("{} Clipboard unavailable: {reason}", "⚠".yellow());
            println!("{}", outcome.text);
        }
    }

    // The process must outlive the background counter request
    if let Err(e) = outcome.sync.wait().await {
        tracing::warn!("Copy count for prompt {id} not synced: {e}");
        println!("{}", "Copy count could not be sent to the server.".yellow());
    }

    Ok(())
}

async fn cmd_favorite(id: PromptId) -> Result<()> {
    let config = Config::load()?;
    let Some(session) = config.session.clone() else {
        bail!("Not logged in. Run `promptdeck login` first.");
    };
    let deck = open_deck(&config).await?;

    match deck.sync_favorites(&session).await {
        Ok(_) => {}
        Err(DomainError::Unauthenticated) => {
            bail!("Session rejected by server. Run `promptdeck login` again.")
        }
        Err(e) => bail!("Could not load favorites: {e}"),
    }

    let outcome = deck.toggle_favorite_current(id).await?;
    match outcome.status {
        FavoriteStatus::Synced | FavoriteStatus::Queued if outcome.favorited => {
            println!(
                "{} Added #{id} to favorites (⭐ {})",
                "★".yellow(),
                outcome.favorite_count
            );
        }
        FavoriteStatus::Synced | FavoriteStatus::Queued => {
            println!(
                "{} Removed #{id} from favorites (⭐ {})",
                "☆".dimmed(),
                outcome.favorite_count
            );
        }
        FavoriteStatus::Unauthenticated => {
            bail!("Not logged in. Run `promptdeck login` first.")
        }
        FavoriteStatus::SyncFailed { reason } => {
            println!("{} Favorite not saved: {reason}", "✗".red());
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        ConfigAction::Show => {
            println!("{}", "PromptDeck CLI Configuration".bold());
            println!("  Config file: {:?}", Config::config_path()?);
            println!("  Base URL:    {}", config.base_url);
            println!("  Locale:      {}", config.locale());
            match &config.catalog_path {
                Some(path) => println!("  Catalog:     {:?}", path),
                None => println!("  Catalog:     {}", "(server)".dimmed()),
            }
            match &config.session {
                Some(session) => println!("  User:        {}", session.user_id.green()),
                None => println!("  User:        {}", "Not logged in".red()),
            }
            return Ok(());
        }
        ConfigAction::SetUrl { url } => {
            println!("{} Base URL set to {}", "✓".green(), url);
            config.base_url = url;
        }
        ConfigAction::SetLocale { locale } => {
            let resolved = promptdeck::Locale::from_tag(&locale);
            println!("{} Locale set to {} ({})", "✓".green(), locale, resolved);
            config.locale = Some(locale);
        }
        ConfigAction::SetCatalog { path } => {
            match &path {
                Some(path) => println!("{} Catalog file set to {:?}", "✓".green(), path),
                None => println!("{} Catalog will be read from the server", "✓".green()),
            }
            config.catalog_path = path;
        }
    }

    config.save()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        let filter = build_filter(
            vec!["contribute".to_string(), "article".to_string()],
            true,
            Some("report".to_string()),
            "id-asc",
            5,
            10,
        )
        .unwrap();

        assert_eq!(filter.tags.len(), 2);
        assert_eq!(filter.tag_match, TagMatchMode::All);
        assert_eq!(filter.sort, SortKey::IdAsc);
        assert_eq!(filter.search_text.as_deref(), Some("report"));
        assert_eq!((filter.offset, filter.limit), (10, Some(5)));
    }

    #[test]
    fn test_build_filter_rejects_unknown_sort() {
        assert!(build_filter(vec![], false, None, "newest", 20, 0).is_err());
    }

    #[test]
    fn test_cli_parses_list_flags() {
        let cli = Cli::parse_from([
            "promptdeck", "list", "--tag", "ai", "-t", "article", "--all-tags", "--sort", "id-asc",
        ]);
        match cli.command {
            Commands::List { tags, all_tags, sort, .. } => {
                assert_eq!(tags, vec!["ai", "article"]);
                assert!(all_tags);
                assert_eq!(sort, "id-asc");
            }
            _ => panic!("expected list"),
        }
    }
}
