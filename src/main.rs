// quill: a terminal reader for a blog published as static JSON files.
// Parses the command line, sets up logging and runs a subcommand or the TUI.

mod app;
mod archive;
mod cache;
mod commands;
mod config;
mod content;
mod error;
mod render;
mod search;
mod state;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::Config;
use crate::content::{ContentStore, SkillLevel};
use crate::error::Result;
use crate::search::SearchField;

#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(about = "Browse a static blog from the terminal", long_about = None)]
struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the blog's static files, overriding the config
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Without a subcommand the interactive reader starts
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List published posts, newest first
    #[command(alias = "ls")]
    List {
        /// Only posts in this category
        #[arg(long)]
        category: Option<String>,

        /// Only posts at this skill level
        #[arg(short, long, value_parser = parse_skill_level)]
        level: Option<SkillLevel>,
    },

    /// Print one post
    Show {
        slug: String,

        /// Print HTML markup instead of text
        #[arg(long)]
        html: bool,
    },

    /// Search posts
    Search {
        query: String,

        /// Restrict the search to these fields
        #[arg(short, long, value_enum)]
        field: Vec<SearchField>,
    },

    /// Show posts grouped by year and month
    Archive,

    /// Check that the blog host is reachable
    Check,
}

fn parse_skill_level(value: &str) -> std::result::Result<SkillLevel, String> {
    SkillLevel::parse(value)
        .ok_or_else(|| format!("unknown skill level `{}` (beginner, intermediate, advanced)", value))
}

/// Install the tracing subscriber. The TUI owns the terminal, so it logs to a file.
fn init_logging(debug: bool, tui: bool) -> Result<()> {
    let default = if debug { "quill=debug" } else { "quill=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let registry = tracing_subscriber::registry().with(filter);

    if !tui {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return Ok(());
    }

    let Some(path) = cache::paths::log_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    registry
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn run_tui(config: Config, store: Arc<ContentStore>) -> Result<()> {
    let mut terminal = ratatui::init();
    let mut app = App::new(config, store);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result?;
    Ok(())
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let tui = cli.command.is_none();
    init_logging(cli.debug, tui)?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.source.base_url = Some(base_url);
    }
    let store = Arc::new(ContentStore::new(&config)?);
    info!(base_url = store.base_url(), "content store ready");

    let Some(command) = cli.command else {
        run_tui(config, store)?;
        return Ok(ExitCode::SUCCESS);
    };

    let mut out = io::stdout().lock();
    match command {
        Commands::List { category, level } => {
            commands::list(&store, category.as_deref(), level, &mut out).await?
        }
        Commands::Show { slug, html } => commands::show(&store, &slug, html, &mut out).await?,
        Commands::Search { query, field } => {
            commands::search(&store, &query, &field, &mut out).await?
        }
        Commands::Archive => commands::archive(&store, &mut out).await?,
        Commands::Check => {
            if !commands::check(&store, &mut out).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}
