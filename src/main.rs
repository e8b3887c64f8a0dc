use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;

use rss2blog::blog::{self, ProcessOptions};
use rss2blog::config::Config;

/// Get the default config file path (~/.config/rss2blog/config.toml)
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("rss2blog")
            .join("config.toml"),
    )
}

#[derive(Parser, Debug)]
#[command(
    name = "rss2blog",
    about = "Convert an RSS feed into portfolio blog entries"
)]
struct Args {
    /// Path to the RSS XML file
    #[arg(value_name = "FEED")]
    feed: PathBuf,

    /// Merge the parsed entries into the blogs file (default is a dry run)
    #[arg(long)]
    update: bool,

    /// Blogs JSON file to update (overrides config)
    #[arg(long, value_name = "FILE")]
    blogs: Option<PathBuf>,

    /// Maximum number of entries kept after merging (overrides config)
    #[arg(long, value_name = "N")]
    max_entries: Option<usize>,

    /// Copy the blogs file to a timestamped backup before updating
    #[arg(long, requires = "update")]
    backup: bool,

    /// Config file (default: ~/.config/rss2blog/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.clone().or_else(default_config_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => Config::default(),
    };
    let blogs_path = args.blogs.clone().unwrap_or(config.blogs_path);
    let options = ProcessOptions {
        update: args.update,
        max_entries: args.max_entries.unwrap_or(config.max_entries),
    };

    let rss_content = std::fs::read_to_string(&args.feed)
        .with_context(|| format!("Failed to read feed file: {}", args.feed.display()))?;

    if args.backup {
        let backup_path = blog::backup(&blogs_path).with_context(|| {
            format!(
                "Failed to back up '{}'. Aborting update to protect existing data.",
                blogs_path.display()
            )
        })?;
        println!("Backed up {} to: {}", blogs_path.display(), backup_path.display());
    }

    let entries = blog::process_feed(
        &rss_content,
        &blogs_path,
        options,
        &config.entry,
        Local::now().date_naive(),
    )
    .with_context(|| format!("Failed to process feed: {}", args.feed.display()))?;

    println!("Processed {} blog entries from RSS feed", entries.len());
    if options.update {
        println!("Updated {}", blogs_path.display());
    } else {
        println!("Dry run - no files updated");
        match entries.first() {
            Some(first) => {
                println!();
                println!("First entry:");
                println!(
                    "{}",
                    serde_json::to_string_pretty(first).context("Failed to encode entry")?
                );
            }
            None => println!("Feed contains no items"),
        }
    }

    Ok(())
}
