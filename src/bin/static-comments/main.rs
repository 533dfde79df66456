//! static-comments CLI tool
//!
//! Inspects the comment store of a site source tree without running a full site build.
//!
//! ## Commands
//!
//! - `list <root>`: Per-page comment counts, plus every file that was skipped and why
//! - `show <root> <post_id>`: The `comment_list` templates would receive for one page, as JSON

use clap::{Parser, Subcommand};
use static_comments::{config::CommentsConfig, render::SiteContext};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "static-comments")]
#[command(author, version, about = "Inspect the static comment store of a site", long_about = None)]
struct Cli {
    /// Configuration file path (a `[comments]` table in TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every page with comments and every skipped comment file
    List {
        /// Site source root to scan
        root: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the converted comments for one page as JSON
    Show {
        /// Site source root to scan
        root: PathBuf,

        /// Identifier of the post or page
        post_id: String,
    },
}

fn load_site(
    root: PathBuf,
    config: Option<PathBuf>,
) -> Result<SiteContext, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => CommentsConfig::load(path)?,
        None => CommentsConfig::load(root.join("comments.toml"))?,
    };
    Ok(SiteContext::from_config(root, &config)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { root, verbose } => {
            if verbose {
                println!("Scanning: {:?}", root);
            }
            let site = load_site(root, cli.config)?;
            let index = site.store().index();

            println!("\n=== Comments ===");
            for (post_id, comments) in index.iter() {
                println!("{:>5}  {}", comments.len(), post_id);
            }
            println!(
                "\n{} comments on {} pages",
                index.total_comments(),
                index.len()
            );

            if !index.skipped().is_empty() {
                println!("\n=== Skipped ===");
                for skipped in index.skipped() {
                    println!("{skipped}");
                }
            }
            Ok(())
        }

        Commands::Show { root, post_id } => {
            let site = load_site(root, cli.config)?;
            let comments = site.comments_for(&post_id);
            println!("{}", serde_json::to_string_pretty(comments)?);
            Ok(())
        }
    }
}
