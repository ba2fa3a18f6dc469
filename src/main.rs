//! CLI entry point for storegen

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storegen::server::ServeOptions;
use storegen::Store;

#[derive(Parser)]
#[command(name = "storegen")]
#[command(version)]
#[command(about = "A static storefront and blog generator", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new store site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Pull product feeds into data/products.csv
    Fetch {
        /// Date used for `"today"` publish dates (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Build the static site
    #[command(alias = "b")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Publish as of this date instead of the current one (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Build and start a local server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Serve without watching for changes
        #[arg(long)]
        r#static: bool,

        /// Publish as of this date instead of the current one (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Delete the output directory
    Clean,

    /// List publishable records
    List {
        /// Type of records to list (products, posts, tags)
        #[arg(default_value = "products")]
        r#type: String,
    },

    /// Display version information
    Version,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    storegen::helpers::parse_iso_date(raw).ok_or_else(|| format!("expected YYYY-MM-DD, got {:?}", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "storegen=debug,info"
    } else {
        "storegen=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing store in {:?}", target_dir);
            storegen::commands::init::init_site(&target_dir)?;
            println!("Initialized store in {:?}", target_dir);
        }

        Commands::Fetch { today } => {
            let store = Store::new(&base_dir)?;
            let today = today.unwrap_or_else(storegen::helpers::today);
            let count = storegen::commands::fetch::run(&store, today).await?;
            println!("Fetched {} products", count);
        }

        Commands::Build { watch, today } => {
            let store = Store::new(&base_dir)?;
            tracing::info!("Building site...");

            let summary = store.build(today.unwrap_or_else(storegen::helpers::today))?;
            println!(
                "Built {} pages ({} products, {} posts)",
                summary.pages, summary.products, summary.posts
            );

            if watch {
                storegen::commands::build::watch(&store, today).await?;
            }
        }

        Commands::Serve {
            port,
            ip,
            open,
            r#static,
            today,
        } => {
            let store = Store::new(&base_dir)?;

            tracing::info!("Building site...");
            store.build(today.unwrap_or_else(storegen::helpers::today))?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            let options = ServeOptions {
                ip,
                port,
                watch: !r#static,
                open,
                today,
            };
            storegen::server::start(&store, options).await?;
        }

        Commands::Clean => {
            let store = Store::new(&base_dir)?;
            store.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let store = Store::new(&base_dir)?;
            storegen::commands::list::run(&store, &r#type, storegen::helpers::today())?;
        }

        Commands::Version => {
            println!("storegen version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
