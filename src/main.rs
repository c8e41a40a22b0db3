//! mf-exhibitors - Messe Frankfurt exhibitor list exporter

use anyhow::Result;
use clap::{Parser, Subcommand};
use mf_exhibitors::commands::CollectCommand;
use mf_exhibitors::config::Config;
use mf_exhibitors::export::PREFERRED_COLUMNS;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mf-exhibitors",
    version,
    about = "Export Messe Frankfurt exhibitor listings to CSV and Excel",
    long_about = "Pages through the Messe Frankfurt exhibitor search API for one event and writes every exhibitor as a flat row to CSV (and Excel when built with the xlsx feature)."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Delay between pages in milliseconds
    #[arg(long, global = true, env = "MF_DELAY")]
    delay: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every exhibitor of an event and export the list
    #[command(alias = "c")]
    Collect {
        /// Event identifier (e.g. HEIMTEXTIL)
        #[arg(short, long, env = "MF_EVENT_ID")]
        event: Option<String>,

        /// API key sent in the `apikey` header
        #[arg(long, env = "MF_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Free-text search (blank for all exhibitors)
        #[arg(short, long)]
        query: Option<String>,

        /// Result language
        #[arg(long)]
        language: Option<String>,

        /// Sort field
        #[arg(long)]
        order_by: Option<String>,

        /// Hits per page
        #[arg(long)]
        page_size: Option<u32>,

        /// First page to fetch
        #[arg(long)]
        start_page: Option<u32>,

        /// Last page to fetch
        #[arg(long)]
        max_pages: Option<u32>,

        /// CSV output path
        #[arg(long)]
        out_csv: Option<PathBuf>,

        /// Excel output path
        #[arg(long)]
        out_xlsx: Option<PathBuf>,
    },

    /// List the spreadsheet column order
    Columns,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }

    match cli.command {
        Commands::Collect {
            event,
            api_key,
            query,
            language,
            order_by,
            page_size,
            start_page,
            max_pages,
            out_csv,
            out_xlsx,
        } => {
            if let Some(event) = event {
                config.event_id = event;
            }
            if let Some(key) = api_key {
                config.api_key = key;
            }
            if let Some(query) = query {
                config.query = query;
            }
            if let Some(language) = language {
                config.language = language;
            }
            if let Some(order_by) = order_by {
                config.order_by = order_by;
            }
            if let Some(size) = page_size {
                config.page_size = size;
            }
            if let Some(start) = start_page {
                config.start_page = start;
            }
            if max_pages.is_some() {
                config.max_pages = max_pages;
            }
            if let Some(path) = out_csv {
                config.out_csv = path;
            }
            if let Some(path) = out_xlsx {
                config.out_xlsx = path;
            }

            let cmd = CollectCommand::new(config);
            let summary = cmd.execute().await?;
            println!("{}", summary.describe());
        }

        Commands::Columns => {
            println!("Spreadsheet column order:\n");
            for (idx, column) in PREFERRED_COLUMNS.iter().enumerate() {
                println!("{:>3}  {}", idx + 1, column);
            }
        }
    }

    Ok(())
}
