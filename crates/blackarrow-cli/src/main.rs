use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::context::Context;

#[derive(Parser)]
#[command(name = "blackarrow")]
#[command(about = "Black Arrow site state - region, overlays, intent and preferences", long_about = None)]
struct Cli {
    /// Site config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Durable storage file (defaults to the platform config directory)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the visitor's region
    Region {
        /// Serving hostname
        #[arg(long, default_value = "blackarrowtechnologies.com")]
        host: String,
        /// IANA timezone of the visitor
        #[arg(long, default_value = "Europe/London")]
        timezone: String,
        /// Explicitly select a region (UK, UAE, IND) instead of resolving
        #[arg(long)]
        set: Option<String>,
    },
    /// Replay a navigation trace through the service intent tracker
    Intent {
        /// Paths in visit order
        #[arg(required = true)]
        paths: Vec<String>,
        /// Region used for reminder prices
        #[arg(long)]
        region: Option<String>,
    },
    /// Show or change the theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Show or record the cookie decision
    Consent {
        #[command(subcommand)]
        action: Option<ConsentAction>,
    },
    /// Simulate popup and modal triggers against the arbiters
    Overlays {
        /// Seconds before the newsletter popup asks for the slot
        #[arg(long)]
        newsletter_delay: Option<u64>,
        /// Modals to open in order (chat, audit-request, quote-request, exit-intent)
        #[arg(long = "open", value_delimiter = ',')]
        modals: Vec<String>,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Flip between light and dark
    Toggle,
    /// Set light or dark
    Set { mode: String },
}

#[derive(Subcommand)]
pub enum ConsentAction {
    /// Print the stored decision
    Show,
    /// Accept all cookies
    Accept,
    /// Keep only necessary cookies
    Reject,
    /// Choose categories
    Save {
        #[arg(long)]
        analytics: bool,
        #[arg(long)]
        marketing: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::load(cli.config, cli.storage)?;
    commands::logging::init(&ctx.config.logging.level);

    match cli.command {
        Commands::Region {
            host,
            timezone,
            set,
        } => commands::region::run(&ctx, host, timezone, set).await?,
        Commands::Intent { paths, region } => commands::intent::run(&ctx, &paths, region)?,
        Commands::Theme { action } => {
            commands::preferences::theme(&ctx, action.unwrap_or(ThemeAction::Show))?
        }
        Commands::Consent { action } => {
            commands::preferences::consent(&ctx, action.unwrap_or(ConsentAction::Show))?
        }
        Commands::Overlays {
            newsletter_delay,
            modals,
        } => commands::overlays::run(&ctx, newsletter_delay, &modals).await?,
        Commands::Config => commands::context::print_config(&ctx)?,
    }

    Ok(())
}
