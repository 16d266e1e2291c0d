//! Web Larek CLI - headless storefront sessions.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! larek catalog
//!
//! # Show one item
//! larek item 854cef69-976d-4c2a-a18c-2aa45046c390
//!
//! # Buy two items, paying online
//! larek checkout -i 854cef69-... -i c101ab44-... \
//!     --payment card --address "Moscow" \
//!     --email user@example.com --phone "+7 900 000-00-00"
//! ```
//!
//! # Commands
//!
//! - `catalog` - Print the catalog
//! - `item` - Print a single item
//! - `checkout` - Drive the storefront through a full purchase
//!
//! The service origin is read from `LAREK_API_ORIGIN` (a `.env` file is
//! honored).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web_larek_core::{ItemId, PaymentMethod};
use web_larek_storefront::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "larek")]
#[command(author, version, about = "Web Larek storefront sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the catalog
    Catalog,
    /// Print a single item
    Item {
        /// Item id
        id: String,
    },
    /// Put items in the basket and place an order
    Checkout {
        /// Item to buy (repeatable)
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Payment method (`card`, `cash`)
        #[arg(short, long, default_value = "card")]
        payment: PaymentMethod,

        /// Delivery address
        #[arg(short, long)]
        address: String,

        /// Contact email
        #[arg(short, long)]
        email: String,

        /// Contact phone
        #[arg(long)]
        phone: String,

        /// Print the final page markup
        #[arg(long)]
        html: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "web_larek_storefront=info,web_larek_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog => commands::catalog::list(config).await?,
        Commands::Item { id } => commands::catalog::show(config, &ItemId::new(id)).await?,
        Commands::Checkout {
            items,
            payment,
            address,
            email,
            phone,
            html,
        } => {
            let purchase = commands::checkout::Purchase {
                items: items.into_iter().map(ItemId::new).collect(),
                payment,
                address,
                email,
                phone,
            };
            commands::checkout::run(config, &purchase, html).await?;
        }
    }
    Ok(())
}
