//! MediaVault - Lazy, access-gated two-tier media cache
//!
//! Command-line driver for the media facade.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mediavault::{
    config::MediaVaultConfig,
    output::{ConsoleSink, OutputSink},
    MediaFacade,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mediavault")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Lazy, access-gated two-tier media cache")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MEDIAVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through a scripted gallery session
    Demo,

    /// View resources as a principal
    View {
        /// Principal performing the view
        #[arg(short, long)]
        user: String,

        /// Keys to preload into the intrinsic store first
        #[arg(long, value_delimiter = ',')]
        preload: Vec<String>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        /// Resource keys, viewed in order
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mediavault={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = if let Some(config_path) = cli.config {
        MediaVaultConfig::load(&config_path)?
    } else {
        MediaVaultConfig::default()
    };

    match cli.command {
        Commands::Demo => {
            run_demo(&config).await?;
        }
        Commands::View {
            user,
            preload,
            json,
            keys,
        } => {
            run_view(&config, &user, &preload, &keys, json).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

fn console() -> Arc<dyn OutputSink> {
    Arc::new(ConsoleSink)
}

async fn run_demo(config: &MediaVaultConfig) -> Result<()> {
    let facade = MediaFacade::new(config, console());
    let admin = config.access.admin_principal.as_str();
    let private = format!("{}secret_event.png", config.access.restricted_prefix);

    let gallery = vec![
        "img_sunset.jpg".to_string(),
        "img_sunset.jpg".to_string(),
        "img_portrait.jpg".to_string(),
        "img_portrait.jpg".to_string(),
        "img_portrait.jpg".to_string(),
        private.clone(),
        "img_landscape.jpg".to_string(),
        "img_sunset.jpg".to_string(),
        "img_landscape.jpg".to_string(),
    ];

    println!("=== Lazy gallery view through the proxy ===");
    facade.view_batch(gallery.as_slice(), "alice").await?;
    facade.report_stats().await;

    println!();
    println!("=== Restricted resource, regular user ===");
    facade.view_one(&private, "bob").await?;

    println!();
    println!("=== Restricted resource, admin ===");
    facade.view_one(&private, admin).await?;
    facade.report_stats().await;

    println!();
    println!("=== Preload into the intrinsic store ===");
    facade
        .preload(&["img_new.png", "img_portrait.jpg", "img_landscape.jpg"])
        .await?;
    facade.report_stats().await;

    println!();
    println!("=== Invalidate resources and view again ===");
    facade.invalidate().await;
    facade
        .view_batch(&["img_sunset.jpg", "img_portrait.jpg"], "charlie")
        .await?;
    facade.report_stats().await;

    println!();
    println!("=== Summary ===");
    println!("Intrinsic payloads built: {}", facade.store().constructions());
    println!("Resources built: {}", facade.cache().constructions());
    println!("Resource cache entries: {}", facade.cache().size().await);

    Ok(())
}

async fn run_view(
    config: &MediaVaultConfig,
    user: &str,
    preload: &[String],
    keys: &[String],
    json: bool,
) -> Result<()> {
    let facade = MediaFacade::new(config, console());

    if !preload.is_empty() {
        facade.preload(preload).await?;
    }
    facade.view_batch(keys, user).await?;

    if json {
        let stats = facade.stats().await;
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        facade.report_stats().await;
    }

    Ok(())
}

fn show_config(config: Option<&MediaVaultConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    println!("{}", config.to_toml()?);
    Ok(())
}
