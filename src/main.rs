mod cli;

use wbprovider::config::{self, Config};
use wbprovider::metadata::{
    EnrichmentService, ImageSource, MediaQuery, MetadataSource, ServerAddress,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use std::path::Path;
use tokio_util::sync::CancellationToken;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve the server address from config plus CLI overrides.
fn server_address(config: &Config, cli: &Cli) -> ServerAddress {
    let base = config.server.address();
    ServerAddress::new(
        cli.server_ip.clone().unwrap_or_else(|| base.host().to_string()),
        cli.server_port.unwrap_or(base.port()),
    )
}

/// Cancellation token that fires on Ctrl-C.
fn ctrl_c_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let child = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling request");
            child.cancel();
        }
    });
    cancel
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.command {
        Commands::Validate { config: Some(path) } => config::load_config(path)?,
        _ => config::load_config_or_default(cli.config.as_deref())?,
    };
    let address = server_address(&config, &cli);
    let service = EnrichmentService::from_config(&config)
        .context("Failed to build metadata client")?;
    let cancel = ctrl_c_token();

    tracing::debug!(server = %address, "Using metadata server");

    match cli.command {
        Commands::Enrich { path, name, year } => {
            let display_name = name.unwrap_or_else(|| {
                Path::new(&path)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let query = MediaQuery::new(display_name, path).with_year(year);
            let result = service.enrich(&address, &query, &cancel).await;
            print_json(&result)
        }
        Commands::Search { query } => {
            let results = service.search(&address, &query, &cancel).await;
            print_json(&results)
        }
        Commands::Images { path } => {
            let query = MediaQuery::new(String::new(), path);
            let images = service.resolve_images(&address, &query, &cancel).await;
            print_json(&images)
        }
        Commands::Image { url, output } => {
            let image = service
                .image_response(&url, &cancel)
                .await
                .with_context(|| format!("Image not found: {}", url))?;

            match output {
                Some(output) => {
                    tokio::fs::write(&output, &image.bytes)
                        .await
                        .with_context(|| format!("Failed to write image: {:?}", output))?;
                    println!(
                        "Wrote {} bytes ({}) to {}",
                        image.len(),
                        image.content_type,
                        output.display()
                    );
                }
                None => println!("{} bytes, {}", image.len(), image.content_type),
            }
            Ok(())
        }
        Commands::Translate { path } => {
            println!("{}", service.client().translator().translate(&path));
            Ok(())
        }
        Commands::Validate { .. } => {
            print_config_summary(&config);
            Ok(())
        }
    }
}

fn print_config_summary(config: &Config) {
    println!("Configuration is valid");
    println!("  Server: {}", config.server.address());
    println!("  Timeout: {}s", config.client.timeout_secs);
    for share in &config.shares {
        println!(
            "  Share: \\\\{}\\{} -> {}",
            share.host, share.share, share.local_root
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "wbprovider=debug".to_string()
        } else {
            "wbprovider=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli))
}
