use clap::Parser;
use inlove_desk::cli::Cli;
use inlove_desk::commands;
use inlove_desk::utils::init_logger_with_file;
use inlove_desk::Config;
use shared::error::AppError;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::debug!(catalog = %config.catalog_path, preset = %config.label_preset, "Configuration loaded");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown requested");
                signal_token.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Failed to listen for Ctrl+C"),
        }
    });

    match commands::execute(cli.command, &config, cli.json, shutdown).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) if cli.json => {
            let app: AppError = err.into();
            println!("{}", serde_json::to_string_pretty(&app)?);
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}
