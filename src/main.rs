//! SIORMA command-line client
//!
//! Main application entry point

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info};

use siorma::{
    cli::{self, App, Cli},
    client::ApiClient,
    config::Settings,
    i18n::I18n,
    services::ServiceFactory,
    session::SessionContext,
    utils::{errors::ErrorSeverity, logging},
};

#[tokio::main]
async fn main() -> ExitCode {
    match start().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("siorma: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn start() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let args = Cli::parse();

    // Load configuration
    let settings = match &args.config {
        Some(path) => Settings::from_file(&path.to_string_lossy()),
        None => Settings::new(),
    }
    .context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on drop
    let _log_guard = logging::init_logging(&settings.logging)?;
    info!("{} starting", siorma::info());

    let session = Arc::new(SessionContext::from_config(&settings.session));
    let client = ApiClient::new(&settings.api, session)?;
    debug!(base_url = %client.base_url(), "API client ready");

    let i18n = I18n::from_config(&settings.i18n).await?;
    let lang = match args.lang.as_deref() {
        Some(requested) => i18n.detect_language(Some(requested)),
        None => settings.i18n.default_language.clone(),
    };

    let app = App::new(settings, ServiceFactory::new(client), i18n, lang);

    match cli::run(args, &app).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            match &e {
                // stderr already carries the translated message
                cli::CliError::Siorma(inner) => match inner.severity() {
                    ErrorSeverity::Critical => error!(error = %inner, "Command failed"),
                    ErrorSeverity::Error => info!(error = %inner, "Command failed"),
                    severity => debug!(%severity, error = %inner, "Command rejected"),
                },
                other => debug!(error = %other, "Guard stopped the command"),
            }
            eprintln!("{}", app.describe_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}
