use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use cmi_api::app::{AppServices, build_app};
use cmi_api::cli::{Cli, Command, run_extract};
use cmi_api::config::Config;
use cmi_extraction::{BatchPolicy, GeminiExtractor};
use cmi_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    // The CLI extract command is interactive: text logs unless asked otherwise.
    let log_format = match (&cli.log_format, config.log_format, &cli.command) {
        (Some(f), _, _) => f.parse::<LogFormat>().map_err(anyhow::Error::msg)?,
        (None, Some(configured), _) => configured,
        (None, None, Command::Extract { .. }) => LogFormat::Text,
        (None, None, Command::Serve { .. }) => LogFormat::Json,
    };
    cmi_observability::init(log_format);

    if !config.has_credential() {
        tracing::warn!("GEMINI_API_KEY not set; every extraction will fail");
    }

    match cli.command {
        Command::Serve { listen } => {
            if let Some(addr) = listen {
                config.listen_addr = addr;
            }
            serve(config).await
        }
        Command::Extract {
            files,
            out_dir,
            commit_succeeded,
        } => {
            let policy = if commit_succeeded {
                BatchPolicy::CommitSucceeded
            } else {
                config.batch_policy
            };
            let extractor = GeminiExtractor::new(config.gemini.clone());
            let summary = run_extract(
                &extractor,
                &files,
                &out_dir,
                policy,
                chrono::Utc::now().date_naive(),
            )
            .await?;
            tracing::info!(
                invoices = summary.invoices,
                skipped = summary.skipped,
                workbook = ?summary.workbook,
                "extraction finished"
            );
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        model = %config.gemini.model,
        policy = config.batch_policy.as_str(),
        max_upload_bytes = config.max_upload_bytes,
        "starting server"
    );

    let services = Arc::new(AppServices::from_config(&config));
    let app = build_app(services, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
