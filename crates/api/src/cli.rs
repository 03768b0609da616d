//! Command-line surface of the `cmi-extractor` binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use cmi_extraction::{BatchPolicy, DocumentExtractor, SourceDocument, run_batch};

use crate::session::Session;

#[derive(Parser, Debug)]
#[command(name = "cmi-extractor", version, about = "CMI statement extraction and accounting export")]
pub struct Cli {
    /// Log output format (`json` or `text`); overrides CMI_LOG_FORMAT.
    #[arg(long = "log-format", global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Bind address; overrides CMI_LISTEN_ADDR.
        #[arg(long)]
        listen: Option<String>,
    },
    /// Extract one batch of statements and write the workbook.
    Extract {
        /// PDF statements, processed in the given order.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory receiving CMI_EXTRACTOR_<date>.xlsx.
        #[arg(long = "out-dir", default_value = ".")]
        out_dir: PathBuf,

        /// Keep invoices from files processed before a failing one.
        #[arg(long = "commit-succeeded")]
        commit_succeeded: bool,
    },
}

/// Result of one `extract` run.
#[derive(Debug)]
pub struct ExtractSummary {
    pub invoices: usize,
    pub skipped: usize,
    /// `None` when the batch produced no invoices.
    pub workbook: Option<PathBuf>,
}

async fn read_documents(files: &[PathBuf]) -> anyhow::Result<Vec<SourceDocument>> {
    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(SourceDocument::new(name, None, bytes));
    }
    Ok(documents)
}

/// Run one batch and write its workbook into `out_dir`.
///
/// Fails (after writing whatever the policy committed) when any file failed.
pub async fn run_extract(
    extractor: &dyn DocumentExtractor,
    files: &[PathBuf],
    out_dir: &Path,
    policy: BatchPolicy,
    date: NaiveDate,
) -> anyhow::Result<ExtractSummary> {
    let documents = read_documents(files).await?;

    let mut session = Session::new();
    session.begin_submission()?;
    let outcome = run_batch(extractor, &documents, policy).await;
    let failed_file = outcome.failure.as_ref().map(|f| f.file.clone());
    let report = session.finish_submission(outcome);

    let totals = session.totals();
    tracing::info!(
        invoices = session.len(),
        total_remise = %totals.total_remise,
        total_commissions_ht = %totals.total_commissions_ht,
        total_vat_on_commissions = %totals.total_vat_on_commissions,
        net_balance_after_remise = %totals.net_balance_after_remise,
        pos_rental_fee = %totals.pos_rental_fee,
        "batch totals"
    );

    let workbook = match session.export_workbook(date)? {
        Some(export) => {
            let path = export.write_to_dir(out_dir)?;
            tracing::info!(path = %path.display(), "workbook written");
            Some(path)
        }
        None => None,
    };

    if let Some(file) = failed_file {
        bail!("{} (failed on {file})", session.error().unwrap_or_default());
    }

    Ok(ExtractSummary {
        invoices: report.added,
        skipped: report.skipped,
        workbook,
    })
}
