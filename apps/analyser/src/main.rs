use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{AnalyserClient, ControllerOutcome, StatusRegion};
use shared::domain::FormField;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod page;

use config::{load_settings, normalize_server_url};
use page::{describe, read_report, AnalyserPage};

#[derive(Parser, Debug)]
#[command(name = "analyser", about = "Cardiovascular risk analyser client")]
struct Args {
    /// Base URL of the analyser service; overrides analyser.toml and env.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a report and show the fields extracted from it.
    Extract { report: PathBuf },
    /// Submit the health-metrics form and show the risk tier.
    Predict {
        /// Pre-fill the form from this report before submitting.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Set a form input, e.g. `--field ap_hi=130`. Applied after extraction.
        #[arg(long = "field", value_parser = parse_field_override)]
        fields: Vec<(FormField, String)>,
    },
    /// Send feedback from the contact page.
    Feedback {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        review: String,
    },
}

fn parse_field_override(raw: &str) -> Result<(FormField, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    let field = name.parse::<FormField>().map_err(|err| err.to_string())?;
    Ok((field, value.trim().to_string()))
}

fn finish(outcome: ControllerOutcome, region: &StatusRegion) -> Result<()> {
    println!("{}", describe(region));
    match outcome {
        ControllerOutcome::Succeeded => Ok(()),
        ControllerOutcome::Busy => bail!("a previous request is still in flight"),
        ControllerOutcome::Failed(message) | ControllerOutcome::Rejected(message) => {
            bail!(message)
        }
    }
}

async fn run_upload(page: &AnalyserPage, report: &Path) -> Result<()> {
    page.file_input.select(read_report(report).await?);
    let outcome = page.upload.on_upload().await;
    finish(outcome, &page.upload_status)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }
    let server_url = normalize_server_url(&settings.server_url)?;
    info!(%server_url, timeout_secs = settings.request_timeout_secs, "using analyser service");

    let client = AnalyserClient::with_timeout(&server_url, settings.request_timeout())
        .context("failed to build analyser client")?;
    let page = AnalyserPage::new(Arc::new(client));

    match args.command {
        Command::Extract { report } => {
            run_upload(&page, &report).await?;
            for (field, value) in page.filled_fields() {
                println!("{field}: {value}");
            }
        }
        Command::Predict { report, fields } => {
            if let Some(report) = report {
                run_upload(&page, &report).await?;
            }
            for (field, value) in fields {
                page.manual_form.set(field, value);
            }
            let outcome = page.prediction.on_submit().await;
            finish(outcome, &page.result_text)?;
        }
        Command::Feedback { name, review } => {
            page.feedback_form.set_name(name);
            page.feedback_form.set_review(review);
            let outcome = page.feedback.on_submit().await;
            finish(outcome, &page.feedback_status)?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
