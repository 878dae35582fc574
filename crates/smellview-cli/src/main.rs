use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use smellview_core::config::{Config, load_config};
use smellview_core::input::{ReportInput, read_report};
use smellview_core::report::model::{ReportDocument, ToolInfo};
use smellview_core::report::render;

mod args;
#[cfg(feature = "upload")]
mod upload;

fn main() -> Result<()> {
    let args = args::Args::parse();
    init_tracing(args.verbose);

    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let config = load_config(&cwd, args.config.as_deref())?;

    let policy = args
        .count_policy
        .map(Into::into)
        .unwrap_or_else(|| config.count_policy());
    let show_source = args.source || config.show_source();

    let input = fetch_input(&args, &config)?;

    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let source = Some(input.source_info());
    let document = match input
        .parse()
        .and_then(|raw| smellview_core::view(&raw, policy))
    {
        Ok(view) => ReportDocument::new(tool, source, &view),
        Err(err) => {
            warn!(%err, "no results to show");
            ReportDocument::no_results(tool, source, &err)
        }
    };

    let output = match args.format {
        args::OutputFormat::Json => serde_json::to_string_pretty(&document)? + "\n",
        args::OutputFormat::Text => render::render_text(&document, show_source),
    };

    match args.out {
        Some(path) => std::fs::write(&path, &output)
            .with_context(|| format!("failed to write output: {}", path.display()))?,
        None => print!("{output}"),
    }

    std::process::exit(document.status.exit_code());
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "upload")]
fn fetch_input(args: &args::Args, config: &Config) -> Result<ReportInput> {
    if args.upload {
        let server = args.server.as_deref().unwrap_or_else(|| config.server());
        return upload::upload_archive(&args.input, server);
    }
    read_input(&args.input)
}

#[cfg(not(feature = "upload"))]
fn fetch_input(args: &args::Args, _config: &Config) -> Result<ReportInput> {
    read_input(&args.input)
}

fn read_input(path: &Path) -> Result<ReportInput> {
    if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read report from stdin")?;
        debug!(size = bytes.len(), "read report from stdin");
        return Ok(ReportInput::from_bytes(None, bytes));
    }
    read_report(path)
}
