//! Check command

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};
use unwanted_core::{evaluate_concurrent, Report, ReportPresenter, Settings};

use super::common;
use crate::cli::CheckArgs;
use crate::output;
use crate::presenter::{MarketplacePrompt, OutputFormat, TerminalPresenter};

pub async fn run(args: CheckArgs, settings: &Settings) -> Result<()> {
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let prompt = if args.yes {
        MarketplacePrompt::Always
    } else {
        MarketplacePrompt::Ask
    };
    let mut presenter = TerminalPresenter::new(format, prompt)
        .with_color(settings.display.color_enabled)
        .with_verbose(settings.display.verbose);

    let Some(policy) = common::load_policy(&args.workspace, settings).await? else {
        // stdout stays a JSON document even without configuration
        if args.json {
            presenter.present(&Report::default())?;
        }
        return Ok(());
    };

    if !policy.has_unwanted() {
        if args.json {
            presenter.present(&Report::default())?;
        } else {
            output::info("No unwanted recommendations found.");
        }
        return Ok(());
    }

    let source = common::installed_source(
        args.installed.as_ref(),
        args.extensions_dir.as_ref(),
        settings,
    )?;
    let installed = source
        .load()
        .with_context(|| format!("Failed to read installed extensions from {}", source.describe()))?;
    info!(
        "Checking {} installed extensions from {}",
        installed.len(),
        source.describe()
    );

    let evaluation = evaluate_concurrent(Arc::new(policy), Arc::from(installed)).await?;
    debug!("Unwanted extensions enabled: {:?}", evaluation.hit_ids());

    let report = Report::from_evaluation(&evaluation);
    presenter.present(&report)?;

    if args.strict && !report.is_clean() {
        anyhow::bail!("{}", report.summary());
    }

    Ok(())
}
