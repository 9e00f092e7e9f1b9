//! Terminal rendering of check reports
//!
//! Human output prints one warning per finding with its own marketplace
//! search, then a summary and, once confirmed, the search covering every
//! finding. JSON output prints the whole report in one document.

use console::Term;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use serde::Serialize;
use unwanted_core::{Diagnostic, Error, Finding, Report, ReportPresenter, Result};

/// Output format for check reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable colored output
    #[default]
    Human,
    /// JSON format for machine consumption
    Json,
}

/// How to decide whether to print the marketplace search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketplacePrompt {
    /// Ask on a terminal, skip otherwise
    Ask,
    /// Print without asking
    Always,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    summary: String,
    findings: &'a [Finding],
    diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    marketplace_query: Option<String>,
}

/// Presents reports on stdout
pub struct TerminalPresenter {
    format: OutputFormat,
    prompt: MarketplacePrompt,
    color: bool,
    verbose: bool,
}

impl TerminalPresenter {
    pub fn new(format: OutputFormat, prompt: MarketplacePrompt) -> Self {
        Self {
            format,
            prompt,
            color: true,
            verbose: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Show every diagnostic, not just the count
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Render a report as JSON
    pub fn format_json(&self, report: &Report) -> Result<String> {
        let document = JsonReport {
            summary: report.summary(),
            findings: &report.findings,
            diagnostics: &report.diagnostics,
            marketplace_query: report.marketplace_query(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Render the findings and summary for a terminal
    pub fn format_human(&self, report: &Report) -> String {
        let mut output = String::new();

        for finding in &report.findings {
            output.push_str(&format!("{} {}\n", self.paint_warning("⚠"), finding.message));
            if finding.can_show_in_marketplace {
                output.push_str(&format!(
                    "  {}\n",
                    self.paint_dim(&format!("marketplace: {}", finding.marketplace_query))
                ));
            }
        }

        if !report.diagnostics.is_empty() {
            if self.verbose {
                for diagnostic in &report.diagnostics {
                    output.push_str(&format!("  {}\n", self.paint_dim(&format!("note: {}", diagnostic))));
                }
            } else {
                output.push_str(&format!(
                    "  {}\n",
                    self.paint_dim(&format!(
                        "{} policy entries could not be checked (use -v for details)",
                        report.diagnostics.len()
                    ))
                ));
            }
        }

        let summary = report.summary();
        if report.is_clean() {
            output.push_str(&format!("{} {}\n", self.paint_success("✓"), summary));
        } else {
            output.push_str(&format!(
                "{} {}\n",
                self.paint_warning("⚠"),
                self.paint_bold(&summary)
            ));
        }

        output
    }

    fn should_show_marketplace(&self) -> Result<bool> {
        match self.prompt {
            MarketplacePrompt::Always => Ok(true),
            MarketplacePrompt::Ask if !Term::stderr().is_term() => Ok(false),
            MarketplacePrompt::Ask => Confirm::new()
                .with_prompt("Show these extensions in the marketplace?")
                .default(false)
                .interact()
                .map_err(|e| Error::Io(std::io::Error::other(e.to_string()))),
        }
    }

    fn paint_warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_success(&self, text: &str) -> String {
        if self.color {
            text.green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

impl ReportPresenter for TerminalPresenter {
    fn present(&mut self, report: &Report) -> Result<()> {
        if self.format == OutputFormat::Json {
            println!("{}", self.format_json(report)?);
            return Ok(());
        }

        print!("{}", self.format_human(report));

        if let Some(query) = report.marketplace_query() {
            if self.should_show_marketplace()? {
                println!("Marketplace search: {}", query);
            }
        }

        Ok(())
    }
}
