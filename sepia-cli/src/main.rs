//! Sepia CLI
//!
//! Rewrites the stylesheets of an HTML document: grayscale colors, remove
//! hidden content, drop dead selectors.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use sepia_dom::DomTree;
use sepia_html::parse_document_with_issues;
use sepia_transform::{HiddenTarget, PassKind, Pipeline, RewriteReport, StylesheetRewriter};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Sepia: stylesheet transformation for HTML documents
#[derive(Parser, Debug)]
#[command(name = "sepia")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Grayscale every color in a page
    sepia --pass grayscale page.html -o gray.html

    # Remove hidden content, then drop selectors that no longer match
    sepia --pass remove-hidden --pass dead-code page.html

    # Treat visibility:hidden as hidden instead of display:none
    sepia --pass remove-hidden --hidden-property visibility --hidden-value hidden page.html

    # Rewrite inline HTML and print a JSON report
    sepia --html '<p style="color:red">x</p>' --pass grayscale --report json
"#)]
struct Cli {
    /// Path to the HTML file to rewrite
    #[arg(value_name = "FILE", required_unless_present = "html")]
    path: Option<PathBuf>,

    /// Rewrite this HTML string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Pass to run; repeat to run several, in the order given
    #[arg(long = "pass", value_name = "PASS", required = true)]
    passes: Vec<PassKind>,

    /// Property that marks content as hidden (remove-hidden)
    #[arg(long, default_value = "display")]
    hidden_property: String,

    /// Value of the hidden property that marks content as hidden (remove-hidden)
    #[arg(long, default_value = "none")]
    hidden_value: String,

    /// Write the rewritten document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// How to print the rewrite summary (on stderr)
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Log more; repeat for more detail (overridden by SEPIA_LOG)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let html = load_html(&cli)?;
    let (mut tree, issues) = parse_document_with_issues(&html);
    for issue in &issues {
        debug!(token = issue.token_index, "{}", issue.message);
    }

    let pipeline = Pipeline::new(cli.passes.iter().copied()).with_hidden_target(HiddenTarget::new(
        cli.hidden_property.clone(),
        cli.hidden_value.clone(),
    ));
    info!(passes = ?pipeline.passes, "rewriting");
    let report = StylesheetRewriter::new(&mut tree).run_pipeline(&pipeline);

    write_output(&cli, &tree)?;
    print_report(&report, cli.report)
}

/// Install a subscriber on stderr. `SEPIA_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("SEPIA_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load document from CLI arguments
fn load_html(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        bail!("a FILE or --html is required")
    }
}

fn write_output(cli: &Cli, tree: &DomTree) -> Result<()> {
    let html = tree.to_html();
    match cli.output {
        Some(ref path) => {
            fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            println!("{html}");
            Ok(())
        }
    }
}

fn print_report(report: &RewriteReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Json => {
            eprintln!("{}", serde_json::to_string_pretty(report)?);
        }
        ReportFormat::Text => {
            eprintln!("{}", "=== Sepia Report ===".bold());
            print_count("sources rewritten", report.sources_rewritten);
            print_count("sources skipped", report.sources_skipped);
            print_count("rules removed", report.rules_removed);
            print_count("elements removed", report.elements_removed);
            print_count("colors rewritten", report.colors_rewritten);
            if report.sources_skipped > 0 {
                eprintln!(
                    "{}",
                    "some style sources could not be parsed and were left unchanged".yellow()
                );
            }
        }
    }
    Ok(())
}

fn print_count(label: &str, count: usize) {
    if count == 0 {
        eprintln!("  {label:<18} {}", count.dimmed());
    } else {
        eprintln!("  {label:<18} {}", count.green());
    }
}
