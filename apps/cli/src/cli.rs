use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "verdict", version, about = "Run categorized prompts through a local model and score the verdicts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send every prompt to the model and save the responses.
    Run(RunArgs),
    /// Aggregate Yes/No scores per category from a saved responses file.
    Report(ReportArgs),
}

/// A prompt text file, optionally tagged with a category: `[LABEL=]FILE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptFileArg {
    pub label: Option<String>,
    pub path: PathBuf,
}

fn parse_prompt_file(value: &str) -> Result<PromptFileArg, String> {
    let (label, path) = match value.split_once('=') {
        Some((label, path)) => (Some(label.trim().to_string()), path.trim()),
        None => (None, value.trim()),
    };
    if path.is_empty() {
        return Err(format!("missing file in '{value}'"));
    }
    if label.as_deref() == Some("") {
        return Err(format!("empty label in '{value}'"));
    }
    Ok(PromptFileArg {
        label,
        path: PathBuf::from(path),
    })
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Prompt file, one prompt per line (repeatable).
    #[arg(long = "prompts", value_name = "[LABEL=]FILE", value_parser = parse_prompt_file)]
    pub prompts: Vec<PromptFileArg>,

    /// CSV prompt file with `text` and `label` columns (repeatable).
    #[arg(long = "csv", value_name = "FILE")]
    pub csv: Vec<PathBuf>,

    /// Shared context file prepended to every prompt.
    #[arg(long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Where to write the responses.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub model: Option<String>,

    /// Generation endpoint URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Pause between prompts, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Keep the leading `ANS:` label in saved answers.
    #[arg(long)]
    pub keep_answer_label: bool,

    /// Print the category report once the batch is saved.
    #[arg(long)]
    pub report: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Responses file written by `run`.
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Also write the report as JSON.
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}
