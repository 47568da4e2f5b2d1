use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use verdict_harness::store::{load_records, save_records};
use verdict_harness::{
    read_context, BatchOutcome, CategoryReport, ChainedPromptSource, CsvPromptSource,
    FixedDelayPacer, OllamaBackend, OllamaConfig, ParserConfig, PromptDispatcher, PromptSource,
    ResponseParser, TextFilePromptSource,
};

use crate::cli::{ReportArgs, RunArgs};
use crate::config::Config;

/// Builds the prompt source from the command line, falling back to the
/// configured unlabeled prompts file.
pub fn prompt_source(config: &Config, args: &RunArgs) -> ChainedPromptSource {
    let mut source = ChainedPromptSource::new();
    for file in &args.prompts {
        source.push(TextFilePromptSource::new(&file.path, file.label.clone()));
    }
    for path in &args.csv {
        source.push(CsvPromptSource::new(path));
    }
    if source.is_empty() {
        source.push(TextFilePromptSource::new(&config.prompts_file, None));
    }
    source
}

pub fn build_dispatcher(config: &Config, args: &RunArgs) -> PromptDispatcher {
    let backend = OllamaBackend::new(OllamaConfig {
        endpoint: args
            .endpoint
            .clone()
            .unwrap_or_else(|| config.endpoint.clone()),
        request_timeout: config.request_timeout,
    });
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(config.request_delay);
    let parser = ResponseParser::new(ParserConfig {
        answer_label: if args.keep_answer_label {
            None
        } else {
            ParserConfig::default().answer_label
        },
        ..ParserConfig::default()
    });
    let model = args.model.clone().unwrap_or_else(|| config.model.clone());

    PromptDispatcher::new(Arc::new(backend), model)
        .with_parser(parser)
        .with_pacer(Arc::new(FixedDelayPacer::new(delay)))
}

/// Runs the batch and saves whatever was collected. Returns `None` when there
/// was nothing to send.
pub async fn run(config: &Config, args: RunArgs) -> anyhow::Result<Option<BatchOutcome>> {
    let source = prompt_source(config, &args);
    let prompts = source
        .load()
        .with_context(|| format!("Failed to load prompts from {}", source.describe()))?;
    if prompts.is_empty() {
        tracing::warn!("No prompts found in {}", source.describe());
        return Ok(None);
    }

    let context_file = args.context.as_ref().unwrap_or(&config.context_file);
    let context = read_context(context_file);
    let output = args.output.as_ref().unwrap_or(&config.output_file);

    let dispatcher = build_dispatcher(config, &args);
    tracing::info!(
        "Running {} prompts through {} (context: {} chars)",
        prompts.len(),
        dispatcher.model(),
        context.len()
    );

    let outcome = dispatcher.run_batch(&context, &prompts).await;

    save_records(output, &outcome.records)
        .with_context(|| format!("Failed to save responses to {}", output.display()))?;
    tracing::info!(
        "Batch {}: {} of {} prompts answered, {} skipped {:?}",
        outcome.termination,
        outcome.records.len(),
        prompts.len(),
        outcome.skipped.len(),
        outcome.skipped
    );

    if args.report {
        print!("{}", CategoryReport::from_records(&outcome.records).render_table());
    }

    Ok(Some(outcome))
}

pub fn report(config: &Config, args: ReportArgs) -> anyhow::Result<CategoryReport> {
    let input = args.input.as_ref().unwrap_or(&config.output_file);
    let records = load_records(input)
        .with_context(|| format!("Failed to read responses from {}", input.display()))?;

    let report = CategoryReport::from_records(&records);
    if report.unscored_records() > 0 {
        tracing::warn!(
            "{} labeled responses had no verdict trailer and were excluded",
            report.unscored_records()
        );
    }
    print!("{}", report.render_table());

    if let Some(path) = &args.json {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(report)
}
