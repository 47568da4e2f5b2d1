use std::fs;
use std::path::PathBuf;

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use tempfile::tempdir;
use verdict_cli::cli::{PromptFileArg, ReportArgs, RunArgs};
use verdict_cli::commands;
use verdict_cli::config::Config;
use verdict_harness::store::load_records;
use verdict_harness::Termination;

/// Answers every prompt mentioning "benign" with a Yes verdict and everything
/// else with a truncated No verdict.
async fn generate(Json(body): Json<Value>) -> (StatusCode, String) {
    let prompt = body["prompt"].as_str().unwrap_or_default();
    let answer = if prompt.is_empty() {
        String::new()
    } else if prompt.contains("benign") {
        "ANS: Yes, Yes: 80%, No: 20%".to_string()
    } else {
        "o, Yes: 10%, No: 90%".to_string()
    };
    let lines = [
        serde_json::json!({ "response": "<think>weighing</think>" }).to_string(),
        serde_json::json!({ "response": answer }).to_string(),
        serde_json::json!({ "done": true }).to_string(),
    ];
    (StatusCode::OK, lines.join("\n"))
}

async fn fake_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route("/api/generate", post(generate));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api/generate")
}

fn run_args(prompts: Vec<PromptFileArg>, context: PathBuf, output: PathBuf) -> RunArgs {
    RunArgs {
        prompts,
        csv: Vec::new(),
        context: Some(context),
        output: Some(output),
        model: Some("filter".to_string()),
        endpoint: None,
        delay_ms: Some(0),
        keep_answer_label: false,
        report: false,
    }
}

#[tokio::test]
async fn test_run_then_report() {
    let dir = tempdir().unwrap();
    let safe = dir.path().join("safe.txt");
    let unsafe_prompts = dir.path().join("temp_unsafe.txt");
    let context = dir.path().join("context.txt");
    let output = dir.path().join("responses.json");
    fs::write(&safe, "a benign question\nanother benign one\n").unwrap();
    fs::write(&unsafe_prompts, "something else\n").unwrap();
    fs::write(&context, "Answer with ANS: <verdict>, Yes: n%, No: n%\n").unwrap();

    let config = Config::from_lookup(|_| None);
    let mut args = run_args(
        vec![
            PromptFileArg {
                label: Some("safe".to_string()),
                path: safe,
            },
            PromptFileArg {
                label: Some("temp_unsafe".to_string()),
                path: unsafe_prompts,
            },
        ],
        context,
        output.clone(),
    );
    args.endpoint = Some(fake_backend().await);

    let outcome = commands::run(&config, args).await.unwrap().unwrap();
    assert_eq!(outcome.termination, Termination::Completed);

    let records = load_records(&output).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0].full_prompt(),
        "Answer with ANS: <verdict>, Yes: n%, No: n%\n\na benign question"
    );
    assert_eq!(records[0].thinking(), "weighing");
    assert_eq!(records[0].final_response(), "Yes, Yes: 80%, No: 20%");
    assert_eq!(records[2].final_response(), "No, Yes: 10%, No: 90%");

    let report_path = dir.path().join("report.json");
    let report = commands::report(
        &config,
        ReportArgs {
            input: Some(output),
            json: Some(report_path.clone()),
        },
    )
    .unwrap();
    let averages = report.averages();
    assert_eq!(averages["safe"], (80.0, 20.0));
    assert_eq!(averages["temp_unsafe"], (10.0, 90.0));
    assert!(report_path.exists());
}

#[tokio::test]
async fn test_unreachable_backend_still_saves() {
    let dir = tempdir().unwrap();
    let prompts = dir.path().join("prompts.txt");
    let output = dir.path().join("responses.json");
    fs::write(&prompts, "one\ntwo\n").unwrap();

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config::from_lookup(|_| None);
    let mut args = run_args(
        vec![PromptFileArg {
            label: None,
            path: prompts,
        }],
        dir.path().join("missing-context.txt"),
        output.clone(),
    );
    args.endpoint = Some(format!("http://{addr}/api/generate"));

    let outcome = commands::run(&config, args).await.unwrap().unwrap();
    assert_eq!(outcome.termination, Termination::ResetFailed { index: 0 });
    assert!(load_records(&output).unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_prompt_file_skips_run() {
    let dir = tempdir().unwrap();
    let prompts = dir.path().join("prompts.txt");
    let output = dir.path().join("responses.json");
    fs::write(&prompts, "\n   \n").unwrap();

    let config = Config::from_lookup(|_| None);
    let args = run_args(
        vec![PromptFileArg {
            label: None,
            path: prompts,
        }],
        dir.path().join("context.txt"),
        output.clone(),
    );

    assert!(commands::run(&config, args).await.unwrap().is_none());
    assert!(!output.exists());
}
