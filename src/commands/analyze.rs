use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::{AppConfig, SafetyProfile};
use crate::models::AnalysisResult;
use crate::pipeline::AnalysisPipeline;
use crate::prompts;

pub struct AnalyzeOptions {
    pub template: String,
    pub files: Vec<PathBuf>,
    pub safety: Option<SafetyProfile>,
    pub json: bool,
}

pub async fn analyze_upload(options: AnalyzeOptions) -> Result<ExitCode> {
    let template = prompts::lookup(&options.template)?;
    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(safety) = options.safety {
        config.safety = safety;
    }
    debug!(?config, "configuration loaded");

    let pipeline = AnalysisPipeline::from_config(&config);
    let Some(result) = pipeline.process_upload(template, &options.files).await else {
        return Ok(ExitCode::SUCCESS);
    };

    if options.json {
        let payload = serde_json::to_string_pretty(&result.to_payload())
            .context("Unable to serialise analysis result")?;
        println!("{payload}");
    } else {
        render(&result);
    }

    Ok(exit_code(&result))
}

const BLOCKED_EXIT_CODE: u8 = 3;

fn render(result: &AnalysisResult) {
    println!("{}", result.source_path().display());
    match failure_message(result) {
        None => println!("\n{}", result.response_text().unwrap_or_default()),
        Some(message) => eprintln!("{message}"),
    }
}

fn failure_message(result: &AnalysisResult) -> Option<String> {
    match &result.outcome {
        Ok(_) => None,
        Err(err) if err.is_content_blocked() => {
            Some(format!("The model declined to analyse this image: {err}"))
        }
        Err(err) => Some(format!("Analysis failed: {err}")),
    }
}

fn exit_code(result: &AnalysisResult) -> ExitCode {
    match &result.outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) if err.is_content_blocked() => ExitCode::from(BLOCKED_EXIT_CODE),
        Err(_) => ExitCode::FAILURE,
    }
}
