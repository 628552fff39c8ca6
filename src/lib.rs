mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod media;
pub mod models;
pub mod pipeline;
pub mod prompts;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use commands::analyze::{analyze_upload, AnalyzeOptions};
pub use commands::templates::list_templates;
pub use config::{AppConfig, SafetyProfile};
pub use constants::{
    API_KEY_ENV, DEFAULT_GEMINI_ENDPOINT, DEFAULT_MEDIA_MIME, DEFAULT_TEMPLATE_LABEL,
    DEFAULT_VISION_MODEL,
};
pub use error::{AnalysisError, Result};
pub use media::{load_media, MimePolicy};
pub use models::{
    AnalysisRequest, AnalysisResult, AnalysisResultPayload, MediaPayload, PromptTemplate,
};
pub use pipeline::AnalysisPipeline;

/// Analyse an image with a Gemini vision model using a role-specific instruction prompt.
#[derive(Parser, Debug)]
#[command(name = "image-consult", version, about)]
pub struct Cli {
    /// Prompt template label
    #[arg(short, long, default_value = DEFAULT_TEMPLATE_LABEL)]
    pub template: String,

    /// Content-safety profile: default, off or strict. Overrides SAFETY_PROFILE.
    #[arg(long)]
    pub safety: Option<SafetyProfile>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// List the registered prompt templates and exit
    #[arg(long)]
    pub list_templates: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Image files; only the first one is analysed
    #[arg(required_unless_present = "list_templates")]
    pub files: Vec<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("image_consult_lib={level},llmapi={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_templates {
        list_templates();
        return Ok(ExitCode::SUCCESS);
    }

    analyze_upload(AnalyzeOptions {
        template: cli.template,
        files: cli.files,
        safety: cli.safety,
        json: cli.json,
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_template_safety_and_files() {
        let cli = Cli::try_parse_from([
            "image-consult",
            "--template",
            "dentistry",
            "--safety",
            "strict",
            "a.jpg",
            "b.jpg",
        ])
        .unwrap();
        assert_eq!(cli.template, "dentistry");
        assert_eq!(cli.safety, Some(SafetyProfile::BlockMediumAndAbove));
        assert_eq!(cli.files, vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
    }

    #[test]
    fn cli_defaults_to_neurology_template() {
        let cli = Cli::try_parse_from(["image-consult", "scan.jpg"]).unwrap();
        assert_eq!(cli.template, DEFAULT_TEMPLATE_LABEL);
        assert!(cli.safety.is_none());
    }

    #[test]
    fn cli_requires_a_file_unless_listing() {
        assert!(Cli::try_parse_from(["image-consult"]).is_err());
        assert!(Cli::try_parse_from(["image-consult", "--list-templates"]).is_ok());
    }

    #[test]
    fn cli_rejects_unknown_safety_profile() {
        assert!(Cli::try_parse_from(["image-consult", "--safety", "loose", "a.jpg"]).is_err());
    }
}
