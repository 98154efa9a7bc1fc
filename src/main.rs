//! CodePilot - AI coding assistant on the command line
//!
//! Drives the suggestion coordinator, the conversation engine and the report
//! actions against the Gemini gateway for a single source file.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use codepilot_core::{
    types::{Issue, MessagePart},
    CodeBuffer, CodePilotConfig, ConversationEngine, DeadlineService, EditSuggestionCoordinator,
    GeminiService, GenerativeService, Language, ReportDesk, ReportSlot,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codepilot")]
#[command(about = "AI suggestions, chat, analysis and test generation for source files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Language of the input (defaults to the file extension)
    #[arg(short, long, global = true)]
    language: Option<Language>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Improvement suggestions for a file
    Suggest {
        file: PathBuf,

        /// Skip the quiet period
        #[arg(long)]
        now: bool,
    },

    /// Ask a question about a file
    Ask { file: PathBuf, query: String },

    /// Bug, performance and complexity report
    Analyze { file: PathBuf },

    /// Generate test cases for a file
    GenTests { file: PathBuf },

    /// Predict the results of a test file
    RunTests { file: PathBuf },

    /// Explain an error message
    ExplainError { message: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("codepilot={}", level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("CodePilot v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = CodePilotConfig::load(cli.config.as_deref())?;
    let deadline = config.gateway.timeout()?;
    let gateway = GeminiService::new(config.gateway.clone())
        .context("Failed to initialize generative service")?;
    let service: Arc<dyn GenerativeService> = Arc::new(DeadlineService::new(gateway, deadline));

    match cli.command {
        Commands::Suggest { file, now } => {
            let buffer = read_buffer(&file, cli.language).await?;
            let coordinator =
                EditSuggestionCoordinator::new(service, config.suggestions.quiet_period());

            if now {
                coordinator.force_refresh(buffer.content).await;
            } else {
                let mut state = coordinator.subscribe();
                coordinator.submit_edit(buffer.content);
                info!(
                    "Waiting {:?} quiet period before requesting suggestions",
                    config.suggestions.quiet_period()
                );
                state
                    .wait_for(|s| !s.phase.is_busy())
                    .await
                    .context("Suggestion coordinator closed")?;
            }

            for (i, suggestion) in coordinator.suggestions().iter().enumerate() {
                println!("{}. {}", i + 1, suggestion);
            }
        }

        Commands::Ask { file, query } => {
            let buffer = read_buffer(&file, cli.language).await?;
            let engine = ConversationEngine::new(service);
            let id = engine.send(&buffer, &query).await?;

            if let Some(turn) = engine.turn(id) {
                for part in &turn.parts {
                    match part {
                        MessagePart::Text { content } => print!("{}", content),
                        MessagePart::Code {
                            content,
                            language_hint,
                        } => print!("\n```{}\n{}```\n", language_hint, content),
                    }
                }
                println!();
            }
        }

        Commands::Analyze { file } => {
            let buffer = read_buffer(&file, cli.language).await?;
            let desk = ReportDesk::new(service);
            let report = desk
                .analyze_code(&buffer)
                .await
                .ok_or_else(|| failure(desk.analysis()))?;

            println!("Issues:");
            if report.issues.is_empty() {
                println!("  none found");
            }
            for Issue {
                kind,
                line,
                message,
            } in &report.issues
            {
                println!("  [{}] line {}: {}", kind, line, message);
            }

            println!("\nPerformance: {}/100", report.performance_score);
            for suggestion in &report.performance_suggestions {
                println!("  - {}", suggestion);
            }

            println!("\nComplexity: {}", report.complexity_score);
            println!("  {}", report.complexity_details);
        }

        Commands::GenTests { file } => {
            let buffer = read_buffer(&file, cli.language).await?;
            let desk = ReportDesk::new(service);
            let tests = desk
                .generate_tests(&buffer)
                .await
                .ok_or_else(|| failure(desk.generated_tests()))?;

            println!("{}", tests);
        }

        Commands::RunTests { file } => {
            let buffer = read_buffer(&file, cli.language).await?;
            let desk = ReportDesk::new(service);
            let prediction = desk
                .predict_test_results(buffer.language, &buffer.content)
                .await
                .ok_or_else(|| failure(desk.prediction()))?;

            println!("Passed:   {}", prediction.passed);
            println!("Failed:   {}", prediction.failed);
            println!("Total:    {}", prediction.total);
            println!("Coverage: {}", prediction.coverage);
            println!("Duration: {}", prediction.duration);
        }

        Commands::ExplainError { message } => {
            if message.trim().is_empty() {
                return Err(anyhow!("Error message is empty"));
            }

            let desk = ReportDesk::new(service);
            let diagnosis = desk
                .diagnose_error(&message)
                .await
                .ok_or_else(|| failure(desk.diagnosis()))?;

            println!("Error Type:   {}", diagnosis.error_type);
            println!("Likely Cause: {}", diagnosis.cause);
            println!("Solutions:");
            for solution in &diagnosis.solutions {
                println!("  - {}", solution);
            }
        }
    }

    Ok(())
}

/// Read `path` into a buffer, taking the language from the flag or extension
async fn read_buffer(path: &Path, language: Option<Language>) -> anyhow::Result<CodeBuffer> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let language = language
        .or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(Language::from_extension)
        })
        .unwrap_or_default();

    debug!("Loaded {} as {}", path.display(), language);
    Ok(CodeBuffer::new(content, language))
}

fn failure<T: Clone>(slot: &ReportSlot<T>) -> anyhow::Error {
    anyhow!(slot
        .banner()
        .unwrap_or_else(|| "Request did not complete".to_string()))
}
