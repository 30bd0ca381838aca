//! PromptQA CLI - quality control and agent testing for generated prompts.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use promptqa_agent::{HttpAgentService, TestHarness};
use promptqa_core::{AgentId, QualityConfig, TestStatus};
use promptqa_quality::QualityControl;

#[derive(Parser)]
#[command(name = "promptqa")]
#[command(about = "Quality control and agent testing for generated prompts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate content against a quality config
    Validate {
        /// Path to the quality config (JSON)
        #[arg(long)]
        config: PathBuf,
        /// Content file; reads stdin when omitted
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Print the compiled quality instructions block
    Instructions {
        /// Path to the quality config (JSON)
        #[arg(long)]
        config: PathBuf,
    },
    /// Print a one-line summary of active controls
    Summary {
        /// Path to the quality config (JSON)
        #[arg(long)]
        config: PathBuf,
    },
    /// Run the test battery against an agent
    Test {
        /// Agent service base URL
        #[arg(long)]
        url: String,
        /// Agent ID
        #[arg(long)]
        agent: String,
        /// Keywords to generate against
        keywords: Vec<String>,
    },
    /// Generate a full test report for an agent
    Report {
        /// Agent service base URL
        #[arg(long)]
        url: String,
        /// Agent ID
        #[arg(long)]
        agent: String,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config, content } => {
            let control = load_control(&config)?;
            let text = read_content(content)?;
            let result = control.validate(&text);

            if result.passed {
                println!("PASSED (score {:.2})", result.score);
            } else {
                println!("FAILED (score {:.2})", result.score);
                for issue in &result.issues {
                    println!("  - {}", issue);
                }
                std::process::exit(1);
            }
        }
        Commands::Instructions { config } => {
            let control = load_control(&config)?;
            println!("{}", control.quality_instructions());
        }
        Commands::Summary { config } => {
            let control = load_control(&config)?;
            println!("{}", control.summary());
        }
        Commands::Test { url, agent, keywords } => {
            let agent_id = parse_agent_id(&agent)?;
            let harness = TestHarness::new(HttpAgentService::new(url));
            let results = harness.test_generation(agent_id, &keywords).await;

            for result in &results {
                println!("{} {} - {}", status_tag(result.status), result.name, result.message);
            }
        }
        Commands::Report { url, agent, json } => {
            let agent_id = parse_agent_id(&agent)?;
            let harness = TestHarness::new(HttpAgentService::new(url));
            let report = harness.generate_report(agent_id).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Agent test report for {}", report.agent_id);
                println!(
                    "  {} passed, {} failed, {} warnings",
                    report.passed, report.failed, report.warnings
                );
                for result in &report.results {
                    println!(
                        "  {} {} - {}",
                        status_tag(result.status),
                        result.name,
                        result.message
                    );
                }
                if let Some(metrics) = &report.average_metrics {
                    println!(
                        "  Average metrics: overall {:.1} (clarity {:.1}, usefulness {:.1}, uniqueness {:.1}, seo {:.1})",
                        metrics.overall,
                        metrics.clarity,
                        metrics.usefulness,
                        metrics.uniqueness,
                        metrics.seo_optimization
                    );
                }
                if !report.recommendations.is_empty() {
                    println!("  Recommendations:");
                    for recommendation in &report.recommendations {
                        println!("    - {}", recommendation);
                    }
                }
            }
        }
    }

    Ok(())
}

fn load_control(path: &Path) -> Result<QualityControl> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: QualityConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(QualityControl::new(config))
}

fn read_content(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read content {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read content from stdin")?;
            Ok(buffer)
        }
    }
}

fn parse_agent_id(raw: &str) -> Result<AgentId> {
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Invalid agent ID: {}", raw))
}

fn status_tag(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Pass => "[pass]",
        TestStatus::Fail => "[FAIL]",
        TestStatus::Warning => "[warn]",
    }
}
