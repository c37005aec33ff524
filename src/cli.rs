//! CLI module for TOPLUS
//!
//! - `serve`: Start the HTTP server (default)
//! - `diagnose`, `workflow`, `recycle`: one-shot review printed as JSON

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use toplus::server::{build_service, load_config};
use toplus_core::{ReviewService, ScenarioCase, TextType};

/// TOPLUS CLI
#[derive(Parser, Debug)]
#[command(name = "toplus")]
#[command(about = "Staged text revision for textbook reading passages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// Diagnose scenario case, text type and grade level
    Diagnose {
        text: String,
        /// formal or casual
        #[arg(long)]
        text_type: Option<String>,
        /// Grade label such as E4 or M1
        #[arg(long)]
        target_grade: Option<String>,
    },
    /// Run the generic pipeline, or the pipeline for one case
    Workflow {
        text: String,
        /// too_difficult, too_formal, context_awkward, mechanical_error or normal
        #[arg(long)]
        case: Option<String>,
        /// formal or casual; the case pipelines fix their own
        #[arg(long, conflicts_with = "case")]
        text_type: Option<String>,
    },
    /// Check the text against a target grade pool
    Recycle {
        text: String,
        #[arg(long)]
        target_grade: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn text_type(label: Option<&str>) -> Result<Option<TextType>> {
    Ok(label.map(str::parse::<TextType>).transpose()?)
}

fn service() -> Result<Arc<ReviewService>> {
    let config = load_config().context("Failed to load configuration")?;
    Ok(build_service(&config).service)
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => toplus::server::run().await,
        Commands::Diagnose {
            text,
            text_type: label,
            target_grade,
        } => {
            let result = service()?
                .diagnose(&text, text_type(label.as_deref())?, target_grade.as_deref())
                .await?;
            print_json(&result)
        }
        Commands::Workflow {
            text,
            case,
            text_type: label,
        } => {
            let service = service()?;
            let report = match case {
                Some(case) => {
                    let case: ScenarioCase = case.parse()?;
                    service.run_case_workflow(&text, case).await?
                }
                None => service.run_workflow(&text, text_type(label.as_deref())?).await?,
            };
            print_json(&report)
        }
        Commands::Recycle { text, target_grade } => {
            let result = service()?
                .recycling_check(&text, target_grade.as_deref())
                .await?;
            print_json(&result)
        }
    }
}
