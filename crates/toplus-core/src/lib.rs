//! TOPLUS Core - review engines
//!
//! This crate provides the review logic for TOPLUS:
//! - Diagnosis: scenario case, text type and grade level of a text
//! - Workflow: the generic five-step pipeline and the per-case pipelines
//! - Grammar: positional corrections from a grammar checker
//! - Recycling: grade-pool recommendation
//! - Stages: six-stage single-edit passthrough
//! - Service: validated entry point over all of the above

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checklist;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod grammar;
pub mod parse;
pub mod prompts;
pub mod recycling;
pub mod service;
pub mod stages;
pub mod types;
pub mod workflow;

pub use config::{ChainConfig, ReviewConfig, StageChainConfig};
pub use diagnosis::DiagnosisEngine;
pub use error::{Error, Result};
pub use grammar::{apply_matches, Correction, GrammarCorrector};
pub use recycling::RecyclingCheck;
pub use service::ReviewService;
pub use stages::{Stage, StageResult};
pub use types::{
    DiagnosisResult, Edit, Recommendation, RecyclingResult, ReviewResult, ScenarioCase, TextType,
    WorkflowReport,
};
pub use workflow::{ParaphraseMode, StepKind, WorkflowEngine};
