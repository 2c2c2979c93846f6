//! # casegen-core
//!
//! A library that turns loosely-structured product requirements into
//! structured, reviewable test-case records by orchestrating calls to an
//! external generative text service and heuristically parsing its
//! free-form replies.
//!
//! ## Core Components
//!
//! - **Requirement**: input model plus deterministic enrichment that fills
//!   blanks from the requirement's own text
//! - **Llm**: resilient client for the text-generation endpoint with
//!   rate-limit-aware back-off
//! - **Generation**: prompt construction, reply parsing, and the
//!   sequential batch pipeline
//! - **TestCase**: the structured output model handed to persistence
//!
//! ## Example
//!
//! ```rust,ignore
//! use casegen_core::{
//!     AnthropicProvider, GenerationClient, GenerationConfig,
//!     GenerationOptions, GenerationPipeline, Requirement,
//! };
//!
//! let provider = AnthropicProvider::new(GenerationConfig::from_env()?)?;
//! let mut pipeline = GenerationPipeline::new(GenerationClient::new(provider));
//!
//! let requirements = vec![Requirement::new("HU-1 Login", "Users can log in")];
//! let outcome = pipeline
//!     .run(&requirements, &GenerationOptions::new().with_cycle(2))
//!     .await?;
//!
//! for case in &outcome.test_cases {
//!     println!("{}: {}", case.code_ref, case.name);
//! }
//! println!("{}", outcome.report.summary());
//! ```

pub mod error;
pub mod generation;
pub mod llm;
pub mod requirement;
pub mod testcase;

// Re-exports for convenience
pub use error::{Error, Result};
pub use generation::{
    BatchOutcome, BatchReport, GenerationOptions, GenerationPipeline, GenerationRequest,
    ParseContext, ParserConfig, PipelineState, PromptBuilder, RequirementFailure, ResponseParser,
    DEFAULT_PACING, SYSTEM_INSTRUCTION,
};
pub use llm::{
    AnthropicProvider, ChatMessage, ChatRole, CompletionRequest, CompletionResponse,
    GenerationClient, GenerationConfig, RetryPolicy, TextGenerator, TokenUsage,
    DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
pub use requirement::{
    Complexity, EnrichedRequirement, Priority, Requirement, RequirementEnricher, Scenario,
};
pub use testcase::{CaseStatus, TestCase, TestStep, TestType};
