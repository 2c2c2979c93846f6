//! The generation pipeline: requirement in, test cases out.
//!
//! ## Overview
//!
//! For each requirement in a batch, in order:
//!
//! 1. **Enrich**: fill inferable blanks ([`crate::requirement`])
//! 2. **Prompt**: render the instruction block ([`PromptBuilder`])
//! 3. **Invoke**: call the text-generation service with retries
//!    ([`crate::llm`])
//! 4. **Parse**: turn the free-form reply into structured cases
//!    ([`ResponseParser`])
//!
//! [`GenerationPipeline`] sequences these, paces requests, isolates
//! per-requirement failures and reports counts for the whole batch.
//!
//! ## Example
//!
//! ```rust,ignore
//! use casegen_core::generation::{GenerationOptions, GenerationPipeline};
//! use casegen_core::llm::{AnthropicProvider, GenerationClient, GenerationConfig};
//!
//! let provider = AnthropicProvider::new(GenerationConfig::from_env()?)?;
//! let client = GenerationClient::new(provider);
//! let mut pipeline = GenerationPipeline::new(client);
//!
//! let options = GenerationOptions::new().with_test_plan("PLAN-7");
//! let outcome = pipeline.run(&requirements, &options).await?;
//! println!("{}", outcome.report.summary());
//! ```

mod parser;
mod pipeline;
mod prompt;
mod types;

pub use parser::{ParseContext, ParserConfig, ResponseParser};
pub use pipeline::GenerationPipeline;
pub use prompt::{PromptBuilder, SYSTEM_INSTRUCTION};
pub use types::{
    BatchOutcome, BatchReport, GenerationOptions, GenerationRequest, PipelineState,
    RequirementFailure, DEFAULT_PACING,
};
