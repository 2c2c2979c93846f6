//! Sequential batch orchestration.
//!
//! The pipeline processes requirements strictly in order: enrich, build the
//! prompt, invoke the client, parse the reply, accumulate. Each
//! requirement's failure is isolated so one bad requirement does not abort
//! the batch; only configuration and credential problems are fatal to the
//! whole run. Between requirements the pipeline sleeps a fixed pacing
//! interval to stay clear of the provider's rate limiter.

use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::llm::{GenerationClient, TextGenerator};
use crate::requirement::{Requirement, RequirementEnricher};
use crate::testcase::TestCase;

use super::parser::{ParseContext, ResponseParser};
use super::prompt::PromptBuilder;
use super::types::{
    BatchOutcome, BatchReport, GenerationOptions, GenerationRequest, PipelineState,
    RequirementFailure,
};

/// Orchestrates requirement-to-test-case generation over a batch.
pub struct GenerationPipeline<T: TextGenerator> {
    client: GenerationClient<T>,
    parser: ResponseParser,
    state: PipelineState,
}

impl<T: TextGenerator> GenerationPipeline<T> {
    pub fn new(client: GenerationClient<T>) -> Self {
        Self {
            client,
            parser: ResponseParser::new(),
            state: PipelineState::Idle,
        }
    }

    /// Replace the reply parser (e.g. to configure the fallback-name bank).
    pub fn with_parser(mut self, parser: ResponseParser) -> Self {
        self.parser = parser;
        self
    }

    /// Where the pipeline currently is in its run.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the batch.
    ///
    /// Returns `Err` only for configuration/credential failures, which
    /// cannot be worked around by skipping a requirement. Every other
    /// failure is recorded in the report and the batch continues, so a
    /// partially-failed batch is still actionable.
    #[instrument(skip_all, fields(requirements = requirements.len()))]
    pub async fn run(
        &mut self,
        requirements: &[Requirement],
        options: &GenerationOptions,
    ) -> Result<BatchOutcome> {
        self.state = PipelineState::Validating;

        let valid: Vec<(usize, &Requirement)> = requirements
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_valid())
            .collect();

        let mut report = BatchReport::new(requirements.len(), valid.len());
        let mut test_cases: Vec<TestCase> = Vec::new();

        // Fast fail: never contact the service for a batch with nothing to do.
        if valid.is_empty() {
            info!(received = report.received, "no valid requirements in batch");
            self.state = PipelineState::Done;
            return Ok(BatchOutcome { test_cases, report });
        }

        for (position, (index, requirement)) in valid.iter().enumerate() {
            self.state = PipelineState::Processing(*index);

            // Pacing between requirements, not after the last one.
            if position > 0 {
                tokio::time::sleep(options.pacing).await;
            }

            match self.process_one(requirement, options).await {
                Ok((mut produced, tokens)) => {
                    for case in &mut produced {
                        case.test_plan_id = options.test_plan_id.clone();
                    }
                    report.produced += produced.len();
                    report.total_tokens += tokens;
                    test_cases.extend(produced);
                }
                Err(err) if err.is_fatal_for_batch() => {
                    self.state = PipelineState::Done;
                    return Err(err);
                }
                Err(err) => {
                    warn!(index = *index, error = %err, "requirement failed, continuing batch");
                    report.failures.push(RequirementFailure {
                        index: *index,
                        story_id: requirement.user_story_id.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        self.state = PipelineState::Done;
        info!(summary = %report.summary(), "batch finished");
        Ok(BatchOutcome { test_cases, report })
    }

    /// Process one requirement end to end.
    async fn process_one(
        &self,
        requirement: &Requirement,
        options: &GenerationOptions,
    ) -> Result<(Vec<TestCase>, u64)> {
        let enriched = RequirementEnricher::enrich(requirement);
        let request = GenerationRequest::new(enriched, options);

        let prompt = PromptBuilder::build(&request.requirement, request.context_hint.as_deref());
        let response = self.client.generate(&prompt).await?;

        let ctx = ParseContext::new(
            options.project_id.clone(),
            Some(request.requirement.user_story_id.clone()),
            request.cycle,
        );
        let cases = self.parser.parse(&response.content, &ctx);

        if cases.is_empty() {
            warn!(
                story = %request.requirement.user_story_id,
                "reply produced no parseable test cases"
            );
        }

        Ok((cases, response.usage.total()))
    }
}

impl<T: TextGenerator> std::fmt::Debug for GenerationPipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationPipeline")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
