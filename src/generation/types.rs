//! Types for the generation pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::requirement::EnrichedRequirement;
use crate::testcase::TestCase;

/// Default pacing between consecutive provider calls.
///
/// Proactive spacing so a batch does not trip the provider's rate limiter;
/// separate from, and in addition to, the reactive back-off in the client.
pub const DEFAULT_PACING: Duration = Duration::from_secs(5);

/// Caller-supplied options for one batch run.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Project the produced cases belong to.
    pub project_id: Option<String>,
    /// Test plan to tag produced cases with.
    pub test_plan_id: Option<String>,
    /// Target execution cycle.
    pub cycle: u32,
    /// Free-text hint appended to every prompt.
    pub context_hint: Option<String>,
    /// Delay between requirements (not applied after the last one).
    pub pacing: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            project_id: None,
            test_plan_id: None,
            cycle: 1,
            context_hint: None,
            pacing: DEFAULT_PACING,
        }
    }
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_test_plan(mut self, test_plan_id: impl Into<String>) -> Self {
        self.test_plan_id = Some(test_plan_id.into());
        self
    }

    pub fn with_cycle(mut self, cycle: u32) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn with_context_hint(mut self, hint: impl Into<String>) -> Self {
        self.context_hint = Some(hint.into());
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }
}

/// One enriched requirement bound for the generator.
///
/// Produced once per requirement and immutable during its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub requirement: EnrichedRequirement,
    pub cycle: u32,
    pub test_plan_id: Option<String>,
    pub context_hint: Option<String>,
}

impl GenerationRequest {
    pub fn new(requirement: EnrichedRequirement, options: &GenerationOptions) -> Self {
        Self {
            requirement,
            cycle: options.cycle,
            test_plan_id: options.test_plan_id.clone(),
            context_hint: options.context_hint.clone(),
        }
    }
}

/// Where the pipeline currently is in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Validating,
    Processing(usize),
    Done,
}

/// Failure recorded for one requirement; the batch continues past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementFailure {
    /// Index of the requirement in the input batch.
    pub index: usize,
    /// Story id, when the requirement carried one.
    pub story_id: Option<String>,
    /// What went wrong.
    pub message: String,
}

/// Counts and failures for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Requirements received.
    pub received: usize,
    /// Requirements that passed validation.
    pub valid: usize,
    /// Test cases produced.
    pub produced: usize,
    /// Tokens consumed across the batch.
    pub total_tokens: u64,
    /// Per-requirement failures.
    pub failures: Vec<RequirementFailure>,
}

impl BatchReport {
    pub fn new(received: usize, valid: usize) -> Self {
        Self {
            received,
            valid,
            ..Self::default()
        }
    }

    /// Human-readable status line.
    pub fn summary(&self) -> String {
        format!(
            "{} of {} requirements valid, {} test cases produced, {} failed",
            self.valid,
            self.received,
            self.produced,
            self.failures.len()
        )
    }
}

/// Output of a pipeline run: the cases plus the status summary, so a
/// partially-failed batch is still actionable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub test_cases: Vec<TestCase>,
    pub report: BatchReport,
}

impl BatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }

    /// Whether some requirements produced cases while others failed.
    pub fn is_partial(&self) -> bool {
        !self.report.failures.is_empty() && !self.test_cases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = GenerationOptions::new()
            .with_project("PRJ-1")
            .with_test_plan("PLAN-9")
            .with_cycle(2)
            .with_context_hint("mobile web")
            .with_pacing(Duration::from_millis(10));

        assert_eq!(options.project_id.as_deref(), Some("PRJ-1"));
        assert_eq!(options.test_plan_id.as_deref(), Some("PLAN-9"));
        assert_eq!(options.cycle, 2);
        assert_eq!(options.pacing, Duration::from_millis(10));
    }

    #[test]
    fn test_report_summary() {
        let mut report = BatchReport::new(4, 3);
        report.produced = 9;
        report.failures.push(RequirementFailure {
            index: 2,
            story_id: None,
            message: "boom".to_string(),
        });

        assert_eq!(
            report.summary(),
            "3 of 4 requirements valid, 9 test cases produced, 1 failed"
        );
    }

    #[test]
    fn test_outcome_partial() {
        let mut outcome = BatchOutcome::default();
        assert!(!outcome.is_partial());

        outcome.test_cases.push(crate::testcase::TestCase::new("n", "TC-001"));
        outcome.report.failures.push(RequirementFailure {
            index: 0,
            story_id: None,
            message: "x".to_string(),
        });
        assert!(outcome.is_partial());
    }
}
