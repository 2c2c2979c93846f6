//! Structured test-case output types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::requirement::Priority;

/// Category of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Functional,
    NonFunctional,
    Regression,
    Exploratory,
    Integration,
    Performance,
    Security,
}

impl Default for TestType {
    fn default() -> Self {
        Self::Functional
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Functional => write!(f, "functional"),
            Self::NonFunctional => write!(f, "non_functional"),
            Self::Regression => write!(f, "regression"),
            Self::Exploratory => write!(f, "exploratory"),
            Self::Integration => write!(f, "integration"),
            Self::Performance => write!(f, "performance"),
            Self::Security => write!(f, "security"),
        }
    }
}

/// Execution status of a test case.
///
/// The pipeline always emits [`CaseStatus::NotExecuted`]; the remaining
/// states belong to the record's life downstream of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    NotExecuted,
    Passed,
    Failed,
    Blocked,
}

impl Default for CaseStatus {
    fn default() -> Self {
        Self::NotExecuted
    }
}

/// One action inside a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    /// Unique step id.
    pub id: String,
    /// What the tester does.
    pub description: String,
    /// Per-step expectation. Often empty; the overall expectation lives on
    /// the test case.
    pub expected_result: String,
}

impl TestStep {
    /// Create a step with a generated id.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            expected_result: String::new(),
        }
    }
}

/// A reviewable test-case record produced by the generation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique case id.
    pub id: String,
    /// Project this case belongs to, if supplied by the caller.
    pub project_id: Option<String>,
    /// Story the case was generated from.
    pub user_story_id: Option<String>,
    /// Test plan the case was tagged with, if any.
    pub test_plan_id: Option<String>,
    /// Behaviour-describing name.
    pub name: String,
    /// Short code such as "HU-12-TC-03".
    pub code_ref: String,
    /// Category of the case.
    pub test_type: TestType,
    /// Execution status. Always `NotExecuted` at creation.
    pub status: CaseStatus,
    /// Business priority.
    pub priority: Priority,
    /// Ordered actions.
    pub steps: Vec<TestStep>,
    /// Overall expectation, possibly with labeled precondition/observation
    /// sub-sections.
    pub expected_result: String,
    /// Target execution cycle.
    pub cycle: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TestCase {
    /// Create an empty case with a generated id and fresh timestamps.
    pub fn new(name: impl Into<String>, code_ref: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: None,
            user_story_id: None,
            test_plan_id: None,
            name: name.into(),
            code_ref: code_ref.into(),
            test_type: TestType::default(),
            status: CaseStatus::default(),
            priority: Priority::default(),
            steps: Vec::new(),
            expected_result: String::new(),
            cycle: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// A case is usable only if it has at least one step or a non-empty
    /// expected result. Cases with neither are parse noise.
    pub fn has_substance(&self) -> bool {
        !self.steps.is_empty() || !self.expected_result.trim().is_empty()
    }
}
