//! Requirement input types.

use serde::{Deserialize, Serialize};

/// Priority of a requirement or test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Estimated implementation complexity of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// A Given/When/Then-shaped elaboration of one acceptance condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Position of this scenario within its requirement.
    pub ordinal: u32,
    /// Short label for the scenario.
    pub title: String,
    /// Starting state ("Given ...").
    pub context: String,
    /// Action that drives the scenario ("When ...").
    pub triggering_event: String,
    /// Observable outcome ("Then ...").
    pub expected_result: String,
    /// Whether the scenario touches authentication/authorization paths.
    pub security_relevant: bool,
}

impl Scenario {
    /// Create a scenario from its Given/When/Then parts.
    pub fn new(
        ordinal: u32,
        context: impl Into<String>,
        triggering_event: impl Into<String>,
        expected_result: impl Into<String>,
    ) -> Self {
        Self {
            ordinal,
            title: String::new(),
            context: context.into(),
            triggering_event: triggering_event.into(),
            expected_result: expected_result.into(),
            security_relevant: false,
        }
    }
}

/// An input unit of product intent to be turned into test coverage.
///
/// Fields arrive loosely populated (free text, spreadsheet-extracted
/// columns, partially filled metadata); the enricher fills the blanks it
/// can infer. User-supplied values are never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Story/requirement identifier, if the source provided one.
    pub user_story_id: Option<String>,
    /// Summary name. May be empty when only a description exists.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Longer functional elaboration, often spreadsheet-extracted.
    pub functional_description: String,
    /// Actor of the "As a <role> ..." sentence, when captured separately.
    pub role: Option<String>,
    /// Capability of the "... I need <capability> ..." sentence.
    pub capability: Option<String>,
    /// Purpose of the "... so that <purpose>" sentence.
    pub purpose: Option<String>,
    /// Business priority, if stated.
    pub priority: Option<Priority>,
    /// Implementation complexity, if stated.
    pub complexity: Option<Complexity>,
    /// Preconditions shared by the requirement's test cases.
    pub preconditions: Option<String>,
    /// Sample data to exercise the requirement with.
    pub test_data: Option<String>,
    /// Free-form acceptance criteria.
    pub acceptance_criteria: Vec<String>,
    /// Structured scenarios elaborating the criteria.
    pub scenarios: Vec<Scenario>,
}

impl Requirement {
    /// Create a requirement from its two main text fields.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// A requirement is processable only if it carries some text.
    ///
    /// Invalid requirements are filtered before processing and never reach
    /// the network client.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() || !self.description.trim().is_empty()
    }
}

/// A requirement with inferred fields filled in.
///
/// Same shape as [`Requirement`] except the identifier is guaranteed:
/// enrichment always resolves or synthesizes one. Produced only by
/// [`super::RequirementEnricher`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRequirement {
    pub user_story_id: String,
    pub name: String,
    pub description: String,
    pub functional_description: String,
    pub role: Option<String>,
    pub capability: Option<String>,
    pub purpose: Option<String>,
    pub priority: Option<Priority>,
    pub complexity: Option<Complexity>,
    pub preconditions: Option<String>,
    pub test_data: Option<String>,
    pub acceptance_criteria: Vec<String>,
    pub scenarios: Vec<Scenario>,
}

impl From<EnrichedRequirement> for Requirement {
    fn from(enriched: EnrichedRequirement) -> Self {
        Self {
            user_story_id: Some(enriched.user_story_id),
            name: enriched.name,
            description: enriched.description,
            functional_description: enriched.functional_description,
            role: enriched.role,
            capability: enriched.capability,
            purpose: enriched.purpose,
            priority: enriched.priority,
            complexity: enriched.complexity,
            preconditions: enriched.preconditions,
            test_data: enriched.test_data,
            acceptance_criteria: enriched.acceptance_criteria,
            scenarios: enriched.scenarios,
        }
    }
}
