//! Requirement enrichment.
//!
//! Fills gaps in a raw requirement using pattern-based inference over its
//! own free text:
//! - Identifier inference (short-ID tokens, labeled story numbers)
//! - Canonical "As a <role> I need <capability> so that <purpose>" synthesis
//!   and the reverse decomposition of a free-text description
//! - Scenario ⇄ acceptance-criteria reconciliation
//! - Labeled back-fill of priority, complexity, preconditions and test data
//!
//! Enrichment is fill-if-blank: user-supplied values are never replaced,
//! which also makes it idempotent.

use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

use super::types::{Complexity, EnrichedRequirement, Priority, Requirement, Scenario};

// ============================================================================
// Regex patterns for enrichment
// ============================================================================

/// Pattern for short story identifiers such as "HU-12", "US3" or "REQ-007".
static SHORT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2,4})-?(\d{1,4})\b").expect("Invalid regex"));

/// Pattern for a number labeled by a story/requirement keyword.
static LABELED_STORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:historia de usuario|user story|story|requisito|requirement)\s*#?\s*(\d{1,5})\b")
        .expect("Invalid regex")
});

/// Connector pattern for the English structured sentence.
/// All three anchors must be present in order; a partial match fills nothing.
static STRUCTURED_SENTENCE_EN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bas an?\s+(.+?)\s+i\s+(?:need|want)\s+(.+?)\s+so that\s+(.+)")
        .expect("Invalid regex")
});

/// Connector pattern for the Spanish structured sentence.
static STRUCTURED_SENTENCE_ES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bcomo\s+(.+?)\s+(?:necesito|quiero)\s+(.+?)\s+para\s+(.+)")
        .expect("Invalid regex")
});

/// Given/When/Then decomposition of an acceptance criterion.
static GHERKIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\b(?:given|dado(?:\s+que)?)\s+(.+?)[,;]?\s+(?:when|cuando)\s+(.+?)[,;]?\s+(?:then|entonces)\s+(.+)",
    )
    .expect("Invalid regex")
});

/// Labeled priority in a description ("priority: high", "prioridad: alta").
static PRIORITY_LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:priority|prioridad)\s*:\s*(alta|high|cr[ií]tica|critical|media|medium|baja|low)\b")
        .expect("Invalid regex")
});

/// Labeled complexity in a description.
static COMPLEXITY_LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:complexity|complejidad)\s*:\s*(alta|high|media|medium|baja|low)\b")
        .expect("Invalid regex")
});

/// Labeled preconditions line in a description.
static PRECONDITIONS_LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:preconditions?|precondici[oó]n(?:es)?)\s*:\s*([^\r\n]+)")
        .expect("Invalid regex")
});

/// Labeled test-data line in a description.
static TEST_DATA_LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:test data|datos de prueba)\s*:\s*([^\r\n]+)").expect("Invalid regex")
});

/// Ceiling for synthesized/derived names.
const MAX_NAME_LEN: usize = 120;

// ============================================================================
// Enricher
// ============================================================================

/// Deterministic gap-filler for raw requirements.
pub struct RequirementEnricher;

impl RequirementEnricher {
    /// Enrich a requirement, filling blanks inferred from its own text.
    ///
    /// Pure transformation of a clone; the input is never mutated.
    pub fn enrich(requirement: &Requirement) -> EnrichedRequirement {
        let mut req = requirement.clone();

        Self::fill_structured_sentence(&mut req);
        Self::fill_name_from_parts(&mut req);
        let user_story_id = Self::resolve_identifier(&req);
        Self::reconcile_scenarios_and_criteria(&mut req);
        Self::backfill_labeled_fields(&mut req);
        Self::apply_name_ceiling(&mut req);

        EnrichedRequirement {
            user_story_id,
            name: req.name,
            description: req.description,
            functional_description: req.functional_description,
            role: req.role,
            capability: req.capability,
            purpose: req.purpose,
            priority: req.priority,
            complexity: req.complexity,
            preconditions: req.preconditions,
            test_data: req.test_data,
            acceptance_criteria: req.acceptance_criteria,
            scenarios: req.scenarios,
        }
    }

    /// Split a free-text description into role/capability/purpose.
    ///
    /// Runs only when all three parts are blank; a partial pattern match is
    /// discarded rather than partially applied.
    fn fill_structured_sentence(req: &mut Requirement) {
        let parts_blank = is_blank_opt(&req.role)
            && is_blank_opt(&req.capability)
            && is_blank_opt(&req.purpose);
        if !parts_blank || req.description.trim().is_empty() {
            return;
        }

        let captures = STRUCTURED_SENTENCE_EN
            .captures(&req.description)
            .or_else(|| STRUCTURED_SENTENCE_ES.captures(&req.description));

        if let Some(cap) = captures {
            req.role = Some(cap[1].trim().to_string());
            req.capability = Some(cap[2].trim().to_string());
            req.purpose = Some(cap[3].trim().to_string());
        }
    }

    /// Synthesize the canonical summary sentence when a name is missing.
    fn fill_name_from_parts(req: &mut Requirement) {
        if !req.name.trim().is_empty() {
            return;
        }
        if let (Some(role), Some(capability), Some(purpose)) = (
            non_blank(&req.role),
            non_blank(&req.capability),
            non_blank(&req.purpose),
        ) {
            req.name = format!("As a {role} I need {capability} so that {purpose}");
        }
    }

    /// Resolve the story identifier, searching name + description.
    ///
    /// Priority order: short-ID token, then a keyword-labeled number, then a
    /// synthesized time-derived fallback.
    fn resolve_identifier(req: &Requirement) -> String {
        if let Some(id) = non_blank(&req.user_story_id) {
            return id.trim().to_string();
        }

        let haystack = format!("{} {}", req.name, req.description);

        if let Some(cap) = SHORT_ID_PATTERN.captures(&haystack) {
            return format!("{}-{}", &cap[1], &cap[2]);
        }
        if let Some(cap) = LABELED_STORY_PATTERN.captures(&haystack) {
            return format!("US-{}", &cap[1]);
        }

        format!("REQ-{:05}", Utc::now().timestamp() % 100_000)
    }

    /// Derive whichever of scenarios/criteria is missing from the other.
    ///
    /// Runs in at most one direction per requirement: the side that already
    /// has data wins and is never re-derived.
    fn reconcile_scenarios_and_criteria(req: &mut Requirement) {
        if !req.scenarios.is_empty() && req.acceptance_criteria.is_empty() {
            req.acceptance_criteria = req
                .scenarios
                .iter()
                .map(|scenario| {
                    [
                        scenario.context.as_str(),
                        scenario.triggering_event.as_str(),
                        scenario.expected_result.as_str(),
                    ]
                    .iter()
                    .filter(|part| !part.trim().is_empty())
                    .map(|part| part.trim())
                    .collect::<Vec<_>>()
                    .join(", ")
                })
                .filter(|criterion| !criterion.is_empty())
                .collect();
        } else if req.scenarios.is_empty() && !req.acceptance_criteria.is_empty() {
            req.scenarios = req
                .acceptance_criteria
                .iter()
                .enumerate()
                .map(|(idx, criterion)| Self::scenario_from_criterion(idx as u32 + 1, criterion))
                .collect();
        }
    }

    /// Decompose one criterion into a scenario, Given/When/Then if possible.
    fn scenario_from_criterion(ordinal: u32, criterion: &str) -> Scenario {
        if let Some(cap) = GHERKIN_PATTERN.captures(criterion) {
            return Scenario::new(
                ordinal,
                cap[1].trim().to_string(),
                cap[2].trim().to_string(),
                cap[3].trim().to_string(),
            );
        }
        // Decomposition failed: the whole criterion becomes the expectation.
        Scenario::new(ordinal, String::new(), String::new(), criterion.trim())
    }

    /// Back-fill priority, complexity, preconditions and test data from
    /// labeled lines in the description. Absence of a label leaves the field
    /// unset rather than guessing a default.
    fn backfill_labeled_fields(req: &mut Requirement) {
        if req.priority.is_none() {
            req.priority = PRIORITY_LABEL_PATTERN
                .captures(&req.description)
                .map(|cap| parse_priority_word(&cap[1]));
        }
        if req.complexity.is_none() {
            req.complexity = COMPLEXITY_LABEL_PATTERN
                .captures(&req.description)
                .map(|cap| parse_complexity_word(&cap[1]));
        }
        if is_blank_opt(&req.preconditions) {
            req.preconditions = PRECONDITIONS_LABEL_PATTERN
                .captures(&req.description)
                .map(|cap| cap[1].trim().to_string());
        }
        if is_blank_opt(&req.test_data) {
            req.test_data = TEST_DATA_LABEL_PATTERN
                .captures(&req.description)
                .map(|cap| cap[1].trim().to_string());
        }
    }

    /// Hard-truncate an over-long name, preserving the original in the
    /// description so no information is lost.
    fn apply_name_ceiling(req: &mut Requirement) {
        if req.name.chars().count() <= MAX_NAME_LEN {
            return;
        }
        let original = req.name.clone();
        let truncated: String = req.name.chars().take(MAX_NAME_LEN - 3).collect();
        req.name = format!("{truncated}...");
        req.description = if req.description.trim().is_empty() {
            original
        } else {
            format!("{original}\n{}", req.description)
        };
    }
}

fn is_blank_opt(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn parse_priority_word(word: &str) -> Priority {
    match word.to_lowercase().as_str() {
        "alta" | "high" | "critica" | "crítica" | "critical" => Priority::High,
        "baja" | "low" => Priority::Low,
        _ => Priority::Medium,
    }
}

fn parse_complexity_word(word: &str) -> Complexity {
    match word.to_lowercase().as_str() {
        "alta" | "high" => Complexity::High,
        "baja" | "low" => Complexity::Low,
        _ => Complexity::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identifier_extracted_from_text() {
        let req = Requirement::new("HU-12 Login", "Users can log in with email");
        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(enriched.user_story_id, "HU-12");
    }

    #[test]
    fn test_identifier_normalizes_missing_dash() {
        let req = Requirement::new("US3 checkout", "Pay with card");
        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(enriched.user_story_id, "US-3");
    }

    #[test]
    fn test_identifier_from_labeled_number() {
        let req = Requirement::new("Checkout", "Covers user story #41 end to end");
        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(enriched.user_story_id, "US-41");
    }

    #[test]
    fn test_identifier_fallback_is_synthesized() {
        let req = Requirement::new("Checkout", "Pay with a stored card");
        let enriched = RequirementEnricher::enrich(&req);
        assert!(enriched.user_story_id.starts_with("REQ-"));
    }

    #[test]
    fn test_explicit_identifier_wins() {
        let mut req = Requirement::new("HU-12 Login", "desc");
        req.user_story_id = Some("HU-99".to_string());
        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(enriched.user_story_id, "HU-99");
    }

    #[test]
    fn test_canonical_sentence_synthesis() {
        let mut req = Requirement::new("", "export section");
        req.role = Some("Admin".to_string());
        req.capability = Some("export reports".to_string());
        req.purpose = Some("audit compliance".to_string());

        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(
            enriched.name,
            "As a Admin I need export reports so that audit compliance"
        );
    }

    #[test]
    fn test_description_split_into_parts() {
        let req = Requirement::new(
            "Reporting",
            "As a manager I need weekly summaries so that I can track progress",
        );
        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(enriched.role.as_deref(), Some("manager"));
        assert_eq!(enriched.capability.as_deref(), Some("weekly summaries"));
        assert_eq!(enriched.purpose.as_deref(), Some("I can track progress"));
    }

    #[test]
    fn test_partial_connector_match_fills_nothing() {
        let req = Requirement::new("Reporting", "As a manager I need weekly summaries");
        let enriched = RequirementEnricher::enrich(&req);
        assert!(enriched.role.is_none());
        assert!(enriched.capability.is_none());
        assert!(enriched.purpose.is_none());
    }

    #[test]
    fn test_scenarios_derive_criteria() {
        let mut req = Requirement::new("Login", "desc");
        req.scenarios = vec![Scenario::new(
            1,
            "a registered user",
            "they submit valid credentials",
            "the dashboard is shown",
        )];

        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(
            enriched.acceptance_criteria,
            vec!["a registered user, they submit valid credentials, the dashboard is shown"]
        );
    }

    #[test]
    fn test_criteria_derive_scenarios_with_gherkin() {
        let mut req = Requirement::new("Login", "desc");
        req.acceptance_criteria = vec![
            "Given a locked account when the user logs in then an error is shown".to_string(),
        ];

        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(enriched.scenarios.len(), 1);
        assert_eq!(enriched.scenarios[0].context, "a locked account");
        assert_eq!(enriched.scenarios[0].triggering_event, "the user logs in");
        assert_eq!(enriched.scenarios[0].expected_result, "an error is shown");
    }

    #[test]
    fn test_undecomposable_criterion_becomes_expectation() {
        let mut req = Requirement::new("Login", "desc");
        req.acceptance_criteria = vec!["The session expires after 30 minutes".to_string()];

        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(enriched.scenarios.len(), 1);
        assert!(enriched.scenarios[0].context.is_empty());
        assert!(enriched.scenarios[0].triggering_event.is_empty());
        assert_eq!(
            enriched.scenarios[0].expected_result,
            "The session expires after 30 minutes"
        );
    }

    #[test]
    fn test_labeled_backfill() {
        let req = Requirement::new(
            "Login",
            "Allow access.\nPriority: alta\nComplejidad: low\nPrecondiciones: user exists\nTest data: jdoe@example.com",
        );
        let enriched = RequirementEnricher::enrich(&req);
        assert_eq!(enriched.priority, Some(Priority::High));
        assert_eq!(enriched.complexity, Some(Complexity::Low));
        assert_eq!(enriched.preconditions.as_deref(), Some("user exists"));
        assert_eq!(enriched.test_data.as_deref(), Some("jdoe@example.com"));
    }

    #[test]
    fn test_no_label_leaves_fields_unset() {
        let req = Requirement::new("Login", "Allow access with email and password");
        let enriched = RequirementEnricher::enrich(&req);
        assert!(enriched.priority.is_none());
        assert!(enriched.complexity.is_none());
        assert!(enriched.preconditions.is_none());
        assert!(enriched.test_data.is_none());
    }

    #[test]
    fn test_name_ceiling_preserves_original() {
        let long_name = "x".repeat(200);
        let req = Requirement::new(long_name.clone(), "short description");
        let enriched = RequirementEnricher::enrich(&req);

        assert_eq!(enriched.name.chars().count(), MAX_NAME_LEN);
        assert!(enriched.name.ends_with("..."));
        assert!(enriched.description.starts_with(&long_name));
        assert!(enriched.description.ends_with("short description"));
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let mut req = Requirement::new("HU-12 Login", "Priority: high\nGiven a user when they log in then access is granted");
        req.acceptance_criteria =
            vec!["Given a user when they log in then access is granted".to_string()];

        let once = RequirementEnricher::enrich(&req);
        let twice = RequirementEnricher::enrich(&Requirement::from(once.clone()));
        assert_eq!(once, twice);
    }
}
