//! Prompt construction for the generative service.

use crate::requirement::EnrichedRequirement;

/// System instruction sent with every generation request.
pub const SYSTEM_INSTRUCTION: &str = "You are a senior QA engineer. You design precise, \
reviewable manual test cases from product requirements. You answer only with the test \
cases, without commentary before or after them.";

/// Renders an enriched requirement into a single instruction block.
///
/// Pure and deterministic: the same requirement always yields the same
/// text. Unset fields are omitted entirely, never emitted as "None".
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the instruction text for one requirement.
    pub fn build(requirement: &EnrichedRequirement, context_hint: Option<&str>) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "Generate between 3 and 5 test cases for the requirement described below.\n\n",
        );
        prompt.push_str("For every test case provide, each on its own labeled line:\n");
        prompt.push_str("- Code: short identifier\n");
        prompt.push_str("- Name: what behaviour the case verifies\n");
        prompt.push_str(
            "- Type: Functional, NonFunctional, Regression, Exploratory, Integration, \
             Performance or Security\n",
        );
        prompt.push_str("- Priority: High, Medium or Low\n");
        prompt.push_str("- Preconditions: state required before execution\n");
        prompt.push_str("- Steps: a numbered list with at most 10 steps\n");
        prompt.push_str("- Expected result: the observable outcome\n\n");
        prompt.push_str(
            "Coverage must include the happy path, at least one negative or alternative \
             flow, boundary values, and UI validation when the requirement has a user \
             interface.\n\n",
        );
        prompt.push_str(
            "Naming rules: every name must describe the behaviour under test. Never use \
             generic names such as \"Test Case 1\" or \"Caso de prueba 2\". \
             Good: \"Login rejects an expired password\". \
             Bad: \"Test case 3\".\n\n",
        );

        prompt.push_str("Requirement:\n");
        Self::push_field(&mut prompt, "Story", &requirement.user_story_id);
        Self::push_field(&mut prompt, "Name", &requirement.name);
        Self::push_field(&mut prompt, "Description", &requirement.description);
        Self::push_field(
            &mut prompt,
            "Functional description",
            &requirement.functional_description,
        );
        if let Some(priority) = requirement.priority {
            Self::push_field(&mut prompt, "Priority", &priority.to_string());
        }
        if let Some(complexity) = requirement.complexity {
            Self::push_field(&mut prompt, "Complexity", &complexity.to_string());
        }
        Self::push_opt_field(&mut prompt, "Preconditions", &requirement.preconditions);
        Self::push_opt_field(&mut prompt, "Test data", &requirement.test_data);

        if !requirement.acceptance_criteria.is_empty() {
            prompt.push_str("Acceptance criteria:\n");
            for (idx, criterion) in requirement.acceptance_criteria.iter().enumerate() {
                prompt.push_str(&format!("  {}. {}\n", idx + 1, criterion));
            }
        }

        for scenario in &requirement.scenarios {
            if scenario.security_relevant {
                Self::push_field(
                    &mut prompt,
                    "Security-relevant scenario",
                    &scenario.expected_result,
                );
            }
        }

        if let Some(hint) = context_hint {
            Self::push_field(&mut prompt, "Context", hint);
        }

        prompt
    }

    /// Emit "Label: value" when the value is non-blank.
    fn push_field(out: &mut String, label: &str, value: &str) {
        if !value.trim().is_empty() {
            out.push_str(&format!("{label}: {}\n", value.trim()));
        }
    }

    fn push_opt_field(out: &mut String, label: &str, value: &Option<String>) {
        if let Some(value) = value {
            Self::push_field(out, label, value);
        }
    }
}
