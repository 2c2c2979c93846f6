//! Requirement model and enrichment.
//!
//! A [`Requirement`] arrives loosely structured: free text, spreadsheet
//! columns, partially filled metadata. [`RequirementEnricher`] fills the
//! blanks it can infer from the requirement's own text and produces an
//! [`EnrichedRequirement`], which is what the rest of the pipeline consumes.

mod enricher;
mod types;

pub use enricher::RequirementEnricher;
pub use types::{Complexity, EnrichedRequirement, Priority, Requirement, Scenario};
