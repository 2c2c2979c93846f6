//! Heuristic parser for free-form generator replies.
//!
//! Turns a reply into zero or more [`TestCase`] records through layered
//! strategies with silent fallback:
//!
//! 1. Split the reply into per-case blocks (fenced-block unwrap, case-marker
//!    boundaries, keyword-filtered paragraphs, whole-reply fallback)
//! 2. Extract named fields per block, each with a primary pattern and at
//!    least one fallback
//! 3. Guard against degenerate names with a configurable fallback bank
//!
//! The parser never raises for malformed input: the worst case is an empty
//! list, and a malformed block never discards the well-formed ones.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::requirement::Priority;
use crate::testcase::{TestCase, TestStep, TestType};

// ============================================================================
// Block-splitting patterns
// ============================================================================

/// Fenced code block; models sometimes wrap structured output in one.
static FENCED_BLOCK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[a-zA-Z]*\r?\n(.*?)```").expect("Invalid regex"));

/// Start-of-case marker: "TC-001", "Test Case 2:", "Caso 3:", heading forms.
static CASE_MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*[ \t]*)?(?:TC-?\d{1,4}\b|(?:test[ \t]*case|caso(?:[ \t]+de[ \t]+prueba)?)[ \t]+\d{1,3}[ \t]*[:.)\-]?)",
    )
    .expect("Invalid regex")
});

/// Keyword families a paragraph must mention to count as a case block.
const CASE_KEYWORDS: &[&str] = &["test case", "caso", "tc-"];
const STEP_KEYWORDS: &[&str] = &["step", "paso", "procedimiento"];
const RESULT_KEYWORDS: &[&str] = &["result", "resultado", "se espera", "expected"];

// ============================================================================
// Field-extraction patterns
// ============================================================================

/// Primary name pattern: an explicit label line.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*)?[ \t]*(?:name|nombre|t[íi]tulo|title)[ \t]*(?:\*\*)?[ \t]*[:\-][ \t]*(.+)$")
        .expect("Invalid regex")
});

/// Fallback name pattern: title text after a case marker.
static NAME_FALLBACK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*[ \t]*)?(?:TC-?\d{1,4}|test[ \t]*case[ \t]*\d{1,3}|caso(?:[ \t]+de[ \t]+prueba)?[ \t]*\d{1,3})[ \t]*[:.\-][ \t]*(.+)$",
    )
    .expect("Invalid regex")
});

/// Primary type pattern: label line.
static TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*)?[ \t]*(?:type|tipo(?:[ \t]+de[ \t]+prueba)?)[ \t]*(?:\*\*)?[ \t]*[:\-][ \t]*(.+)$")
        .expect("Invalid regex")
});

/// Fallback type pattern: inline mention anywhere in the block.
static TYPE_FALLBACK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:test[ \t]*type|tipo)[ \t]*[:\-][ \t]*([^\r\n]+)").expect("Invalid regex")
});

/// Primary priority pattern: label line.
static PRIORITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*)?[ \t]*(?:priority|prioridad)[ \t]*(?:\*\*)?[ \t]*[:\-][ \t]*(.+)$")
        .expect("Invalid regex")
});

/// Fallback priority pattern: inline mention.
static PRIORITY_FALLBACK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:priority|prioridad)[ \t]*[:\-][ \t]*([^\r\n]+)").expect("Invalid regex")
});

/// Primary code pattern: label line.
static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*)?[ \t]*(?:code|c[óo]digo|id)[ \t]*(?:\*\*)?[ \t]*[:\-][ \t]*([A-Za-z0-9][A-Za-z0-9_\-]{1,30})")
        .expect("Invalid regex")
});

/// Fallback code pattern: a code-shaped token anywhere in the block.
static CODE_FALLBACK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{2,4}-?\d{1,4}-TC-?\d{1,3}|TC-\d{1,3})\b").expect("Invalid regex")
});

/// Any known section label at a line start; used to slice sections.
static SECTION_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:\*\*)?[ \t]*(?:code|c[óo]digo|id|name|nombre|title|t[íi]tulo|type|tipo(?:[ \t]+de[ \t]+prueba)?|priority|prioridad|preconditions?|precondici[óo]n(?:es)?|steps|pasos|procedimiento|expected[ \t]+result|resultado(?:[ \t]+esperado)?|se[ \t]+espera|observa(?:tions|ciones)|notes|notas)[ \t]*(?:\*\*)?[ \t]*[:\-]",
    )
    .expect("Invalid regex")
});

/// "Steps:" section header.
static STEPS_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*)?[ \t]*(?:steps|pasos|procedimiento)[ \t]*(?:\*\*)?[ \t]*[:\-]")
        .expect("Invalid regex")
});

/// "Preconditions:" section header.
static PRECONDITIONS_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*)?[ \t]*(?:preconditions?|precondici[óo]n(?:es)?)[ \t]*(?:\*\*)?[ \t]*[:\-]")
        .expect("Invalid regex")
});

/// Primary expected-result header.
static RESULT_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*)?[ \t]*(?:expected[ \t]+result|resultado(?:[ \t]+esperado)?|result)[ \t]*(?:\*\*)?[ \t]*[:\-]")
        .expect("Invalid regex")
});

/// Fallback expected-result pattern: "Se espera ..." / "Expected ..." inline.
static RESULT_FALLBACK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:se[ \t]+espera(?:[ \t]+que)?|expected)[ \t]*[:\-]?[ \t]*([^\r\n]+)")
        .expect("Invalid regex")
});

/// "Observations:" section header.
static OBSERVATIONS_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*)?[ \t]*(?:observa(?:tions|ciones)|notes|notas)[ \t]*(?:\*\*)?[ \t]*[:\-]")
        .expect("Invalid regex")
});

/// Numbered step line ("1. ...", "2) ...", "3- ...").
static NUMBERED_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d{1,2}[.)\-][ \t]*(.+)$").expect("Invalid regex"));

/// Lettered step line ("a) ...", "b. ...").
static LETTERED_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[a-z][.)][ \t]+(.+)$").expect("Invalid regex"));

/// Bullet step line.
static BULLET_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*•][ \t]+(.+)$").expect("Invalid regex"));

/// A run of 3+ letters; names without one are placeholder noise.
static LETTER_RUN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-zÀ-ÿ]{3,}").expect("Invalid regex"));

/// Phrases that mark a generic, low-value name.
const GENERIC_NAME_MARKERS: &[&str] = &["test case", "caso de prueba"];

/// Names shorter than this are treated as placeholder noise.
const MIN_NAME_LEN: usize = 10;

// ============================================================================
// Parser
// ============================================================================

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Fallback names used when a reply degrades into placeholder names,
    /// indexed by block sequence (wrapping).
    pub fallback_names: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            fallback_names: vec![
                "Successful completion of the primary flow".to_string(),
                "Rejection of invalid input data".to_string(),
                "Boundary values at the limits of accepted ranges".to_string(),
                "Recovery after an interrupted operation".to_string(),
                "Validation messages shown on the form fields".to_string(),
                "Consistency of stored data after the operation".to_string(),
            ],
        }
    }
}

impl ParserConfig {
    /// Replace the fallback-name bank.
    pub fn with_fallback_names(mut self, names: Vec<String>) -> Self {
        if !names.is_empty() {
            self.fallback_names = names;
        }
        self
    }
}

/// Identifiers the parsed cases are tagged with.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    pub project_id: Option<String>,
    pub user_story_id: Option<String>,
    pub cycle: u32,
}

impl ParseContext {
    pub fn new(
        project_id: Option<String>,
        user_story_id: Option<String>,
        cycle: u32,
    ) -> Self {
        Self {
            project_id,
            user_story_id,
            cycle,
        }
    }
}

/// Heuristic text-to-structure converter for generator replies.
#[derive(Debug, Clone, Default)]
pub struct ResponseParser {
    config: ParserConfig,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a reply into zero or more test cases.
    ///
    /// Never errors: unusable blocks are dropped as noise and the sequence
    /// counter still advances for them, so surviving cases keep the code
    /// numbers of their position in the reply.
    pub fn parse(&self, reply: &str, ctx: &ParseContext) -> Vec<TestCase> {
        let blocks = split_blocks(reply);
        let mut cases = Vec::new();

        for (idx, block) in blocks.iter().enumerate() {
            let sequence = idx as u32 + 1;
            match self.parse_block(block, sequence, ctx) {
                Some(case) => cases.push(case),
                None => debug!(sequence, "dropped reply block with no usable content"),
            }
        }

        cases
    }

    /// Extract one test case from one block, or `None` for noise.
    fn parse_block(&self, block: &str, sequence: u32, ctx: &ParseContext) -> Option<TestCase> {
        let name = capture_first(&[&NAME_PATTERN, &NAME_FALLBACK_PATTERN], block);
        let test_type = capture_first(&[&TYPE_PATTERN, &TYPE_FALLBACK_PATTERN], block)
            .map(|t| map_test_type(&t))
            .unwrap_or_default();
        let priority = capture_first(&[&PRIORITY_PATTERN, &PRIORITY_FALLBACK_PATTERN], block)
            .map(|p| map_priority(&p))
            .unwrap_or_default();
        let code_ref = capture_first(&[&CODE_PATTERN, &CODE_FALLBACK_PATTERN], block)
            .unwrap_or_else(|| default_code(ctx.user_story_id.as_deref(), sequence));
        let preconditions =
            slice_section(block, &PRECONDITIONS_HEADER_PATTERN).unwrap_or_default();
        let steps = extract_steps(block);
        let result = extract_result(block);
        let observations =
            slice_section(block, &OBSERVATIONS_HEADER_PATTERN).unwrap_or_default();

        let expected_result = compose_expected(&result, &preconditions, &observations);
        if steps.is_empty() && expected_result.trim().is_empty() {
            return None;
        }

        let name = self.ensure_name_quality(name, sequence, ctx.user_story_id.as_deref());

        let mut case = TestCase::new(name, code_ref);
        case.project_id = ctx.project_id.clone();
        case.user_story_id = ctx.user_story_id.clone();
        case.test_type = test_type;
        case.priority = priority;
        case.steps = steps;
        case.expected_result = expected_result;
        case.cycle = ctx.cycle;
        Some(case)
    }

    /// Replace absent or degenerate names with a bank entry.
    ///
    /// Generative replies intermittently degrade into placeholder names
    /// under load.
    fn ensure_name_quality(
        &self,
        name: Option<String>,
        sequence: u32,
        story_id: Option<&str>,
    ) -> String {
        if let Some(name) = name {
            if !is_low_value_name(&name) {
                return name.trim().to_string();
            }
        }

        let bank = &self.config.fallback_names;
        let base = &bank[((sequence - 1) as usize) % bank.len()];
        match story_id {
            Some(story) => format!("{base} ({story})"),
            None => base.clone(),
        }
    }
}

// ============================================================================
// Block splitting
// ============================================================================

/// Split a reply into candidate case blocks.
///
/// Strategies in order; the first one that yields more than one block wins,
/// with the whole reply as the last resort.
fn split_blocks(reply: &str) -> Vec<String> {
    // Fenced output: strip the fence markers and recurse on the inner text.
    if FENCED_BLOCK_PATTERN.is_match(reply) {
        let inner = FENCED_BLOCK_PATTERN
            .captures_iter(reply)
            .map(|cap| cap[1].to_string())
            .collect::<Vec<_>>()
            .join("\n");
        return split_blocks(&inner);
    }

    // Case-marker boundaries.
    let starts: Vec<usize> = CASE_MARKER_PATTERN
        .find_iter(reply)
        .map(|m| m.start())
        .collect();
    if starts.len() > 1 {
        let mut blocks = Vec::with_capacity(starts.len());
        for (idx, &start) in starts.iter().enumerate() {
            let end = starts.get(idx + 1).copied().unwrap_or(reply.len());
            let block = reply[start..end].trim();
            if !block.is_empty() {
                blocks.push(block.to_string());
            }
        }
        return blocks;
    }

    // Paragraphs that mention a case, a steps and a result keyword at once.
    let paragraphs: Vec<String> = reply
        .split("\n\n")
        .map(str::trim)
        .filter(|p| {
            let lower = p.to_lowercase();
            CASE_KEYWORDS.iter().any(|k| lower.contains(k))
                && STEP_KEYWORDS.iter().any(|k| lower.contains(k))
                && RESULT_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(str::to_string)
        .collect();
    if paragraphs.len() > 1 {
        return paragraphs;
    }

    vec![reply.trim().to_string()]
}

// ============================================================================
// Field extraction
// ============================================================================

/// First capture among an ordered list of patterns.
fn capture_first(patterns: &[&LazyLock<Regex>], block: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(block)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Slice the text between a section header and the next known header.
fn slice_section(block: &str, header: &Regex) -> Option<String> {
    let m = header.find(block)?;
    let rest = &block[m.end()..];
    let end = SECTION_HEADER_PATTERN
        .find(rest)
        .map(|n| n.start())
        .unwrap_or(rest.len());
    let section = rest[..end].trim();
    (!section.is_empty()).then(|| section.to_string())
}

/// Layered step extraction: the sliced "Steps:" section, then numbered
/// lines anywhere in the block, then bullet lines.
fn extract_steps(block: &str) -> Vec<TestStep> {
    if let Some(section) = slice_section(block, &STEPS_HEADER_PATTERN) {
        let steps = lines_of(&NUMBERED_LINE_PATTERN, &section);
        if !steps.is_empty() {
            return steps;
        }
        let steps = lines_of(&LETTERED_LINE_PATTERN, &section);
        if !steps.is_empty() {
            return steps;
        }
    }

    let steps = lines_of(&NUMBERED_LINE_PATTERN, block);
    if !steps.is_empty() {
        return steps;
    }
    lines_of(&BULLET_LINE_PATTERN, block)
}

fn lines_of(pattern: &Regex, text: &str) -> Vec<TestStep> {
    pattern
        .captures_iter(text)
        .map(|cap| TestStep::new(cap[1].trim()))
        .filter(|step| !step.description.is_empty())
        .collect()
}

/// Primary "Resultado/Result" section, then the "Se espera/Expected"
/// fallback line.
fn extract_result(block: &str) -> String {
    if let Some(section) = slice_section(block, &RESULT_HEADER_PATTERN) {
        return section;
    }
    RESULT_FALLBACK_PATTERN
        .captures(block)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Compose the stored expectation from its parts, omitting blank parts
/// entirely rather than emitting empty labeled lines.
fn compose_expected(result: &str, preconditions: &str, observations: &str) -> String {
    let mut parts = Vec::new();
    if !result.trim().is_empty() {
        parts.push(result.trim().to_string());
    }
    if !preconditions.trim().is_empty() {
        parts.push(format!("Precondiciones: {}", preconditions.trim()));
    }
    if !observations.trim().is_empty() {
        parts.push(format!("Observaciones: {}", observations.trim()));
    }
    parts.join("\n")
}

/// Synthesized code when the block carries none.
fn default_code(story_id: Option<&str>, sequence: u32) -> String {
    match story_id {
        Some(story) if !story.trim().is_empty() => format!("{}-TC-{sequence:02}", story.trim()),
        _ => format!("TC-{sequence:03}"),
    }
}

/// A name is low-value when absent, too short, generic, or letterless.
fn is_low_value_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return true;
    }
    let lower = trimmed.to_lowercase();
    if GENERIC_NAME_MARKERS.iter().any(|m| lower.contains(m)) {
        return true;
    }
    !LETTER_RUN_PATTERN.is_match(trimmed)
}

/// Map free text onto the closed test-type enum.
fn map_test_type(text: &str) -> TestType {
    let lower = text.to_lowercase();
    const NON_FUNCTIONAL: &[&str] = &[
        "no funcional",
        "non-functional",
        "non functional",
        "nonfunctional",
    ];
    if NON_FUNCTIONAL.iter().any(|k| lower.contains(k)) {
        return TestType::NonFunctional;
    }
    if lower.contains("regres") {
        return TestType::Regression;
    }
    if lower.contains("segur") || lower.contains("security") {
        return TestType::Security;
    }
    if lower.contains("explorator") {
        return TestType::Exploratory;
    }
    if lower.contains("integra") {
        return TestType::Integration;
    }
    if lower.contains("rendimiento") || lower.contains("performance") || lower.contains("desempeño")
    {
        return TestType::Performance;
    }
    TestType::Functional
}

/// Map free text onto the closed priority enum.
fn map_priority(text: &str) -> Priority {
    let lower = text.to_lowercase();
    const HIGH: &[&str] = &["alta", "high", "critical", "crítica", "critica", "urgente"];
    const LOW: &[&str] = &["baja", "low", "minor", "menor"];
    if HIGH.iter().any(|k| lower.contains(k)) {
        return Priority::High;
    }
    if LOW.iter().any(|k| lower.contains(k)) {
        return Priority::Low;
    }
    Priority::Medium
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_story(story: &str) -> ParseContext {
        ParseContext::new(Some("PRJ-1".to_string()), Some(story.to_string()), 1)
    }

    const TWO_BLOCK_REPLY: &str = "\
Caso 1: Inicio de sesión exitoso con credenciales válidas
Pasos:
1. Abrir la página de inicio de sesión
2. Ingresar credenciales válidas
3. Presionar el botón Entrar
Resultado esperado: Se muestra el tablero principal

Caso 2: Rechazo de credenciales inválidas
Pasos:
1. Abrir la página de inicio de sesión
2. Ingresar una contraseña incorrecta
3. Presionar el botón Entrar
Resultado esperado: Se muestra un mensaje de error";

    #[test]
    fn test_two_delimited_blocks_yield_two_cases() {
        let parser = ResponseParser::new();
        let cases = parser.parse(TWO_BLOCK_REPLY, &ctx_with_story("HU-5"));

        assert_eq!(cases.len(), 2);
        for case in &cases {
            assert_eq!(case.steps.len(), 3);
            assert!(!case.expected_result.trim().is_empty());
        }
        assert_eq!(
            cases[0].name,
            "Inicio de sesión exitoso con credenciales válidas"
        );
    }

    #[test]
    fn test_fenced_reply_is_unwrapped() {
        let fenced = format!("```text\n{TWO_BLOCK_REPLY}\n```");
        let parser = ResponseParser::new();
        let cases = parser.parse(&fenced, &ctx_with_story("HU-5"));
        assert_eq!(cases.len(), 2);
    }

    #[test]
    fn test_malformed_block_is_dropped_silently() {
        let reply = "\
Caso 1: Inicio de sesión exitoso con credenciales válidas
Pasos:
1. Abrir la página
2. Ingresar credenciales
Resultado esperado: Se muestra el tablero

Caso 2: ???
???";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("HU-5"));
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].code_ref, "HU-5-TC-01");
    }

    #[test]
    fn test_sequence_advances_past_dropped_blocks() {
        let reply = "\
Caso 1: ???
???

Caso 2: Rechazo de credenciales inválidas
Pasos:
1. Ingresar contraseña incorrecta
Resultado esperado: Mensaje de error";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("HU-5"));

        assert_eq!(cases.len(), 1);
        // The dropped first block still consumed sequence number 1.
        assert_eq!(cases[0].code_ref, "HU-5-TC-02");
    }

    #[test]
    fn test_whole_reply_as_single_block() {
        let reply = "\
Nombre: Exportación del reporte mensual
Pasos:
1. Abrir el módulo de reportes
2. Seleccionar el mes
Resultado esperado: Se descarga el archivo";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("HU-9"));

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "Exportación del reporte mensual");
        assert_eq!(cases[0].steps.len(), 2);
    }

    #[test]
    fn test_explicit_code_wins_over_synthesized() {
        let reply = "\
Código: HU-9-TC-07
Nombre: Exportación del reporte mensual
Pasos:
1. Abrir el módulo de reportes
Resultado: Se descarga el archivo";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("HU-9"));
        assert_eq!(cases[0].code_ref, "HU-9-TC-07");
    }

    #[test]
    fn test_code_fallback_without_story() {
        let reply = "\
Nombre: Exportación del reporte mensual
Pasos:
1. Abrir el módulo de reportes
Resultado: Se descarga el archivo";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ParseContext::new(None, None, 1));
        assert_eq!(cases[0].code_ref, "TC-001");
    }

    #[test]
    fn test_generic_name_is_replaced() {
        let reply = "\
Nombre: Test Case 1
Pasos:
1. Abrir la aplicación
Resultado esperado: La pantalla principal carga";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("HU-2"));

        let name = &cases[0].name;
        assert!(!name.to_lowercase().contains("test case"));
        assert!(LETTER_RUN_PATTERN.is_match(name));
        assert!(name.contains("HU-2"));
    }

    #[test]
    fn test_short_and_letterless_names_are_replaced() {
        assert!(is_low_value_name("Login"));
        assert!(is_low_value_name("123 456 789 0"));
        assert!(is_low_value_name("caso de prueba numero dos"));
        assert!(!is_low_value_name("Login rejects an expired password"));
    }

    #[test]
    fn test_fallback_bank_wraps_by_sequence() {
        let parser = ResponseParser::with_config(
            ParserConfig::default().with_fallback_names(vec![
                "Primary flow verification".to_string(),
                "Invalid input rejection".to_string(),
            ]),
        );

        let first = parser.ensure_name_quality(None, 1, None);
        let second = parser.ensure_name_quality(None, 2, None);
        let third = parser.ensure_name_quality(None, 3, None);

        assert_eq!(first, "Primary flow verification");
        assert_eq!(second, "Invalid input rejection");
        assert_eq!(third, first);
    }

    #[test]
    fn test_expected_result_composition() {
        let reply = "\
Nombre: Exportación con sesión activa
Precondiciones: Usuario autenticado con rol administrador
Pasos:
1. Abrir el módulo de reportes
Resultado esperado: Se descarga el archivo
Observaciones: Validado solo en Chrome";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("HU-9"));

        let expected = &cases[0].expected_result;
        assert!(expected.starts_with("Se descarga el archivo"));
        assert!(expected.contains("Precondiciones: Usuario autenticado con rol administrador"));
        assert!(expected.contains("Observaciones: Validado solo en Chrome"));
    }

    #[test]
    fn test_blank_parts_are_omitted_from_expected() {
        let reply = "\
Nombre: Exportación del reporte mensual
Pasos:
1. Abrir el módulo
Resultado: Se descarga el archivo";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("HU-9"));

        assert_eq!(cases[0].expected_result, "Se descarga el archivo");
        assert!(!cases[0].expected_result.contains("Precondiciones"));
        assert!(!cases[0].expected_result.contains("Observaciones"));
    }

    #[test]
    fn test_result_fallback_label() {
        let reply = "\
Nombre: Validación de campos obligatorios
Pasos:
1. Enviar el formulario vacío
Se espera que cada campo muestre su mensaje de error";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("HU-3"));

        assert!(cases[0]
            .expected_result
            .contains("cada campo muestre su mensaje de error"));
    }

    #[test]
    fn test_bullet_steps_as_last_resort() {
        let reply = "\
Nombre: Validación de campos obligatorios
- Enviar el formulario vacío
- Revisar los mensajes
Resultado: Se muestran los errores";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("HU-3"));
        assert_eq!(cases[0].steps.len(), 2);
    }

    #[test]
    fn test_type_and_priority_mapping() {
        assert_eq!(map_test_type("Pruebas de regresión"), TestType::Regression);
        assert_eq!(map_test_type("Seguridad"), TestType::Security);
        assert_eq!(map_test_type("security"), TestType::Security);
        assert_eq!(map_test_type("No funcional"), TestType::NonFunctional);
        assert_eq!(map_test_type("performance"), TestType::Performance);
        assert_eq!(map_test_type("integración"), TestType::Integration);
        assert_eq!(map_test_type("whatever"), TestType::Functional);

        assert_eq!(map_priority("Alta"), Priority::High);
        assert_eq!(map_priority("critical"), Priority::High);
        assert_eq!(map_priority("baja"), Priority::Low);
        assert_eq!(map_priority("minor"), Priority::Low);
        assert_eq!(map_priority("media"), Priority::Medium);
        assert_eq!(map_priority("???"), Priority::Medium);
    }

    #[test]
    fn test_unparseable_reply_returns_empty() {
        let parser = ResponseParser::new();
        let cases = parser.parse("lorem ipsum dolor sit amet", &ctx_with_story("HU-1"));
        assert!(cases.is_empty());
    }

    #[test]
    fn test_empty_reply_returns_empty() {
        let parser = ResponseParser::new();
        assert!(parser.parse("", &ParseContext::default()).is_empty());
    }

    #[test]
    fn test_cases_carry_context_ids() {
        let parser = ResponseParser::new();
        let cases = parser.parse(TWO_BLOCK_REPLY, &ctx_with_story("HU-5"));

        assert_eq!(cases[0].project_id.as_deref(), Some("PRJ-1"));
        assert_eq!(cases[0].user_story_id.as_deref(), Some("HU-5"));
        assert_eq!(cases[0].cycle, 1);
    }

    #[test]
    fn test_english_markers_split_blocks() {
        let reply = "\
Test Case 1: Successful login with valid credentials
Steps:
1. Open the login page
2. Enter valid credentials
Expected result: The dashboard is shown

Test Case 2: Lockout after repeated failures
Steps:
1. Enter a wrong password five times
Expected result: The account is locked";
        let parser = ResponseParser::new();
        let cases = parser.parse(reply, &ctx_with_story("US-8"));

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[1].name, "Lockout after repeated failures");
        assert_eq!(cases[1].code_ref, "US-8-TC-02");
    }
}
