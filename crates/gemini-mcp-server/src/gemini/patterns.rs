// crates/gemini-mcp-server/src/gemini/patterns.rs
// Phrasing that suggests a second opinion is worth asking for

use regex::Regex;
use std::sync::LazyLock;

/// Pattern family. Its name prefixes every match label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFamily {
    Uncertainty,
    ComplexDecision,
    CriticalOperation,
}

impl PatternFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternFamily::Uncertainty => "uncertainty",
            PatternFamily::ComplexDecision => "complex_decision",
            PatternFamily::CriticalOperation => "critical_operation",
        }
    }
}

/// (family, label, pattern). Patterns are compiled case-insensitively.
const PATTERN_TABLE: &[(PatternFamily, &str, &str)] = &[
    (PatternFamily::Uncertainty, "I'm not sure", r"\bI['’]m not sure\b"),
    (PatternFamily::Uncertainty, "I think", r"\bI think\b"),
    (PatternFamily::Uncertainty, "possibly", r"\bpossibly\b"),
    (PatternFamily::Uncertainty, "probably", r"\bprobably\b"),
    (PatternFamily::Uncertainty, "might be", r"\bmight be\b"),
    (PatternFamily::Uncertainty, "could be", r"\bcould be\b"),
    (PatternFamily::Uncertainty, "I believe", r"\bI believe\b"),
    (PatternFamily::Uncertainty, "it seems", r"\bIt seems\b"),
    (PatternFamily::Uncertainty, "appears to be", r"\bappears to be\b"),
    (PatternFamily::Uncertainty, "uncertain", r"\buncertain\b"),
    (PatternFamily::Uncertainty, "I would guess", r"\bI would guess\b"),
    (PatternFamily::Uncertainty, "likely", r"\blikely\b"),
    (PatternFamily::Uncertainty, "perhaps", r"\bperhaps\b"),
    (PatternFamily::Uncertainty, "maybe", r"\bmaybe\b"),
    (PatternFamily::Uncertainty, "I assume", r"\bI assume\b"),
    (PatternFamily::ComplexDecision, "multiple approaches", r"\bmultiple approaches\b"),
    (PatternFamily::ComplexDecision, "several options", r"\bseveral options\b"),
    (PatternFamily::ComplexDecision, "trade-offs", r"\btrade-offs?\b"),
    (PatternFamily::ComplexDecision, "considering", r"\bconsider(?:ing)?\b"),
    (PatternFamily::ComplexDecision, "alternatives", r"\balternatives?\b"),
    (PatternFamily::ComplexDecision, "pros and cons", r"\bpros and cons\b"),
    (PatternFamily::ComplexDecision, "weighing the options", r"\bweigh(?:ing)? the options\b"),
    (PatternFamily::ComplexDecision, "choice between", r"\bchoice between\b"),
    (PatternFamily::ComplexDecision, "decision", r"\bdecision\b"),
    (PatternFamily::CriticalOperation, "production", r"\bproduction\b"),
    (PatternFamily::CriticalOperation, "database migration", r"\bdatabase migration\b"),
    (PatternFamily::CriticalOperation, "security", r"\bsecurity\b"),
    (PatternFamily::CriticalOperation, "authentication", r"\bauthentication\b"),
    (PatternFamily::CriticalOperation, "encryption", r"\bencryption\b"),
    (PatternFamily::CriticalOperation, "API key", r"\bAPI key\b"),
    (PatternFamily::CriticalOperation, "credentials", r"\bcredentials?\b"),
    (PatternFamily::CriticalOperation, "performance critical", r"\bperformance\s+critical\b"),
];

struct CompiledPattern {
    family: PatternFamily,
    label: &'static str,
    regex: Regex,
}

static PATTERNS: LazyLock<Vec<CompiledPattern>> = LazyLock::new(|| {
    PATTERN_TABLE
        .iter()
        .map(|&(family, label, pattern)| CompiledPattern {
            family,
            label,
            // SAFETY: static literal patterns; compilation cannot fail.
            #[allow(clippy::expect_used)]
            regex: Regex::new(&format!("(?i){}", pattern)).expect("uncertainty pattern"),
        })
        .collect()
});

/// Scan text for uncertainty, complex-decision and critical-operation phrasing.
///
/// Returns whether anything matched plus one `family: label` entry per
/// matching pattern, in table order. Pure text analysis: no configuration
/// flag affects the result.
pub fn detect_uncertainty(text: &str) -> (bool, Vec<String>) {
    let found: Vec<String> = PATTERNS
        .iter()
        .filter(|p| p.regex.is_match(text))
        .map(|p| format!("{}: {}", p.family.as_str(), p.label))
        .collect();

    (!found.is_empty(), found)
}
