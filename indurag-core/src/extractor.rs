//! Deterministic rule-based extraction.
//!
//! The terminal tier of the provider chain. It never generates text: every
//! captured line is copied from the context, classified by keyword into a
//! warning, a cause or a fix, and placed in the canonical answer layout.
//!
//! Classification uses strict precedence (warning > cause > fix). A line goes
//! to the first category whose keywords it contains; if that category is
//! already full the line is dropped rather than moved down.

use crate::answer::{NO_SAFETY_NOTES, NOT_FOUND, STEPS_NOT_FOUND, SafetyNotes, StructuredAnswer};
use crate::config::ExtractorLimits;
use tracing::debug;

/// Line category, declared in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Warning,
    Cause,
    Fix,
}

const WARNING_KEYWORDS: &[&str] = &[
    "warning", "caution", "danger", "do not", "must not", "hazard", "electric", "shock", "fire",
    "risk", "never",
];

const CAUSE_KEYWORDS: &[&str] = &[
    "cause",
    "caused by",
    "due to",
    "failure",
    "fault",
    "defect",
    "worn",
    "damaged",
    "failed",
    "broken",
    "loose",
    "blocked",
    "missing",
];

const FIX_KEYWORDS: &[&str] = &[
    "replace",
    "check",
    "verify",
    "inspect",
    "clean",
    "adjust",
    "tighten",
    "reset",
    "test",
    "turn off",
    "turn on",
    "connect",
    "disconnect",
    "press",
    "ensure",
    "remove",
    "install",
    "lubricate",
    "charge",
];

/// Keyword table checked top to bottom.
const PRECEDENCE: &[(Category, &[&str])] = &[
    (Category::Warning, WARNING_KEYWORDS),
    (Category::Cause, CAUSE_KEYWORDS),
    (Category::Fix, FIX_KEYWORDS),
];

/// Lines starting with this are retrieval metadata, not manual text.
const METADATA_MARKER: char = '[';

/// Classify a single line. Matching is a case-insensitive substring test.
pub fn classify(line: &str) -> Option<Category> {
    let lower = line.to_lowercase();
    PRECEDENCE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
}

/// Lines captured from a context, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub warnings: Vec<String>,
    pub causes: Vec<String>,
    pub fixes: Vec<String>,
}

impl Extraction {
    pub fn has_content(&self) -> bool {
        !self.causes.is_empty() || !self.fixes.is_empty()
    }
}

/// The always-succeeding fallback tier.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedExtractor {
    limits: ExtractorLimits,
}

impl RuleBasedExtractor {
    pub fn new(limits: ExtractorLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExtractorLimits {
        &self.limits
    }

    /// Sort context lines into capped category buckets.
    pub fn capture(&self, context: &str) -> Extraction {
        let mut extraction = Extraction::default();

        let lines = context
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(METADATA_MARKER));

        for line in lines {
            let Some(category) = classify(line) else {
                continue;
            };
            let (bucket, cap) = match category {
                Category::Warning => (&mut extraction.warnings, self.limits.max_warnings),
                Category::Cause => (&mut extraction.causes, self.limits.max_causes),
                Category::Fix => (&mut extraction.fixes, self.limits.max_fixes),
            };
            if bucket.len() < cap {
                bucket.push(truncate_chars(line, self.limits.max_line_chars));
            }
        }

        debug!(
            warnings = extraction.warnings.len(),
            causes = extraction.causes.len(),
            fixes = extraction.fixes.len(),
            "Rule-based extraction complete"
        );
        extraction
    }

    /// Produce the canonical answer text. Never fails.
    pub fn extract(&self, context: &str, query: &str) -> String {
        let extraction = self.capture(context);

        let summary = if extraction.has_content() {
            format!(
                "Information found in the uploaded manual regarding \"{}\".",
                query
            )
        } else {
            format!("No direct match for \"{}\" found in retrieved pages.", query)
        };

        let Extraction {
            warnings,
            causes,
            fixes,
        } = extraction;

        let causes = if causes.is_empty() {
            vec![NOT_FOUND.to_string()]
        } else {
            causes
        };
        let steps = if fixes.is_empty() {
            vec![STEPS_NOT_FOUND.to_string()]
        } else {
            fixes
        };
        let safety = if warnings.is_empty() {
            SafetyNotes::Text(NO_SAFETY_NOTES.to_string())
        } else {
            SafetyNotes::Bullets(warnings)
        };

        StructuredAnswer {
            summary,
            causes,
            steps,
            safety,
        }
        .render()
    }
}

fn truncate_chars(line: &str, max_chars: usize) -> String {
    line.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> RuleBasedExtractor {
        RuleBasedExtractor::default()
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify("Warning: disconnect power"), Some(Category::Warning));
        assert_eq!(classify("Failure caused by loose wiring"), Some(Category::Cause));
        assert_eq!(classify("Tighten the belt"), Some(Category::Fix));
        assert_eq!(classify("Model 3000 overview"), None);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("DANGER HIGH VOLTAGE"), Some(Category::Warning));
        assert_eq!(classify("BLOCKED FILTER"), Some(Category::Cause));
    }

    #[test]
    fn test_bearing_scenario() {
        let context = "Fault: bearing worn.\nReplace bearing.\nWarning: disconnect power before servicing.";
        let extraction = extractor().capture(context);
        assert_eq!(extraction.causes, vec!["Fault: bearing worn."]);
        assert_eq!(extraction.fixes, vec!["Replace bearing."]);
        assert_eq!(
            extraction.warnings,
            vec!["Warning: disconnect power before servicing."]
        );
    }

    #[test]
    fn test_bearing_scenario_rendered() {
        let context = "Fault: bearing worn.\nReplace bearing.\nWarning: disconnect power before servicing.";
        let text = extractor().extract(context, "grinding noise");
        assert_eq!(
            text,
            "PROBLEM SUMMARY:\n\
             Information found in the uploaded manual regarding \"grinding noise\".\n\n\
             POSSIBLE CAUSES:\n1. Fault: bearing worn.\n\n\
             STEP-BY-STEP CORRECTIVE ACTIONS:\n1. Replace bearing.\n\n\
             SAFETY NOTES:\n- Warning: disconnect power before servicing.\n"
        );
    }

    #[test]
    fn test_warning_with_cause_keyword_stays_warning() {
        let context = "Caution: failure to ground the frame causes shock.";
        let extraction = extractor().capture(context);
        assert_eq!(extraction.warnings.len(), 1);
        assert!(extraction.causes.is_empty());
    }

    #[test]
    fn test_full_category_discards_instead_of_demoting() {
        let context = "\
Warning: hot surface.
Caution: moving parts.
Danger: high voltage.
Never operate with a broken guard.";
        let extraction = extractor().capture(context);
        assert_eq!(extraction.warnings.len(), 3);
        // "broken" is a cause keyword, but the line belongs to the full warning bucket.
        assert!(extraction.causes.is_empty());
    }

    #[test]
    fn test_fix_cap_keeps_first_seven_in_order() {
        let context: String = (1..=10)
            .map(|i| format!("Step {i}: inspect the seal"))
            .collect::<Vec<_>>()
            .join("\n");
        let extraction = extractor().capture(&context);
        let expected: Vec<String> = (1..=7).map(|i| format!("Step {i}: inspect the seal")).collect();
        assert_eq!(extraction.fixes, expected);
    }

    #[test]
    fn test_cause_cap() {
        let context: String = (0..8)
            .map(|i| format!("Valve {i} blocked"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(extractor().capture(&context).causes.len(), 5);
    }

    #[test]
    fn test_long_lines_truncated_to_250_chars() {
        let line = format!("Replace {}", "x".repeat(400));
        let extraction = extractor().capture(&line);
        assert_eq!(extraction.fixes[0].chars().count(), 250);
        assert!(line.starts_with(&extraction.fixes[0]));
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let line = format!("Replace {}", "é".repeat(300));
        let extraction = extractor().capture(&line);
        assert_eq!(extraction.fixes[0].chars().count(), 250);
    }

    #[test]
    fn test_metadata_and_blank_lines_skipped() {
        let context = "[Page 4 | pump.pdf]\n\n   \n  [score 0.82] replace impeller\nClean the strainer.";
        let extraction = extractor().capture(context);
        assert_eq!(extraction.fixes, vec!["Clean the strainer."]);
    }

    #[test]
    fn test_lines_are_trimmed() {
        let extraction = extractor().capture("    Check oil level.   ");
        assert_eq!(extraction.fixes, vec!["Check oil level."]);
    }

    #[test]
    fn test_empty_context_not_found() {
        for context in ["", "   "] {
            let text = extractor().extract(context, "overheating");
            assert!(text.contains("No direct match for \"overheating\" found in retrieved pages."));
            assert!(text.contains("POSSIBLE CAUSES:\n1. Not found in manual.\n"));
            assert!(text.contains(
                "STEP-BY-STEP CORRECTIVE ACTIONS:\n1. Not found in manual. Refer to the referenced pages directly.\n"
            ));
            assert!(text.ends_with("SAFETY NOTES:\nNone stated in manual.\n"));
        }
    }

    #[test]
    fn test_warnings_only_is_not_content() {
        let text = extractor().extract("Danger: rotating shaft.", "vibration");
        assert!(text.contains("No direct match"));
        assert!(text.contains("- Danger: rotating shaft."));
    }

    #[test]
    fn test_custom_limits() {
        let extractor = RuleBasedExtractor::new(ExtractorLimits {
            max_causes: 1,
            max_fixes: 1,
            max_warnings: 1,
            max_line_chars: 10,
        });
        let extraction =
            extractor.capture("Seal worn out badly\nSeal damaged\nReplace the seal kit\nCheck it");
        assert_eq!(extraction.causes, vec!["Seal worn "]);
        assert_eq!(extraction.fixes, vec!["Replace th"]);
    }

    #[test]
    fn test_fix_mentioning_safety_does_not_survive_parse() {
        let context = "Check the safety valve.\nReplace the gasket.";
        let extraction = extractor().capture(context);
        assert_eq!(
            extraction.fixes,
            vec!["Check the safety valve.", "Replace the gasket."]
        );

        let parsed = crate::parser::parse(&extractor().extract(context, "leak"));
        assert!(parsed.steps.is_empty());
        assert_eq!(parsed.safety, "2. Replace the gasket. None stated in manual.");
    }
}
