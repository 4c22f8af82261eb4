//! Section parser for the canonical answer text.
//!
//! A line-oriented state machine. Header lines switch the current section,
//! other lines are collected into it. Parsing never fails: text before the
//! first header is dropped and unknown layouts produce an empty answer.

use serde::{Deserialize, Serialize};

/// Parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    Summary,
    Causes,
    Steps,
    Safety,
}

/// Header phrases and the section they open, checked in order.
///
/// Matching is a case-insensitive substring test, so `Possible Causes:` and
/// `possible causes - see below` both open [`Section::Causes`].
const HEADER_TABLE: &[(&str, Section)] = &[
    ("PROBLEM SUMMARY", Section::Summary),
    ("POSSIBLE CAUSES", Section::Causes),
    ("CORRECTIVE ACTION", Section::Steps),
    ("STEP-BY-STEP", Section::Steps),
    ("SAFETY", Section::Safety),
];

/// Enumeration characters stripped from the front of list entries.
const LIST_PREFIX: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', '-', '•', ' '];

/// Typed view of an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnswer {
    pub summary: String,
    pub causes: Vec<String>,
    pub steps: Vec<String>,
    pub safety: String,
}

impl ParsedAnswer {
    /// Whether the safety section says anything worth showing.
    ///
    /// The "None stated in manual." placeholder does not count.
    pub fn has_safety_notes(&self) -> bool {
        !self.safety.is_empty() && !self.safety.to_lowercase().contains("none")
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.causes.is_empty()
            && self.steps.is_empty()
            && self.safety.is_empty()
    }
}

/// Return the section a header line opens, if it is one.
pub fn match_header(line: &str) -> Option<Section> {
    let upper = line.to_uppercase();
    HEADER_TABLE
        .iter()
        .find(|(phrase, _)| upper.contains(phrase))
        .map(|(_, section)| *section)
}

/// Parse canonical answer text into sections.
pub fn parse(text: &str) -> ParsedAnswer {
    let mut out = ParsedAnswer::default();
    let mut state = Section::None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(next) = match_header(line) {
            state = next;
            continue;
        }
        match state {
            Section::Summary => {
                out.summary.push_str(line);
                out.summary.push(' ');
            }
            Section::Safety => {
                out.safety.push_str(line);
                out.safety.push(' ');
            }
            Section::Causes => push_list_entry(&mut out.causes, line),
            Section::Steps => push_list_entry(&mut out.steps, line),
            Section::None => {}
        }
    }

    out.summary = out.summary.trim().to_string();
    out.safety = out.safety.trim().to_string();
    out
}

fn push_list_entry(list: &mut Vec<String>, line: &str) {
    let clean = line.trim_start_matches(LIST_PREFIX).trim();
    if !clean.is_empty() {
        list.push(clean.to_string());
    }
}
