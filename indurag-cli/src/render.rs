//! Terminal rendering of parsed answers with ANSI emphasis.

use indurag_core::answer::{CAUSES_HEADER, SAFETY_HEADER, STEPS_HEADER, SUMMARY_HEADER};
use indurag_core::{ChunkRef, FormatResponse, ParsedAnswer};

/// ANSI escape codes for terminal formatting.
mod ansi {
    pub const BOLD_ON: &str = "\x1b[1m";
    pub const BOLD_OFF: &str = "\x1b[22m";
    pub const DIM_ON: &str = "\x1b[2m";
    pub const DIM_OFF: &str = "\x1b[22m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RESET: &str = "\x1b[0m";
}

fn heading(out: &mut String, title: &str) {
    out.push_str(ansi::BOLD_ON);
    out.push_str(title);
    out.push_str(ansi::BOLD_OFF);
    out.push('\n');
}

fn numbered(out: &mut String, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, item));
    }
}

/// Render the sections of a parsed answer.
///
/// The safety block is highlighted only when it carries real notes.
pub fn render_answer(parsed: &ParsedAnswer) -> String {
    let mut out = String::new();

    heading(&mut out, SUMMARY_HEADER);
    out.push_str("  ");
    out.push_str(&parsed.summary);
    out.push_str("\n\n");

    heading(&mut out, CAUSES_HEADER);
    numbered(&mut out, &parsed.causes);
    out.push('\n');

    heading(&mut out, STEPS_HEADER);
    numbered(&mut out, &parsed.steps);
    out.push('\n');

    heading(&mut out, SAFETY_HEADER);
    if parsed.has_safety_notes() {
        out.push_str(&format!("  {}{}{}\n", ansi::YELLOW, parsed.safety, ansi::RESET));
    } else {
        out.push_str(&format!("  {}{}{}\n", ansi::DIM_ON, parsed.safety, ansi::DIM_OFF));
    }
    out
}

/// Render chunk provenance, highest score first.
pub fn render_sources(chunks: &[ChunkRef]) -> String {
    if chunks.is_empty() {
        return String::new();
    }
    let mut sorted: Vec<&ChunkRef> = chunks.iter().collect();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut out = String::new();
    heading(&mut out, "SOURCES:");
    for chunk in sorted {
        out.push_str(&format!("  [{:.2}] {}\n", chunk.score, chunk.source_label()));
    }
    out
}

/// Full human-readable output for `indurag format`.
pub fn render_response(response: &FormatResponse) -> String {
    let mut out = render_answer(&response.parsed);
    let sources = render_sources(&response.chunks);
    if !sources.is_empty() {
        out.push('\n');
        out.push_str(&sources);
    }
    out.push_str(&format!(
        "\n{}answered by: {}{}\n",
        ansi::DIM_ON,
        response.backend,
        ansi::DIM_OFF
    ));
    out
}
