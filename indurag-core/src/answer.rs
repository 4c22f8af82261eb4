//! The canonical four-section answer layout.
//!
//! Every tier emits this text form and the section parser reads it back:
//!
//! ```text
//! PROBLEM SUMMARY:
//! ...
//!
//! POSSIBLE CAUSES:
//! 1. ...
//!
//! STEP-BY-STEP CORRECTIVE ACTIONS:
//! 1. ...
//!
//! SAFETY NOTES:
//! ...
//! ```

pub const SUMMARY_HEADER: &str = "PROBLEM SUMMARY:";
pub const CAUSES_HEADER: &str = "POSSIBLE CAUSES:";
pub const STEPS_HEADER: &str = "STEP-BY-STEP CORRECTIVE ACTIONS:";
pub const SAFETY_HEADER: &str = "SAFETY NOTES:";

pub const NOT_FOUND: &str = "Not found in manual.";
pub const STEPS_NOT_FOUND: &str = "Not found in manual. Refer to the referenced pages directly.";
pub const NO_SAFETY_NOTES: &str = "None stated in manual.";

/// How the safety section is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyNotes {
    /// One `- ` bullet per note.
    Bullets(Vec<String>),
    /// Free text on its own line.
    Text(String),
}

/// Builder for the canonical text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredAnswer {
    pub summary: String,
    pub causes: Vec<String>,
    pub steps: Vec<String>,
    pub safety: SafetyNotes,
}

impl StructuredAnswer {
    /// Render the four sections. Causes and steps are numbered from 1.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(SUMMARY_HEADER);
        out.push('\n');
        out.push_str(&self.summary);
        out.push_str("\n\n");

        out.push_str(CAUSES_HEADER);
        out.push('\n');
        push_numbered(&mut out, &self.causes);

        out.push('\n');
        out.push_str(STEPS_HEADER);
        out.push('\n');
        push_numbered(&mut out, &self.steps);

        out.push('\n');
        out.push_str(SAFETY_HEADER);
        out.push('\n');
        match &self.safety {
            SafetyNotes::Bullets(notes) => {
                for note in notes {
                    out.push_str("- ");
                    out.push_str(note);
                    out.push('\n');
                }
            }
            SafetyNotes::Text(text) => {
                out.push_str(text);
                out.push('\n');
            }
        }
        out
    }
}

fn push_numbered(out: &mut String, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item));
    }
}

/// Answer returned when retrieval produced no context at all.
///
/// Depends only on `query` and `machine`.
pub fn no_context_answer(query: &str, machine: &str) -> String {
    let answer = StructuredAnswer {
        summary: format!(
            "No relevant content retrieved from the manual for \"{}\" on {}.",
            query, machine
        ),
        causes: vec![NOT_FOUND.to_string()],
        steps: vec![
            "Verify the correct manual has been uploaded in the Admin panel.".to_string(),
            "Ensure the machine name matches exactly what was used during upload.".to_string(),
            "Try rephrasing using terms from the manual.".to_string(),
        ],
        safety: SafetyNotes::Text("Do not attempt repairs without the official manual.".into()),
    };
    answer.render()
}
