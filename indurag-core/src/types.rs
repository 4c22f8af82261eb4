//! Core data types shared across the formatting pipeline.

use serde::{Deserialize, Serialize};

/// A formatting request: retrieved context plus the technician's question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub context: String,
    pub query: String,
    pub machine: String,
}

impl Query {
    pub fn new(
        context: impl Into<String>,
        query: impl Into<String>,
        machine: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            query: query.into(),
            machine: machine.into(),
        }
    }

    /// True when retrieval produced nothing usable.
    pub fn has_context(&self) -> bool {
        !self.context.trim().is_empty()
    }
}

/// A single generation call sent to a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Grounding rules.
    pub system: String,
    /// User turn with the delimited context and the query.
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

/// Raw text returned by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
    pub model: String,
}

/// Bookkeeping for one attempted tier of the provider chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub backend_name: String,
    pub text: String,
    pub succeeded: bool,
}

impl GenerationOutcome {
    pub fn success(backend_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            backend_name: backend_name.into(),
            text: text.into(),
            succeeded: true,
        }
    }

    pub fn failure(backend_name: impl Into<String>) -> Self {
        Self {
            backend_name: backend_name.into(),
            text: String::new(),
            succeeded: false,
        }
    }
}

/// Retrieval chunk metadata. The core never inspects or modifies these; they
/// ride alongside the parsed answer to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRef {
    pub text: String,
    pub score: f64,
    /// `"manual"` for PDF pages, anything else for repair-log rows.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    /// Any other fields the retriever attached, kept as received.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ChunkRef {
    /// Short provenance label, e.g. `Page 12 | pump.pdf` or `Repair Log`.
    pub fn source_label(&self) -> String {
        if self.source == "manual" {
            let page = self
                .page
                .map(|p| p.to_string())
                .unwrap_or_else(|| "?".to_string());
            format!("Page {} | {}", page, self.pdf.as_deref().unwrap_or(""))
        } else {
            "Repair Log".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_has_context() {
        assert!(Query::new("Fault: bearing worn.", "noise", "Pump 3").has_context());
        assert!(!Query::new("  \n\t ", "noise", "Pump 3").has_context());
        assert!(!Query::new("", "noise", "Pump 3").has_context());
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = GenerationOutcome::success("openai", "PROBLEM SUMMARY:");
        assert!(ok.succeeded);
        assert_eq!(ok.backend_name, "openai");

        let failed = GenerationOutcome::failure("ollama");
        assert!(!failed.succeeded);
        assert!(failed.text.is_empty());
    }

    #[test]
    fn test_chunk_source_label_manual() {
        let chunk = ChunkRef {
            text: "Replace bearing.".into(),
            score: 0.72,
            source: "manual".into(),
            page: Some(14),
            pdf: Some("pioneer3.pdf".into()),
            extra: Default::default(),
        };
        assert_eq!(chunk.source_label(), "Page 14 | pioneer3.pdf");
    }

    #[test]
    fn test_chunk_source_label_manual_without_page() {
        let chunk = ChunkRef {
            text: String::new(),
            score: 0.1,
            source: "manual".into(),
            page: None,
            pdf: None,
            extra: Default::default(),
        };
        assert_eq!(chunk.source_label(), "Page ? | ");
    }

    #[test]
    fn test_chunk_source_label_repair_log() {
        let chunk = ChunkRef {
            text: "Motor replaced 2024-03".into(),
            score: 0.5,
            source: "excel".into(),
            page: None,
            pdf: None,
            extra: Default::default(),
        };
        assert_eq!(chunk.source_label(), "Repair Log");
    }

    #[test]
    fn test_chunk_deserializes_without_optional_fields() {
        let chunk: ChunkRef =
            serde_json::from_str(r#"{"text":"t","score":0.3,"source":"log"}"#).unwrap();
        assert_eq!(chunk.page, None);
        assert_eq!(chunk.pdf, None);
        assert!(chunk.extra.is_empty());
    }

    #[test]
    fn test_chunk_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "text": "Replace bearing.",
            "score": 0.72,
            "source": "manual",
            "page": 14,
            "pdf": "pioneer3.pdf",
            "chunk_id": "p3-014-02",
            "bbox": [12, 40, 300, 88]
        });
        let chunk: ChunkRef = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(chunk.extra["chunk_id"], "p3-014-02");
        assert_eq!(serde_json::to_value(&chunk).unwrap(), raw);
    }
}
