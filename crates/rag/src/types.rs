//! Core data types for the RAG pipeline.

use serde::{Deserialize, Serialize};

/// Legal category of a query.
///
/// Closed set: every query resolves to exactly one value, with `General`
/// as the fallback. The lowercase Spanish key doubles as the corpus key
/// and the vector-index filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Laboral,
    Consumidor,
    Familia,
    Civil,
    Transito,
    Empresas,
    General,
}

impl Category {
    /// All categories, for exhaustiveness checks in tests.
    pub const ALL: [Category; 7] = [
        Category::Laboral,
        Category::Consumidor,
        Category::Familia,
        Category::Civil,
        Category::Transito,
        Category::Empresas,
        Category::General,
    ];

    /// Get the canonical lowercase key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Laboral => "laboral",
            Category::Consumidor => "consumidor",
            Category::Familia => "familia",
            Category::Civil => "civil",
            Category::Transito => "transito",
            Category::Empresas => "empresas",
            Category::General => "general",
        }
    }
}

/// A retrieved snippet of legal text with its citation.
///
/// Produced per request, never persisted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalSource {
    /// The legal text itself
    pub text: String,

    /// Originating law or document (e.g., "D.S. 003-97-TR")
    pub law: String,

    /// Article citation within the law
    pub article: String,

    /// Category this source was retrieved under
    pub category: Category,

    /// Relevance score from vector search, absent for corpus entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Generation persona: legal advisor or hearing-simulation judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Advisor,
    Hearing,
}

impl Mode {
    /// Parse a mode name from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "advisor" => Some(Self::Advisor),
            "hearing" => Some(Self::Hearing),
            _ => None,
        }
    }
}

/// Final result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// The answer text (or localized error/clarification text)
    pub answer: String,

    /// Sources the answer was grounded on (possibly empty)
    pub sources: Vec<LegalSource>,

    /// Classified category of the query
    pub category: Category,

    /// Whether the user should consult a human lawyer
    pub needs_lawyer: bool,

    /// Coarse confidence: reflects whether sources were found,
    /// not a calibrated probability
    pub confidence: f32,
}

impl GenerationResult {
    /// Result for a successfully generated answer.
    ///
    /// `needs_lawyer` and `confidence` derive purely from whether sources
    /// were found: no sources means the answer is ungrounded.
    pub fn answered(answer: String, sources: Vec<LegalSource>, category: Category) -> Self {
        let needs_lawyer = sources.is_empty();
        let confidence = if sources.is_empty() { 0.5 } else { 0.9 };
        Self {
            answer,
            sources,
            category,
            needs_lawyer,
            confidence,
        }
    }

    /// Result for an intent shortcut (greeting, thanks, clarification).
    ///
    /// No generation took place; the canned reply is authoritative.
    pub fn shortcut(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            category: Category::General,
            needs_lawyer: false,
            confidence: 1.0,
        }
    }

    /// Degraded result for a failed primary generation call.
    pub fn failed(answer: String, sources: Vec<LegalSource>, category: Category) -> Self {
        Self {
            answer,
            sources,
            category,
            needs_lawyer: true,
            confidence: 0.0,
        }
    }
}
