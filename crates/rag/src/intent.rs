//! Intent shortcuts: cheap local checks run before the full pipeline.
//!
//! Pure functions over the raw query string. Greetings, thanks, and
//! trivially short queries get canned localized replies without paying
//! for retrieval or generation.

use crate::types::LegalSource;
use std::collections::HashSet;

/// Detected query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Es,
    En,
}

const SPANISH_WORDS: &[&str] = &[
    "el", "la", "de", "que", "en", "es", "un", "por", "con", "para", "hola", "gracias",
];

const ENGLISH_WORDS: &[&str] = &[
    "the", "is", "of", "to", "and", "in", "for", "on", "with", "at", "hello", "thanks",
];

const GREETINGS: &[&str] = &[
    "hola",
    "buenos días",
    "buenas tardes",
    "buenas noches",
    "hey",
    "hi",
    "buenas",
    "qué tal",
    "como estas",
    "cómo estás",
    "saludos",
    "que hay",
    "hello",
    "good morning",
];

const THANKS: &[&str] = &[
    "gracias",
    "muchas gracias",
    "te agradezco",
    "thanks",
    "thank you",
    "genial",
    "perfecto",
    "cool",
];

const HELP_PATTERNS: &[&str] = &[
    "que puedes",
    "qué puedes",
    "que haces",
    "qué haces",
    "ayuda",
    "ayúdame",
    "como funciona",
    "cómo funciona",
    "what can you",
    "help me",
    "how does it work",
];

/// Lowercase and strip punctuation, keeping alphanumerics and spaces.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Detect the query language from fixed function-word lists.
///
/// Ties resolve to Spanish.
pub fn detect_language(text: &str) -> Lang {
    let normalized = normalize(text);
    let words: Vec<&str> = normalized.split_whitespace().collect();

    let spanish_count = words.iter().filter(|w| SPANISH_WORDS.contains(w)).count();
    let english_count = words.iter().filter(|w| ENGLISH_WORDS.contains(w)).count();

    if spanish_count >= english_count {
        Lang::Es
    } else {
        Lang::En
    }
}

/// Whole-token or whole-string match against a fixed phrase list.
///
/// Substring containment would false-positive on unrelated words
/// ("hilo" contains "hi"), so single-word phrases match as whole tokens
/// and multi-word phrases only as the entire normalized query.
fn matches_phrase_list(query: &str, phrases: &[&str]) -> bool {
    let normalized = normalize(query);
    let tokens: HashSet<&str> = normalized.split_whitespace().collect();

    phrases
        .iter()
        .any(|phrase| tokens.contains(phrase) || *phrase == normalized)
}

/// Detect a greeting.
pub fn is_greeting(query: &str) -> bool {
    matches_phrase_list(query, GREETINGS)
}

/// Detect a thank-you message.
pub fn is_thanks(query: &str) -> bool {
    matches_phrase_list(query, THANKS)
}

/// Detect a "what can you do" / help query.
pub fn is_help_query(query: &str) -> bool {
    let query_lower = query.to_lowercase();
    HELP_PATTERNS.iter().any(|p| query_lower.contains(p))
}

/// Canned localized greeting reply.
pub fn greeting_reply(lang: Lang) -> &'static str {
    match lang {
        Lang::Es => "¡Hola! Soy tu asistente legal con IA. ¿En qué puedo ayudarte hoy?",
        Lang::En => "Hello! I am your AI legal assistant. How can I help you today?",
    }
}

/// Canned localized thanks reply.
pub fn thanks_reply(lang: Lang) -> &'static str {
    match lang {
        Lang::Es => "¡De nada! Recuerda que esto no es consejo legal oficial.",
        Lang::En => "You're welcome! Remember this is not official legal advice.",
    }
}

/// Check whether a query is too thin to answer.
///
/// A query shorter than 3 tokens that also retrieved zero sources gets a
/// localized clarification question instead of generation.
pub fn needs_clarification(query: &str, sources: &[LegalSource]) -> Option<&'static str> {
    let word_count = query.split_whitespace().count();
    if word_count < 3 && sources.is_empty() {
        let reply = match detect_language(query) {
            Lang::Es => {
                "¿Podrías darme más detalles sobre tu situación específica para ayudarte mejor?"
            }
            Lang::En => {
                "Could you provide more details about your specific situation so I can help you better?"
            }
        };
        return Some(reply);
    }

    None
}
