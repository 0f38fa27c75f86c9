//! Local fallback embeddings.
//!
//! Deterministic 384-dimensional embeddings computed from character
//! trigrams and word frequencies, normalized to unit length. This is the
//! terminal embedding path: backends without a native embedding API
//! delegate here, and retrieval falls back here when a backend's embedding
//! call fails. Not semantically accurate like a real embedding model, but
//! consistent and content-dependent, which is what the fallback needs.

use lexrag_core::AppResult;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Output dimension of the local embedder. Must match the vector index.
pub const LOCAL_EMBEDDING_DIM: usize = 384;

/// Deterministic trigram/word-hash embedder.
#[derive(Debug)]
pub struct LocalEmbedder {
    dimensions: usize,
}

impl LocalEmbedder {
    /// Create an embedder with the given output dimension.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Get the output dimension.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Compute the embedding for a text.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];

        let lower = text.to_lowercase();

        // Filter function words for better discrimination
        let stop_words: HashSet<&str> = [
            "the", "is", "at", "on", "a", "an", "as", "are", "for", "to", "of", "in", "and", "or",
            "with", "by", "from", "this", "that", "el", "la", "los", "las", "de", "del", "que",
            "en", "es", "un", "una", "por", "con", "para", "mi", "su", "no", "se",
        ]
        .iter()
        .copied()
        .collect();

        let words: Vec<&str> = lower
            .split_whitespace()
            .filter(|w| !stop_words.contains(w) && w.len() > 2)
            .collect();

        let mut word_freq = HashMap::new();
        for word in &words {
            *word_freq.entry(*word).or_insert(0u32) += 1;
        }

        // Map each unique word onto multiple dimensions via character
        // trigrams, plus one dimension for the whole word.
        for (word, freq) in word_freq.iter() {
            let chars: Vec<char> = word.chars().collect();
            for i in 0..chars.len().saturating_sub(2) {
                let trigram = format!("{}{}{}", chars[i], chars[i + 1], chars[i + 2]);
                let trigram_hash = trigram
                    .bytes()
                    .fold(0u64, |acc, b| acc.wrapping_mul(37).wrapping_add(b as u64));

                let dim_idx = (trigram_hash as usize) % self.dimensions;
                embedding[dim_idx] += (*freq as f32).sqrt();
            }

            let word_hash = word
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            let base_dim = (word_hash as usize) % self.dimensions;
            embedding[base_dim] += *freq as f32;
        }

        // Normalize to unit vector
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

/// Process-wide embedder instance, created once on first use.
static LOCAL_EMBEDDER: OnceLock<LocalEmbedder> = OnceLock::new();

/// Get the process-wide local embedder.
pub fn local_embedder() -> &'static LocalEmbedder {
    LOCAL_EMBEDDER.get_or_init(|| LocalEmbedder::new(LOCAL_EMBEDDING_DIM))
}

/// Compute a local embedding off the async runtime.
///
/// The computation is CPU-bound, so it runs under `spawn_blocking` to
/// keep the request path non-blocking under concurrent load.
pub async fn local_embedding(text: &str) -> AppResult<Vec<f32>> {
    let text = text.to_string();
    let embedding = tokio::task::spawn_blocking(move || local_embedder().embed(&text))
        .await
        .map_err(|e| lexrag_core::AppError::Other(format!("Embedding task failed: {}", e)))?;
    Ok(embedding)
}
