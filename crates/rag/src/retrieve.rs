//! Context retrieval: query expansion, vector search, corpus fallback.
//!
//! Every step is independently best-effort. The output is always a
//! (possibly empty) ordered list of sources, never an error: a dead index
//! or a failed expansion call degrades silently to the next step down.

use crate::corpus;
use crate::types::{Category, LegalSource};
use crate::vector::VectorIndex;
use lexrag_llm::{ChatMessage, LlmClient};

/// Minimum vector-search score for a match to be kept.
pub const RELEVANCE_THRESHOLD: f32 = 0.7;

/// How many matches to request from the vector index.
pub const SEARCH_TOP_K: usize = 3;

/// Default cap on returned sources.
pub const DEFAULT_TOP_K: usize = 5;

/// Rewrite the user's query as a technical legal search phrase.
///
/// On any failure the original query is returned unmodified; expansion
/// must never abort the pipeline.
pub async fn expand_query(client: &dyn LlmClient, query: &str) -> String {
    let prompt = format!(
        "Como experto legal, transforme esta consulta de usuario en una frase de búsqueda \
         técnica para una base de datos de leyes peruanas. Responda solo con la frase \
         técnica: '{}'",
        query
    );

    match client.chat(&[ChatMessage::user(prompt)], 0.0, 60).await {
        Ok(expanded) if !expanded.trim().is_empty() => {
            let expanded = expanded.trim().to_string();
            tracing::debug!("Expanded query: {}", expanded);
            expanded
        }
        Ok(_) => query.to_string(),
        Err(e) => {
            tracing::warn!("Query expansion failed, using original query: {}", e);
            query.to_string()
        }
    }
}

/// Query the vector index, keeping only matches above the relevance
/// threshold. Any failure returns an empty list so the caller falls
/// through to the corpus.
async fn search_index(
    client: &dyn LlmClient,
    index: &dyn VectorIndex,
    query: &str,
    category: Category,
) -> Vec<LegalSource> {
    let embedding = match client.embed(query).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Backend embedding failed, using local embedder: {}", e);
            match lexrag_llm::local_embedding(query).await {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!("Local embedding failed: {}", e);
                    return Vec::new();
                }
            }
        }
    };

    // General means no category filter
    let filter = (category != Category::General).then_some(category);

    match index.query(&embedding, SEARCH_TOP_K, filter).await {
        Ok(matches) => matches
            .into_iter()
            .filter(|m| m.score > RELEVANCE_THRESHOLD)
            .map(|m| LegalSource {
                text: m.text,
                law: m.law,
                article: m.article,
                category,
                score: Some(m.score),
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Vector search failed, falling back to local corpus: {}", e);
            Vec::new()
        }
    }
}

/// Retrieve legal context for a query.
///
/// Expansion (unless `expand` is false) → vector search (if an index is
/// configured) → curated corpus fallback, capped at `top_k`.
pub async fn retrieve_context(
    client: &dyn LlmClient,
    index: Option<&dyn VectorIndex>,
    query: &str,
    category: Category,
    top_k: usize,
    expand: bool,
) -> Vec<LegalSource> {
    let search_query = if expand {
        expand_query(client, query).await
    } else {
        query.to_string()
    };

    let mut sources = Vec::new();
    if let Some(index) = index {
        sources = search_index(client, index, &search_query, category).await;
    }

    if sources.is_empty() {
        sources = corpus::fallback_entries(category)
            .iter()
            .take(top_k)
            .map(|e| LegalSource {
                text: e.text.to_string(),
                law: e.law.to_string(),
                article: e.article.to_string(),
                category,
                score: None,
            })
            .collect();
    }

    sources.truncate(top_k);

    tracing::debug!(
        "Retrieved {} sources for category {}",
        sources.len(),
        category.as_str()
    );

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{index_match, MockIndex, MockLlm};

    #[tokio::test]
    async fn test_expansion_failure_uses_original_query() {
        let client = MockLlm::new().reply_err("backend down");
        let expanded = expand_query(&client, "mi jefe no paga").await;
        assert_eq!(expanded, "mi jefe no paga");
    }

    #[tokio::test]
    async fn test_expansion_success() {
        let client = MockLlm::new().reply("incumplimiento de pago de remuneraciones");
        let expanded = expand_query(&client, "mi jefe no paga").await;
        assert_eq!(expanded, "incumplimiento de pago de remuneraciones");
    }

    #[tokio::test]
    async fn test_no_index_falls_back_to_corpus() {
        // Scenario: no vector index configured, labor query draws from
        // the curated labor corpus.
        let client = MockLlm::new().reply_err("no expansion");
        let sources = retrieve_context(
            &client,
            None,
            "no me pagan la cts",
            Category::Laboral,
            DEFAULT_TOP_K,
            true,
        )
        .await;

        assert!(!sources.is_empty());
        assert!(sources.iter().all(|s| s.category == Category::Laboral));
        assert!(sources.iter().any(|s| s.text.contains("CTS")));
    }

    #[tokio::test]
    async fn test_index_error_falls_back_to_corpus() {
        let client = MockLlm::new().reply("consulta técnica");
        let index = MockIndex::failing();
        let sources = retrieve_context(
            &client,
            Some(&index),
            "despido arbitrario",
            Category::Laboral,
            DEFAULT_TOP_K,
            true,
        )
        .await;

        assert!(!sources.is_empty());
        assert!(sources.iter().all(|s| s.score.is_none()));
    }

    #[tokio::test]
    async fn test_index_matches_above_threshold() {
        let client = MockLlm::new().reply("consulta técnica");
        let index = MockIndex::with_matches(vec![
            index_match(0.92, "La indemnización por despido..."),
            index_match(0.55, "Texto poco relevante"),
        ]);

        let sources = retrieve_context(
            &client,
            Some(&index),
            "despido",
            Category::Laboral,
            DEFAULT_TOP_K,
            true,
        )
        .await;

        // Only the match above 0.7 survives
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].score, Some(0.92));
    }

    #[tokio::test]
    async fn test_all_matches_below_threshold_fall_back() {
        let client = MockLlm::new().reply("consulta técnica");
        let index = MockIndex::with_matches(vec![index_match(0.3, "ruido")]);

        let sources = retrieve_context(
            &client,
            Some(&index),
            "despido",
            Category::Laboral,
            DEFAULT_TOP_K,
            true,
        )
        .await;

        assert!(sources.iter().all(|s| s.score.is_none()));
    }

    #[tokio::test]
    async fn test_general_category_queries_without_filter() {
        let client = MockLlm::new().reply("consulta técnica");
        let index = MockIndex::with_matches(vec![index_match(0.9, "texto")]);

        retrieve_context(&client, Some(&index), "algo", Category::General, 5, true).await;

        assert_eq!(*index.last_filter.lock().unwrap(), Some(None));
    }

    #[tokio::test]
    async fn test_specific_category_filter_passed() {
        let client = MockLlm::new().reply("consulta técnica");
        let index = MockIndex::with_matches(vec![index_match(0.9, "texto")]);

        retrieve_context(&client, Some(&index), "cts", Category::Laboral, 5, true).await;

        assert_eq!(
            *index.last_filter.lock().unwrap(),
            Some(Some(Category::Laboral))
        );
    }

    #[tokio::test]
    async fn test_skip_expansion_makes_no_chat_call() {
        let client = MockLlm::new();
        let sources =
            retrieve_context(&client, None, "ayuda", Category::General, 5, false).await;

        assert!(client.chat_calls.lock().unwrap().is_empty());
        assert!(!sources.is_empty());
    }

    #[tokio::test]
    async fn test_top_k_cap() {
        let client = MockLlm::new().reply_err("no expansion");
        let sources =
            retrieve_context(&client, None, "consulta general", Category::General, 1, true).await;
        assert_eq!(sources.len(), 1);
    }
}
