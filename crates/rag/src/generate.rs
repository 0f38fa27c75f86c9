//! The answer pipeline: intent shortcuts, retrieval, generation,
//! self-verification and template suggestion, in that order.

use crate::classify;
use crate::intent::{self, Lang};
use crate::prompt;
use crate::retrieve::{self, DEFAULT_TOP_K};
use crate::templates::{self, TemplateDescriptor};
use crate::types::{Category, GenerationResult, Mode};
use crate::vector::VectorIndex;
use lexrag_llm::{ChatMessage, LlmClient};
use std::sync::Arc;

/// How many history messages to replay into the generation call.
const HISTORY_WINDOW: usize = 4;

/// Orchestrates one question-answering run end to end.
///
/// Holds the LLM backend, the optional vector index, and the template
/// catalog. Stateless between calls; conversation history is supplied
/// by the caller on each request.
pub struct RagEngine {
    client: Arc<dyn LlmClient>,
    index: Option<Arc<dyn VectorIndex>>,
    templates: Vec<TemplateDescriptor>,
}

impl RagEngine {
    pub fn new(
        client: Arc<dyn LlmClient>,
        index: Option<Arc<dyn VectorIndex>>,
        templates: Vec<TemplateDescriptor>,
    ) -> Self {
        Self {
            client,
            index,
            templates,
        }
    }

    pub fn templates(&self) -> &[TemplateDescriptor] {
        &self.templates
    }

    /// Answer a legal query.
    ///
    /// Never returns an error: every failure mode downstream of intent
    /// detection degrades into a `GenerationResult` with an explanatory
    /// answer and honest confidence flags.
    pub async fn answer(
        &self,
        query: &str,
        history: &[ChatMessage],
        user_context: Option<&str>,
        mode: Mode,
    ) -> GenerationResult {
        let lang = intent::detect_language(query);

        // Greetings only short-circuit on a fresh conversation; mid-thread
        // a "hola, otra cosa..." should still reach the pipeline.
        if history.is_empty() && intent::is_greeting(query) {
            return GenerationResult::shortcut(intent::greeting_reply(lang));
        }
        if intent::is_thanks(query) {
            return GenerationResult::shortcut(intent::thanks_reply(lang));
        }

        let category = classify::classify(query);
        tracing::info!("Query classified as {}", category.as_str());

        // Help phrasing only shortcuts retrieval when the classifier found
        // nothing more specific; "ayuda con mi despido" is a labor query.
        let help = category == Category::General && intent::is_help_query(query);

        let sources = retrieve::retrieve_context(
            self.client.as_ref(),
            self.index.as_deref(),
            query,
            category,
            DEFAULT_TOP_K,
            !help,
        )
        .await;

        if let Some(clarification) = intent::needs_clarification(query, &sources) {
            return GenerationResult::shortcut(clarification);
        }

        let system_prompt = prompt::build_system_prompt(mode, &sources, user_context);

        let mut messages = Vec::with_capacity(HISTORY_WINDOW + 2);
        messages.push(ChatMessage::system(system_prompt));
        let window_start = history.len().saturating_sub(HISTORY_WINDOW);
        messages.extend_from_slice(&history[window_start..]);
        messages.push(ChatMessage::user(query));

        let mut answer = match self.client.chat(&messages, 0.3, 1500).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Answer generation failed: {}", e);
                let message = match lang {
                    Lang::Es => "Error procesando la solicitud. Intenta de nuevo.",
                    Lang::En => "Error processing request. Please try again.",
                };
                return GenerationResult::failed(
                    format!("{} ({})", message, e),
                    sources,
                    category,
                );
            }
        };

        let context = prompt::generation_context(mode, &sources, user_context);
        answer = self.verify_answer(query, answer, &context).await;

        if let Some(template_id) =
            templates::suggest_template(self.client.as_ref(), &self.templates, query, history)
                .await
        {
            if let Some(template) = self.templates.iter().find(|t| t.id == template_id) {
                tracing::info!("Suggesting template {}", template.id);
                answer.push_str(&format!(
                    "\n\n---\n💡 **Sugerencia**: He detectado que podría necesitar una \
                     **{}**. Si desea, puedo ayudarle a redactarla ahora mismo.",
                    template.name
                ));
            }
        }

        GenerationResult::answered(answer, sources, category)
    }

    /// Second-pass self-check of the generated answer against the same
    /// context the generator saw.
    ///
    /// The checker either approves with a reply containing "OK" or emits
    /// a corrected answer, which replaces the original. A failed check
    /// call leaves the answer untouched.
    async fn verify_answer(&self, query: &str, answer: String, context: &str) -> String {
        let prompt = format!(
            "Analice la respuesta generada para la consulta legal.\n\
             Verifique que la respuesta esté fundamentada en el contexto \
             proporcionado y no contradiga la ley peruana.\n\
             Si es correcta, responda 'OK'.\n\
             Si contiene errores, responda con la versión corregida de la respuesta.\n\n\
             CONSULTA: {}\n\n\
             CONTEXTO:\n{}\n\n\
             RESPUESTA A VERIFICAR:\n{}",
            query, context, answer
        );

        match self.client.chat(&[ChatMessage::user(prompt)], 0.0, 200).await {
            Ok(verdict) => {
                if verdict.contains("OK") {
                    answer
                } else {
                    tracing::info!("Verification replaced the generated answer");
                    verdict
                }
            }
            Err(e) => {
                tracing::warn!("Verification call failed, keeping answer: {}", e);
                answer
            }
        }
    }

    /// Generate a short title for a new conversation from its first
    /// message. Falls back to a plain truncation on any failure.
    pub async fn conversation_title(&self, first_message: &str) -> String {
        let excerpt: String = first_message.chars().take(150).collect();
        let prompt = format!(
            "Genera un título muy corto (máximo 5 palabras, sin comillas) para una \
             conversación legal que empieza así: '{}'",
            excerpt
        );

        match self.client.chat(&[ChatMessage::user(prompt)], 0.5, 30).await {
            Ok(title) => {
                let title = title.trim().trim_matches(['"', '\'']).trim();
                title.chars().take(40).collect()
            }
            Err(e) => {
                tracing::warn!("Title generation failed: {}", e);
                if first_message.chars().count() > 40 {
                    let truncated: String = first_message.chars().take(40).collect();
                    format!("{}...", truncated.trim_end())
                } else {
                    first_message.to_string()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{index_match, MockIndex, MockLlm};

    fn engine(client: MockLlm) -> RagEngine {
        RagEngine::new(Arc::new(client), None, Vec::new())
    }

    fn engine_with_index(client: MockLlm, index: MockIndex) -> RagEngine {
        RagEngine::new(Arc::new(client), Some(Arc::new(index)), Vec::new())
    }

    fn sample_templates() -> Vec<TemplateDescriptor> {
        vec![TemplateDescriptor {
            id: "carta-renuncia".to_string(),
            name: "Carta de Renuncia".to_string(),
            description: "Carta formal de renuncia laboral".to_string(),
            fields: Vec::new(),
        }]
    }

    #[tokio::test]
    async fn test_greeting_shortcut() {
        let client = MockLlm::new();
        let result = engine(client).answer("hola", &[], None, Mode::Advisor).await;

        assert!(result.answer.contains("Hola"));
        assert_eq!(result.category, Category::General);
        assert!(!result.needs_lawyer);
        assert_eq!(result.confidence, 1.0);
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn test_greeting_mid_conversation_reaches_pipeline() {
        let client = MockLlm::new()
            .reply("consulta expandida")
            .reply("Respuesta sobre despido.")
            .reply("OK");
        let history = vec![
            ChatMessage::user("me despidieron"),
            ChatMessage::assistant("Cuénteme más."),
        ];

        let result = engine(client)
            .answer("hola, ¿y la indemnización?", &history, None, Mode::Advisor)
            .await;

        assert_eq!(result.answer, "Respuesta sobre despido.");
    }

    #[tokio::test]
    async fn test_thanks_shortcut() {
        let client = MockLlm::new();
        let result = engine(client)
            .answer("muchas gracias", &[], None, Mode::Advisor)
            .await;
        assert!(result.answer.contains("De nada"));
    }

    #[tokio::test]
    async fn test_labor_query_end_to_end() {
        // Expansion, generation, verification: three calls in order.
        let client = MockLlm::new()
            .reply("incumplimiento de pago CTS")
            .reply("Según la ley peruana, su empleador debe depositar la CTS.")
            .reply("OK");

        let result = engine(client)
            .answer("mi jefe no me paga la cts", &[], None, Mode::Advisor)
            .await;

        assert_eq!(result.category, Category::Laboral);
        assert!(!result.sources.is_empty());
        assert!(!result.needs_lawyer);
        assert!((result.confidence - 0.9).abs() < f32::EPSILON);
        assert!(result.answer.contains("CTS"));
    }

    #[tokio::test]
    async fn test_classified_category_is_returned() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("Respuesta sobre pensión de alimentos.")
            .reply("OK");

        let result = engine(client)
            .answer(
                "el padre de mi hijo no paga la pensión de alimentos",
                &[],
                None,
                Mode::Advisor,
            )
            .await;

        assert_eq!(result.category, Category::Familia);
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_sources() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply_err("backend unavailable");

        let result = engine(client)
            .answer("no me pagan mis horas extras en el trabajo", &[], None, Mode::Advisor)
            .await;

        assert!(result.answer.contains("Error procesando la solicitud"));
        assert!(result.answer.contains("backend unavailable"));
        assert!(result.needs_lawyer);
        assert_eq!(result.confidence, 0.0);
        // Sources survive the failure so the caller can still show them
        assert!(!result.sources.is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_english_message() {
        let client = MockLlm::new().reply("expansion").reply_err("down");

        let result = engine(client)
            .answer(
                "what happens with the severance payment for my job",
                &[],
                None,
                Mode::Advisor,
            )
            .await;

        assert!(result.answer.contains("Error processing request"));
    }

    #[tokio::test]
    async fn test_verification_replaces_answer() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("La CTS se paga cada 5 años.")
            .reply("La CTS se deposita en mayo y noviembre de cada año.");

        let result = engine(client)
            .answer("cuando se deposita la cts del trabajo", &[], None, Mode::Advisor)
            .await;

        assert_eq!(
            result.answer,
            "La CTS se deposita en mayo y noviembre de cada año."
        );
    }

    #[tokio::test]
    async fn test_verification_ok_keeps_answer() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("La CTS se deposita en mayo y noviembre.")
            .reply("OK, la respuesta es correcta.");

        let result = engine(client)
            .answer("cuando se deposita la cts del trabajo", &[], None, Mode::Advisor)
            .await;

        assert_eq!(result.answer, "La CTS se deposita en mayo y noviembre.");
    }

    #[tokio::test]
    async fn test_verification_sees_user_document() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("El contrato del usuario es válido.")
            .reply("OK");
        let client = Arc::new(client);
        let engine = RagEngine::new(client.clone(), None, Vec::new());

        engine
            .answer(
                "¿es válido mi contrato de trabajo?",
                &[],
                Some("contrato firmado el 2024-01-05"),
                Mode::Advisor,
            )
            .await;

        // Third chat call is the verification pass; it must carry the
        // same document the generator worked from.
        let calls = client.chat_calls.lock().unwrap();
        let verification = &calls[2][0];
        assert!(verification.content.contains("Documento del Usuario Analizado"));
        assert!(verification.content.contains("contrato firmado el 2024-01-05"));
    }

    #[tokio::test]
    async fn test_verification_failure_keeps_answer() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("Respuesta original.")
            .reply_err("verifier down");

        let result = engine(client)
            .answer("consulta sobre mi contrato de trabajo", &[], None, Mode::Advisor)
            .await;

        assert_eq!(result.answer, "Respuesta original.");
        assert!(!result.needs_lawyer);
    }

    #[tokio::test]
    async fn test_history_window_contents() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("Respuesta.")
            .reply("OK");
        let client = Arc::new(client);
        let engine = RagEngine::new(client.clone(), None, Vec::new());

        let history: Vec<ChatMessage> = (0..10)
            .map(|i| ChatMessage::user(format!("mensaje {}", i)))
            .collect();

        engine
            .answer("consulta sobre mi contrato de trabajo", &history, None, Mode::Advisor)
            .await;

        let calls = client.chat_calls.lock().unwrap();
        let generation = &calls[1];
        assert_eq!(generation.len(), 6);
        assert_eq!(generation[1].content, "mensaje 6");
        assert_eq!(generation[4].content, "mensaje 9");
        assert_eq!(
            generation[5].content,
            "consulta sobre mi contrato de trabajo"
        );
    }

    #[tokio::test]
    async fn test_help_query_skips_expansion() {
        let client = MockLlm::new().reply("Puedo ayudarte con...").reply("OK");
        let client = Arc::new(client);
        let engine = RagEngine::new(client.clone(), None, Vec::new());

        let result = engine
            .answer("¿qué puedes hacer por mí?", &[], None, Mode::Advisor)
            .await;

        assert_eq!(result.category, Category::General);
        assert_eq!(result.answer, "Puedo ayudarte con...");
        // First chat call is generation, not expansion
        let calls = client.chat_calls.lock().unwrap();
        assert!(calls[0].iter().any(|m| m.content.contains("qué puedes")));
    }

    #[tokio::test]
    async fn test_help_phrasing_keeps_classified_category() {
        // "ayuda" in a substantive query must not hijack classification.
        let client = MockLlm::new()
            .reply("expansión")
            .reply("Respuesta sobre despido.")
            .reply("OK");
        let client = Arc::new(client);
        let engine = RagEngine::new(client.clone(), None, Vec::new());

        let result = engine
            .answer("ayuda con mi despido laboral", &[], None, Mode::Advisor)
            .await;

        assert_eq!(result.category, Category::Laboral);
        // Expansion ran: the help shortcut did not apply
        let calls = client.chat_calls.lock().unwrap();
        assert!(calls[0][0].content.contains("frase de búsqueda"));
    }

    #[tokio::test]
    async fn test_index_matches_become_sources() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("Respuesta fundamentada.")
            .reply("OK");
        let index = MockIndex::with_matches(vec![index_match(0.85, "El empleador está obligado...")]);

        let result = engine_with_index(client, index)
            .answer("obligaciones de mi empleador en el trabajo", &[], None, Mode::Advisor)
            .await;

        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].score, Some(0.85));
    }

    #[tokio::test]
    async fn test_index_failure_still_answers() {
        // A dead index degrades to the corpus; the request completes.
        let client = MockLlm::new()
            .reply("expansión")
            .reply("Respuesta desde el corpus local.")
            .reply("OK");
        let index = MockIndex::failing();

        let result = engine_with_index(client, index)
            .answer("me hicieron un despido arbitrario", &[], None, Mode::Advisor)
            .await;

        assert!(!result.answer.is_empty());
        assert!(!result.sources.is_empty());
        assert!(result.sources.iter().all(|s| s.score.is_none()));
    }

    #[tokio::test]
    async fn test_template_suggestion_appended() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("Puede renunciar presentando una carta.")
            .reply("OK")
            .reply("carta-renuncia");
        let engine = RagEngine::new(Arc::new(client), None, sample_templates());

        let result = engine
            .answer("quiero renunciar a mi trabajo hoy", &[], None, Mode::Advisor)
            .await;

        assert!(result.answer.contains("💡 **Sugerencia**"));
        assert!(result.answer.contains("Carta de Renuncia"));
    }

    #[tokio::test]
    async fn test_no_suggestion_without_catalog() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("Respuesta.")
            .reply("OK");

        let result = engine(client)
            .answer("quiero renunciar a mi trabajo hoy", &[], None, Mode::Advisor)
            .await;

        assert!(!result.answer.contains("Sugerencia"));
    }

    #[tokio::test]
    async fn test_hearing_mode_prompt() {
        let client = MockLlm::new()
            .reply("expansión")
            .reply("Proceda con sus alegatos.")
            .reply("OK");
        let client = Arc::new(client);
        let engine = RagEngine::new(client.clone(), None, Vec::new());

        engine
            .answer(
                "simulemos la audiencia por mi despido laboral",
                &[],
                Some("contrato firmado el 2024-01-05"),
                Mode::Hearing,
            )
            .await;

        let calls = client.chat_calls.lock().unwrap();
        let system = &calls[1][0];
        assert!(system.content.contains("DOCUMENTO DEL USUARIO (PRUEBA)"));
        assert!(system.content.contains("contrato firmado"));
    }

    #[tokio::test]
    async fn test_conversation_title() {
        let client = MockLlm::new().reply("  \"Consulta sobre CTS\"  ");
        let title = engine(client)
            .conversation_title("mi jefe no me paga la cts desde hace meses")
            .await;
        assert_eq!(title, "Consulta sobre CTS");
    }

    #[tokio::test]
    async fn test_conversation_title_fallback() {
        let client = MockLlm::new().reply_err("down");
        let title = engine(client)
            .conversation_title("mi jefe no me paga la cts desde hace varios meses y no sé qué hacer")
            .await;
        assert!(title.ends_with("..."));
        assert!(title.chars().count() <= 43);
    }

    #[tokio::test]
    async fn test_conversation_title_fallback_short_message_unmodified() {
        let client = MockLlm::new().reply_err("down");
        let title = engine(client).conversation_title("consulta sobre CTS").await;
        assert_eq!(title, "consulta sobre CTS");
    }
}
