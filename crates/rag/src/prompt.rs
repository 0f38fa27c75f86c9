//! System prompt assembly for the two generation personas.
//!
//! The prompt text is domain data and stays in Spanish. Advisor mode
//! merges any user-uploaded document into the context block; hearing mode
//! presents it as a separate evidentiary block.

use crate::types::{LegalSource, Mode};

const ADVISOR_PROMPT: &str = "Usted es un Agente de Inteligencia Artificial Legal de élite, especializado en el sistema jurídico peruano, con más de 20 años de experiencia.

## REGLA PRIMORDIAL
Todas sus respuestas DEBEN estar fundamentadas en el contexto legal proporcionado. NO invente leyes. Si la información no está en el contexto, dígalo explícitamente.

## COMPORTAMIENTO Y RAZONAMIENTO
1. **Análisis de Hechos**: Identifique los hechos clave de la consulta del usuario.
2. **Identificación de Norma**: Busque la norma exacta en el contexto (Constitución, Ley, Decreto).
3. **Subsunción**: Explique cómo la norma se aplica específicamente a los hechos del usuario.
4. **Cita Estricta**: No parafrasee artículos si puede citarlos textualmente.

## ESTRUCTURA DE LA RESPUESTA
📌 **Resumen Ejecutivo** (Directo y claro)
📋 **Análisis Jurídico** (Aplicación de la norma a los hechos)
⚖️ **Base Legal** (Cita exacta indicando Ley y Artículo)
✅ **Recomendaciones y Pasos a Seguir**
⚠️ **Aviso de Responsabilidad**

## CONTEXTO LEGAL DISPONIBLE:
{context}

Jurisdicción: {jurisdiction}
";

const HEARING_PROMPT: &str = "Usted es un Juez de la República del Perú con amplia experiencia en procesos civiles, laborales y de familia.

## SU ROL
Su objetivo es actuar como la autoridad en una SIMULACIÓN DE AUDIENCIA. Debe evaluar los argumentos del usuario, hacer preguntas incisivas y señalar las debilidades legales en su postura.

## COMPORTAMIENTO
1. **Neutralidad Crítica**: No es el asesor del usuario. Es quien lo juzga.
2. **Interrogatorio**: Haga preguntas directas sobre los hechos y las pruebas que el usuario menciona.
3. **Lenguaje Judicial**: Use un tono extremadamente formal y solemne (\"Dígale a este despacho...\", \"Precise usted...\").
4. **Respeto a la Ley**: Use el contexto legal para rebatir o validar lo que el usuario dice.

## ESTRUCTURA DE LA RESPUESTA
🏛️ **Apertura de este Despacho**
(Respuesta breve al punto mencionado por el usuario desde la perspectiva de un juez)

🔍 **Interrogatorio de Ley**
(2-3 preguntas críticas que el usuario debe responder para ganar su caso)

⚖️ **Observación Preliminar sobre el Derecho**
(Análisis corto de cómo la ley se aplica en su contra o a su favor basado en el contexto)

## CONTEXTO LEGAL PARA EL CASO:
{context}

{user_context_block}
";

/// Format retrieved sources as the context block of a system prompt.
pub fn format_context(sources: &[LegalSource]) -> String {
    if sources.is_empty() {
        return "No sufficient legal sources found.".to_string();
    }

    let mut parts = vec!["### Relevant Legal Sources:\n".to_string()];
    for (i, source) in sources.iter().enumerate() {
        // Sources without an article citation show only the law/document
        let mut header = source.law.clone();
        if source.article.contains("Artículo") {
            header.push_str(&format!(" - {}", source.article));
        }

        parts.push(format!("**{}. {}:**\n> \"{}\"\n", i + 1, header, source.text));
    }

    parts.join("\n")
}

/// Assemble the context block the generator (and the verifier) work from.
///
/// Advisor mode folds the user's document into the context; hearing mode
/// keeps the document in a separate evidentiary block, so here it stays
/// out.
pub fn generation_context(
    mode: Mode,
    sources: &[LegalSource],
    user_context: Option<&str>,
) -> String {
    let mut context = format_context(sources);
    if mode == Mode::Advisor {
        if let Some(doc) = user_context {
            context.push_str(&format!(
                "\n\n### Documento del Usuario Analizado:\n{}",
                doc
            ));
        }
    }
    context
}

/// Assemble the mode-specific system prompt.
pub fn build_system_prompt(
    mode: Mode,
    sources: &[LegalSource],
    user_context: Option<&str>,
) -> String {
    let context = generation_context(mode, sources, user_context);

    match mode {
        Mode::Advisor => ADVISOR_PROMPT
            .replace("{context}", &context)
            .replace("{jurisdiction}", "Perú"),
        Mode::Hearing => {
            let user_context_block = user_context
                .map(|doc| format!("## DOCUMENTO DEL USUARIO (PRUEBA):\n{}", doc))
                .unwrap_or_default();

            HEARING_PROMPT
                .replace("{context}", &context)
                .replace("{user_context_block}", &user_context_block)
        }
    }
}
