//! Document template suggestion and field extraction.
//!
//! Secondary low-temperature LLM calls: recommend a document template
//! matching the detected intent, and pull structured field values out of
//! a conversation transcript for template pre-filling. Model output is an
//! untrusted boundary here; anything malformed degrades to "no result".

use lexrag_llm::{ChatMessage, LlmClient, Role};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One fillable field of a document template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateField {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

/// A document template, consumed from the host application's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub fields: Vec<TemplateField>,
}

/// Suggest a template from the catalog for the current conversation.
///
/// The backend is asked to answer with an exact template id or "none".
/// Its claim is not trusted: any id not present in the catalog is
/// discarded and treated as no suggestion.
pub async fn suggest_template(
    client: &dyn LlmClient,
    catalog: &[TemplateDescriptor],
    query: &str,
    history: &[ChatMessage],
) -> Option<String> {
    if catalog.is_empty() {
        return None;
    }

    let templates_str = catalog
        .iter()
        .map(|t| format!("- {}: {} ({})", t.id, t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    let recent_start = history.len().saturating_sub(2);
    let recent = transcript_text(&history[recent_start..]);
    let recent = if recent.is_empty() {
        "Ninguno".to_string()
    } else {
        recent
    };

    let prompt = format!(
        "Analice la siguiente consulta legal y el historial.\n\
         Determine si el usuario necesita generar uno de estos documentos específicos.\n\
         Si no hay un match claro, responda \"none\".\n\
         Si hay un match, responda SOLO con el ID del documento.\n\n\
         TEMPLATES:\n{}\n\n\
         CONSULTA: {}\n\n\
         HISTORIAL RECIENTE:\n{}\n\n\
         RESPUESTA (ID o \"none\"):",
        templates_str, query, recent
    );

    let response = match client.chat(&[ChatMessage::user(prompt)], 0.0, 10).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Template suggestion failed: {}", e);
            return None;
        }
    };

    let result = response.trim().to_lowercase();
    if catalog.iter().any(|t| t.id == result) {
        Some(result)
    } else {
        None
    }
}

/// Extract field values for a template from a chat transcript.
///
/// Returns a mapping of field name to value with null entries removed.
/// Never fails: a malformed model response yields an empty mapping.
pub async fn extract_fields(
    client: &dyn LlmClient,
    template: &TemplateDescriptor,
    transcript: &[ChatMessage],
) -> Map<String, Value> {
    let fields_description = template
        .fields
        .iter()
        .map(|f| {
            let required = if f.required {
                "(Requerido)"
            } else {
                "(Opcional)"
            };
            format!("- {}: {} {}", f.name, f.label, required)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "Usted es un experto en extracción de datos legales.\n\
         Su tarea es analizar el historial de una conversación y extraer información \
         específica para completar un documento legal: \"{}\".\n\n\
         ## CAMPOS REQUERIDOS:\n{}\n\n\
         ## INSTRUCCIONES:\n\
         1. Analice cuidadosamente el historial de chat proporcionado.\n\
         2. Extraiga los valores exactos para cada campo requerido.\n\
         3. Si un campo no ha sido mencionado, responda con nulo (null).\n\
         4. Devuelva los datos ESTRICTAMENTE en formato JSON.\n\
         5. NO invente datos. Si no existe, es null.\n\
         6. El formato de fecha debe ser YYYY-MM-DD si es posible.\n\n\
         ## HISTORIAL DE CHAT:\n{}\n\n\
         ## RESPUESTA JSON REQUERIDA:",
        template.name,
        fields_description,
        transcript_text(transcript)
    );

    let response = match client.chat(&[ChatMessage::user(prompt)], 0.1, 500).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Field extraction call failed: {}", e);
            return Map::new();
        }
    };

    parse_extracted_fields(&response)
}

/// Parse the extraction response, dropping code fences and null values.
fn parse_extracted_fields(response: &str) -> Map<String, Value> {
    let cleaned = strip_code_fences(response);

    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        Ok(_) => {
            tracing::warn!("Extraction response was valid JSON but not an object");
            Map::new()
        }
        Err(e) => {
            tracing::warn!("Failed to parse extraction response as JSON: {}", e);
            Map::new()
        }
    }
}

/// Strip a markdown code fence wrapping, if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some((_, after)) = trimmed.split_once("```json") {
        if let Some(inner) = after.split("```").next() {
            return inner.trim();
        }
    }

    if let Some((_, after)) = trimmed.split_once("```") {
        if let Some(inner) = after.split("```").next() {
            return inner.trim();
        }
    }

    trimmed
}

/// Render a transcript as labeled dialogue lines.
fn transcript_text(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .filter_map(|m| match m.role {
            Role::User => Some(format!("Usuario: {}", m.content)),
            Role::Assistant => Some(format!("Asistente: {}", m.content)),
            Role::System => None,
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
