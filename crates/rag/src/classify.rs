//! Deterministic keyword-based category classifier.

use crate::types::Category;

/// Ordered keyword table. Order is the tie-break rule: the first category
/// with any keyword present in the lowercased query wins, so a query
/// mixing labor and family terms classifies as labor.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Laboral,
        &[
            "despido",
            "cts",
            "sueldo",
            "trabajo",
            "laboral",
            "sunafil",
            "vacaciones",
            "contrato de trabajo",
        ],
    ),
    (
        Category::Familia,
        &[
            "hijo", "alimento", "pensión", "divorcio", "tenencia", "familia", "conyuge",
        ],
    ),
    (
        Category::Consumidor,
        &[
            "indecopi", "reclamo", "consumidor", "tienda", "producto", "garantía",
        ],
    ),
    (
        Category::Transito,
        &["papeleta", "multa", "tránsito", "sat", "brevete", "choque"],
    ),
    (
        Category::Empresas,
        &["empresa", "sac", "eirl", "sociedad", "ruc", "constituir"],
    ),
    (
        Category::Civil,
        &[
            "contrato",
            "alquiler",
            "arrendamiento",
            "deuda",
            "civil",
            "propiedad",
        ],
    ),
];

/// Classify a query into a legal category.
///
/// Stateless and deterministic; returns `General` when no keyword matches.
pub fn classify(query: &str) -> Category {
    let q = query.to_lowercase();

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| q.contains(k)) {
            tracing::debug!("Query classified as {}", category.as_str());
            return *category;
        }
    }

    Category::General
}
