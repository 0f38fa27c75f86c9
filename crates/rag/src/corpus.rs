//! Curated static legal corpus.
//!
//! Fallback source of legal text when the vector index is unavailable or
//! returns nothing relevant. Keyed by the closed `Category` enum so corpus
//! coverage is checkable at compile time; categories without entries fall
//! back to the general entries.

use crate::types::Category;

/// One curated corpus entry.
#[derive(Debug, Clone, Copy)]
pub struct CorpusEntry {
    pub text: &'static str,
    pub law: &'static str,
    pub article: &'static str,
}

const LABORAL: &[CorpusEntry] = &[
    CorpusEntry {
        text: "La indemnización por despido arbitrario es equivalente a una remuneración y media ordinaria mensual por cada año completo de servicios con un máximo de doce (12) remuneraciones.",
        law: "D.S. 003-97-TR",
        article: "Artículo 38",
    },
    CorpusEntry {
        text: "El trabajador tiene derecho a recibir su CTS dentro de las 48 horas de producido el cese.",
        law: "D.S. 001-97-TR",
        article: "Artículo 3",
    },
];

const CONSUMIDOR: &[CorpusEntry] = &[CorpusEntry {
    text: "El proveedor es responsable por la idoneidad y calidad de los productos y servicios que ofrece.",
    law: "Código de Protección al Consumidor",
    article: "Artículo 18",
}];

const FAMILIA: &[CorpusEntry] = &[CorpusEntry {
    text: "Los alimentos comprenden lo necesario para el sustento, habitación, vestido, educación, instrucción y capacitación para el trabajo.",
    law: "Código Civil",
    article: "Artículo 472",
}];

const GENERAL: &[CorpusEntry] = &[
    CorpusEntry {
        text: "Lexrag es un asistente de IA especializado en leyes peruanas. Mi propósito es guiarte en temas laborales, consumidor, familia, civil, tránsito y empresas.",
        law: "Guía Lexrag",
        article: "Introducción",
    },
    CorpusEntry {
        text: "Para casos complejos, siempre se recomienda la asesoría de un abogado titulado en el Perú.",
        law: "Aviso Legal",
        article: "General",
    },
];

/// Get the curated entries for a category, falling back to the general
/// entries when the category has none.
pub fn fallback_entries(category: Category) -> &'static [CorpusEntry] {
    let entries: &[CorpusEntry] = match category {
        Category::Laboral => LABORAL,
        Category::Consumidor => CONSUMIDOR,
        Category::Familia => FAMILIA,
        Category::General => GENERAL,
        // No curated entries yet for these categories
        Category::Civil | Category::Transito | Category::Empresas => &[],
    };

    if entries.is_empty() {
        GENERAL
    } else {
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laboral_entries() {
        let entries = fallback_entries(Category::Laboral);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.text.contains("CTS")));
    }

    #[test]
    fn test_empty_category_falls_back_to_general() {
        let entries = fallback_entries(Category::Transito);
        assert!(!entries.is_empty());
        assert_eq!(entries[0].law, "Guía Lexrag");
    }

    #[test]
    fn test_every_category_yields_entries() {
        for category in Category::ALL {
            assert!(
                !fallback_entries(category).is_empty(),
                "category {} has no fallback entries",
                category.as_str()
            );
        }
    }
}
