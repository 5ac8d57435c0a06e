//! Core data models for the ENEM question bank
//!
//! This module contains the data types exchanged with the enem.dev API:
//! questions, answer alternatives, pagination metadata and the filter enums
//! used when browsing the bank.

pub mod sample;

pub use sample::sample_page;

use serde::{Deserialize, Serialize};

/// Subject areas a question can be filtered by
///
/// The wire values are the lowercase Portuguese tags the provider uses
/// (`matematica`, `linguagens`, `humanas`, `natureza`). A `None` filter
/// means "all areas" and sends no query parameter at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Matematica,
    Linguagens,
    Humanas,
    Natureza,
}

impl Discipline {
    /// Returns a slice containing all discipline variants.
    #[allow(dead_code)]
    pub fn all() -> &'static [Discipline] {
        &[
            Discipline::Matematica,
            Discipline::Linguagens,
            Discipline::Humanas,
            Discipline::Natureza,
        ]
    }

    /// Returns the query-parameter value for this discipline.
    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Matematica => "matematica",
            Discipline::Linguagens => "linguagens",
            Discipline::Humanas => "humanas",
            Discipline::Natureza => "natureza",
        }
    }

    /// Returns a human-readable display label for the discipline.
    pub fn label(&self) -> &'static str {
        match self {
            Discipline::Matematica => "Matemática",
            Discipline::Linguagens => "Linguagens e Códigos",
            Discipline::Humanas => "Ciências Humanas",
            Discipline::Natureza => "Ciências da Natureza",
        }
    }

    /// Parses user input into a Discipline.
    ///
    /// Matching is case-insensitive and supports aliases:
    /// - "matematica" | "mat" | "math" -> Matematica
    /// - "linguagens" | "ling" -> Linguagens
    /// - "humanas" | "hum" -> Humanas
    /// - "natureza" | "nat" -> Natureza
    pub fn from_str(s: &str) -> Option<Discipline> {
        match s.to_lowercase().as_str() {
            "matematica" | "mat" | "math" => Some(Discipline::Matematica),
            "linguagens" | "ling" => Some(Discipline::Linguagens),
            "humanas" | "hum" => Some(Discipline::Humanas),
            "natureza" | "nat" => Some(Discipline::Natureza),
            _ => None,
        }
    }
}

/// Foreign-language options for `linguagens` questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ingles,
    Espanhol,
}

impl Language {
    /// Returns the query-parameter value for this language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ingles => "ingles",
            Language::Espanhol => "espanhol",
        }
    }

    /// Returns a human-readable display label for the language.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Ingles => "Inglês",
            Language::Espanhol => "Espanhol",
        }
    }

    /// Parses user input into a Language (case-insensitive).
    pub fn from_str(s: &str) -> Option<Language> {
        match s.to_lowercase().as_str() {
            "ingles" | "en" | "english" => Some(Language::Ingles),
            "espanhol" | "es" | "spanish" => Some(Language::Espanhol),
            _ => None,
        }
    }
}

/// One lettered answer alternative of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    /// Alternative letter (A-E)
    pub letter: String,
    /// Alternative text
    pub text: String,
    /// Optional attached image/file reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Whether this alternative is the correct answer
    pub is_correct: bool,
}

/// A single exam question as returned by the provider
///
/// The question content is passed through untouched; the client never
/// validates or rewrites any of these fields. `discipline` stays a free
/// string here because the provider owns the tag vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Display title, e.g. "Questão 127 - ENEM 2023"
    pub title: String,
    /// Position of the question within its exam
    pub index: u32,
    /// Subject area tag
    pub discipline: String,
    /// Foreign-language tag, present on language questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Exam year
    pub year: u32,
    /// Free-text statement/context of the question
    pub context: String,
    /// Optional attached image/file references
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    /// Letter of the correct alternative
    pub correct_alternative: String,
    /// Text introducing the alternatives
    pub alternatives_introduction: String,
    /// Ordered list of lettered alternatives
    pub alternatives: Vec<Alternative>,
}

impl Question {
    /// Returns the parsed discipline tag, if it is one of the known areas.
    #[allow(dead_code)]
    pub fn discipline_tag(&self) -> Option<Discipline> {
        Discipline::from_str(&self.discipline)
    }
}

/// Pagination metadata attached to every questions page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Page size the provider applied
    pub limit: u32,
    /// Offset of the first question in this page
    pub offset: u32,
    /// Total number of questions matching the query
    pub total: u32,
    /// Whether more pages exist past this one
    pub has_more: bool,
}

/// A page of questions together with its pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionsPage {
    /// Pagination metadata for this page
    pub metadata: PageMetadata,
    /// Ordered list of questions in this page
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A questions page exactly as the provider serializes it
    const API_PAGE: &str = r#"{
        "metadata": { "limit": 10, "offset": 0, "total": 2385, "hasMore": true },
        "questions": [
            {
                "title": "Questão 1 - ENEM 2023",
                "index": 1,
                "discipline": "linguagens",
                "language": "ingles",
                "year": 2023,
                "context": "Sample context text",
                "files": ["https://example.org/q1.png"],
                "correctAlternative": "B",
                "alternativesIntroduction": "Choose the best option:",
                "alternatives": [
                    { "letter": "A", "text": "First", "isCorrect": false },
                    { "letter": "B", "text": "Second", "isCorrect": true }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_questions_page_deserializes_from_api_shape() {
        let page: QuestionsPage = serde_json::from_str(API_PAGE).expect("valid page");

        assert_eq!(page.metadata.limit, 10);
        assert_eq!(page.metadata.offset, 0);
        assert_eq!(page.metadata.total, 2385);
        assert!(page.metadata.has_more);
        assert_eq!(page.questions.len(), 1);

        let q = &page.questions[0];
        assert_eq!(q.index, 1);
        assert_eq!(q.discipline, "linguagens");
        assert_eq!(q.language.as_deref(), Some("ingles"));
        assert_eq!(q.correct_alternative, "B");
        assert_eq!(q.alternatives.len(), 2);
        assert!(q.alternatives[1].is_correct);
    }

    #[test]
    fn test_question_optional_fields_default_to_none() {
        let json = r#"{
            "title": "Questão 2 - ENEM 2022",
            "index": 2,
            "discipline": "matematica",
            "year": 2022,
            "context": "ctx",
            "correctAlternative": "A",
            "alternativesIntroduction": "intro",
            "alternatives": []
        }"#;

        let q: Question = serde_json::from_str(json).expect("valid question");
        assert!(q.language.is_none());
        assert!(q.files.is_none());
    }

    #[test]
    fn test_page_missing_metadata_fails_to_parse() {
        let json = r#"{ "questions": [] }"#;
        let result: Result<QuestionsPage, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_page_with_non_list_questions_fails_to_parse() {
        let json = r#"{
            "metadata": { "limit": 10, "offset": 0, "total": 0, "hasMore": false },
            "questions": "not a list"
        }"#;
        let result: Result<QuestionsPage, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_serialization_roundtrip() {
        let page: QuestionsPage = serde_json::from_str(API_PAGE).expect("valid page");
        let json = serde_json::to_string(&page).expect("serialize");
        let back: QuestionsPage = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, page);
    }

    #[test]
    fn test_discipline_from_str_aliases() {
        assert_eq!(Discipline::from_str("matematica"), Some(Discipline::Matematica));
        assert_eq!(Discipline::from_str("MAT"), Some(Discipline::Matematica));
        assert_eq!(Discipline::from_str("linguagens"), Some(Discipline::Linguagens));
        assert_eq!(Discipline::from_str("hum"), Some(Discipline::Humanas));
        assert_eq!(Discipline::from_str("natureza"), Some(Discipline::Natureza));
        assert_eq!(Discipline::from_str("quimica"), None);
    }

    #[test]
    fn test_discipline_as_str_matches_wire_values() {
        for d in Discipline::all() {
            assert_eq!(Discipline::from_str(d.as_str()), Some(*d));
        }
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!(Language::from_str("ingles"), Some(Language::Ingles));
        assert_eq!(Language::from_str("Espanhol"), Some(Language::Espanhol));
        assert_eq!(Language::from_str("frances"), None);
    }

    #[test]
    fn test_question_discipline_tag() {
        let page: QuestionsPage = serde_json::from_str(API_PAGE).expect("valid page");
        assert_eq!(
            page.questions[0].discipline_tag(),
            Some(Discipline::Linguagens)
        );

        let mut q = page.questions[0].clone();
        q.discipline = "desconhecida".to_string();
        assert_eq!(q.discipline_tag(), None);
    }
}
