//! Built-in sample questions
//!
//! A small offline question set used as a fallback when the question bank
//! cannot be reached, so the browser always has something to render next to
//! the retry hint.

use super::{Alternative, PageMetadata, Question, QuestionsPage};

/// Builds an alternative without an attached file.
fn alt(letter: &str, text: &str, is_correct: bool) -> Alternative {
    Alternative {
        letter: letter.to_string(),
        text: text.to_string(),
        file: None,
        is_correct,
    }
}

/// Returns the built-in sample page of questions.
///
/// The content mirrors real ENEM questions across the four subject areas so
/// every discipline filter has at least one hit while offline. `has_more` is
/// false: sample data never drives pagination.
pub fn sample_page() -> QuestionsPage {
    QuestionsPage {
        metadata: PageMetadata {
            limit: 4,
            offset: 0,
            total: 4,
            has_more: false,
        },
        questions: vec![
            Question {
                title: "Questão 127 - ENEM 2023".to_string(),
                index: 127,
                discipline: "matematica".to_string(),
                language: None,
                year: 2023,
                context: "Um terreno retangular tem 120 metros de comprimento e 80 metros \
                          de largura. O proprietário deseja construir uma piscina circular \
                          no centro do terreno, ocupando a maior área possível sem \
                          ultrapassar os limites do terreno."
                    .to_string(),
                files: None,
                correct_alternative: "C".to_string(),
                alternatives_introduction: "Qual é o raio máximo da piscina circular?"
                    .to_string(),
                alternatives: vec![
                    alt("A", "30 metros", false),
                    alt("B", "35 metros", false),
                    alt("C", "40 metros", true),
                    alt("D", "45 metros", false),
                    alt("E", "50 metros", false),
                ],
            },
            Question {
                title: "Questão 89 - ENEM 2023".to_string(),
                index: 89,
                discipline: "linguagens".to_string(),
                language: Some("portugues".to_string()),
                year: 2023,
                context: "A revolução digital transformou profundamente as relações sociais \
                          contemporâneas, criando novas formas de comunicação e interação \
                          que transcendem barreiras geográficas e temporais."
                    .to_string(),
                files: None,
                correct_alternative: "B".to_string(),
                alternatives_introduction: "Com base no texto, é correto afirmar que:"
                    .to_string(),
                alternatives: vec![
                    alt("A", "A tecnologia isolou as pessoas", false),
                    alt("B", "Novas formas de comunicação surgiram", true),
                    alt("C", "As barreiras geográficas aumentaram", false),
                    alt("D", "A interação social diminuiu", false),
                    alt("E", "O tempo se tornou mais limitado", false),
                ],
            },
            Question {
                title: "Questão 156 - ENEM 2022".to_string(),
                index: 156,
                discipline: "humanas".to_string(),
                language: None,
                year: 2022,
                context: "Durante o período da ditadura militar no Brasil (1964-1985), \
                          diversos movimentos de resistência se organizaram para contestar \
                          o regime autoritário, utilizando diferentes estratégias de \
                          oposição política."
                    .to_string(),
                files: None,
                correct_alternative: "A".to_string(),
                alternatives_introduction: "Os movimentos de resistência durante a ditadura \
                                            militar caracterizaram-se por:"
                    .to_string(),
                alternatives: vec![
                    alt("A", "Diversidade de estratégias de oposição", true),
                    alt("B", "Apoio total da população", false),
                    alt("C", "Ausência de repressão", false),
                    alt("D", "Foco apenas na luta armada", false),
                    alt("E", "Apoio do governo militar", false),
                ],
            },
            Question {
                title: "Questão 201 - ENEM 2023".to_string(),
                index: 201,
                discipline: "natureza".to_string(),
                language: None,
                year: 2023,
                context: "Os compostos orgânicos são fundamentais para a vida na Terra. \
                          Considere a estrutura molecular do etanol (C2H6O) e analise suas \
                          propriedades físicas e químicas em diferentes contextos de \
                          aplicação."
                    .to_string(),
                files: None,
                correct_alternative: "D".to_string(),
                alternatives_introduction: "Sobre as propriedades do etanol, é correto \
                                            afirmar:"
                    .to_string(),
                alternatives: vec![
                    alt("A", "É insolúvel em água", false),
                    alt("B", "Não possui grupos funcionais", false),
                    alt("C", "É um hidrocarboneto", false),
                    alt("D", "Possui grupo hidroxila", true),
                    alt("E", "É um composto inorgânico", false),
                ],
            },
        ],
    }
}
