//! Question list screen rendering
//!
//! Renders the main question-bank view: the active filters, the fetched
//! questions with their subject-area tags, and a status footer showing
//! loading/error state and the provider's remaining rate-limit quota.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Discipline;

/// Color for a subject-area tag
fn discipline_color(discipline: &str) -> Color {
    match Discipline::from_str(discipline) {
        Some(Discipline::Matematica) => Color::Yellow,
        Some(Discipline::Linguagens) => Color::Magenta,
        Some(Discipline::Humanas) => Color::Cyan,
        Some(Discipline::Natureza) => Color::Green,
        None => Color::Gray,
    }
}

/// Three-letter tag shown next to each question
fn discipline_short(discipline: &str) -> &'static str {
    match Discipline::from_str(discipline) {
        Some(Discipline::Matematica) => "MAT",
        Some(Discipline::Linguagens) => "LIN",
        Some(Discipline::Humanas) => "HUM",
        Some(Discipline::Natureza) => "NAT",
        None => "???",
    }
}

/// One-line summary of the active filters
fn filter_summary(app: &App) -> String {
    let mut parts = vec![format!("Ano {}", app.query.year)];
    match app.query.discipline {
        Some(d) => parts.push(format!("Área: {}", d.label())),
        None => parts.push("Área: todas".to_string()),
    }
    if let Some(language) = app.query.language {
        parts.push(format!("Idioma: {}", language.label()));
    }
    if app.auto_search {
        parts.push("busca automática".to_string());
    }
    parts.join("  ·  ")
}

/// Status line combining load state, errors and rate-limit info
fn status_line(app: &App) -> Line<'static> {
    let mut spans = Vec::new();

    if app.is_loading() {
        spans.push(Span::styled(
            "Carregando... ",
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(error) = &app.last_error {
        let hint = if app.last_error_status == Some(429) {
            "limite de requisições atingido, aguarde"
        } else {
            "r para tentar novamente"
        };
        spans.push(Span::styled(
            format!("Falha na API: {} ({}) ", error, hint),
            Style::default().fg(Color::Red),
        ));
    }

    if app.using_sample_data {
        spans.push(Span::styled(
            "exibindo questões de exemplo ",
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(metadata) = &app.metadata {
        spans.push(Span::styled(
            format!("{} questões no banco ", metadata.total),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(rate) = app.rate_limit() {
        spans.push(Span::styled(
            format!("quota {}/{} ", rate.remaining, rate.limit),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(at) = app.last_refresh {
        spans.push(Span::styled(
            format!("atualizado {}", at.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if spans.is_empty() {
        spans.push(Span::raw(""));
    }
    Line::from(spans)
}

/// Renders the question list view
pub fn render_question_list(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    // Header with title and active filters
    let header = Paragraph::new(Line::from(Span::styled(
        filter_summary(app),
        Style::default().fg(Color::DarkGray),
    )))
    .block(
        Block::default()
            .title(" Banco de Questões ENEM ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    frame.render_widget(header, chunks[0]);

    // Question list with selection marker
    let mut lines: Vec<Line> = Vec::with_capacity(app.questions.len());
    for (i, question) in app.questions.iter().enumerate() {
        let selected = i == app.selected_index;
        let marker = if selected { "▶ " } else { "  " };

        let mut spans = vec![
            Span::raw(marker.to_string()),
            Span::styled(
                format!("[{}] ", discipline_short(&question.discipline)),
                Style::default().fg(discipline_color(&question.discipline)),
            ),
            Span::raw(question.title.clone()),
        ];
        if let Some(language) = &question.language {
            spans.push(Span::styled(
                format!("  ({})", language),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let style = if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(spans).style(style));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Nenhuma questão carregada",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Keep the selection visible by scrolling past it when needed
    let visible = chunks[1].height.saturating_sub(2) as usize;
    let scroll = if visible > 0 && app.selected_index >= visible {
        (app.selected_index + 1 - visible) as u16
    } else {
        0
    };

    let list = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .scroll((scroll, 0));
    frame.render_widget(list, chunks[1]);

    // Footer: status plus key hints
    let footer = Paragraph::new(vec![
        status_line(app),
        Line::from(Span::styled(
            "↑↓ navegar · Enter abrir · 1-4/0 área · y ano · l idioma · s buscar · ? ajuda · q sair",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(footer, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_page;
    use ratatui::{backend::TestBackend, Terminal};

    fn loaded_app() -> App {
        let mut app = App::new();
        app.state = crate::app::AppState::QuestionList;
        let page = sample_page();
        app.metadata = Some(page.metadata.clone());
        app.questions = page.questions;
        app
    }

    #[test]
    fn test_discipline_colors_are_distinct_for_known_areas() {
        let colors = [
            discipline_color("matematica"),
            discipline_color("linguagens"),
            discipline_color("humanas"),
            discipline_color("natureza"),
        ];
        for (i, a) in colors.iter().enumerate() {
            for (j, b) in colors.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
        assert_eq!(discipline_color("desconhecida"), Color::Gray);
    }

    #[test]
    fn test_discipline_short_tags() {
        assert_eq!(discipline_short("matematica"), "MAT");
        assert_eq!(discipline_short("linguagens"), "LIN");
        assert_eq!(discipline_short("humanas"), "HUM");
        assert_eq!(discipline_short("natureza"), "NAT");
        assert_eq!(discipline_short("outra"), "???");
    }

    #[test]
    fn test_filter_summary_mentions_year_and_area() {
        let mut app = loaded_app();
        app.query.discipline = Some(Discipline::Matematica);

        let summary = filter_summary(&app);
        assert!(summary.contains("2023"));
        assert!(summary.contains("Matemática"));
    }

    #[test]
    fn test_filter_summary_defaults_to_all_areas() {
        let app = loaded_app();
        assert!(filter_summary(&app).contains("todas"));
    }

    #[test]
    fn test_render_question_list_shows_titles() {
        let app = loaded_app();
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| render_question_list(frame, &app))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(content.contains("Banco de Quest"));
        assert!(content.contains("MAT"));
        assert!(content.contains("127"));
    }

    #[test]
    fn test_render_empty_list_shows_placeholder() {
        let mut app = App::new();
        app.state = crate::app::AppState::QuestionList;

        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_question_list(frame, &app))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(content.contains("Nenhuma quest"));
    }

    #[test]
    fn test_status_line_reports_error() {
        let mut app = loaded_app();
        app.last_error = Some("HTTP 500: Internal Server Error".to_string());

        let line = status_line(&app);
        let text: String = line.spans.iter().map(|s| s.content.clone()).collect();
        assert!(text.contains("HTTP 500"));
        assert!(text.contains("tentar novamente"));
    }

    #[test]
    fn test_status_line_rate_limited_hint() {
        let mut app = loaded_app();
        app.last_error = Some("rate limited by the question bank after 3 attempts".to_string());
        app.last_error_status = Some(429);

        let line = status_line(&app);
        let text: String = line.spans.iter().map(|s| s.content.clone()).collect();
        assert!(text.contains("limite de requisi"));
    }
}
