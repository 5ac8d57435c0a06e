//! Question resolution screen rendering
//!
//! Renders a single question: its context, the alternatives A-E, the
//! currently picked answer, and the correction once the answer is revealed.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::Question;

/// Renders the question detail view for the question at `index`
pub fn render(frame: &mut Frame, app: &App, index: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let Some(question) = app.questions.get(index) else {
        let missing = Paragraph::new("Questão não encontrada")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(missing, chunks[1]);
        return;
    };

    // Header: title plus position within the list
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            question.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   ({}/{})", index + 1, app.questions.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    frame.render_widget(header, chunks[0]);

    // Body: context, alternatives and correction
    let mut lines = Vec::new();
    lines.push(Line::from(question.context.clone()));
    lines.push(Line::from(""));

    if let Some(files) = &question.files {
        for file in files {
            lines.push(Line::from(Span::styled(
                format!("[anexo] {}", file),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        question.alternatives_introduction.clone(),
        Style::default().add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::from(""));

    for i in 0..question.alternatives.len() {
        lines.push(alternative_line(app, question, i));
    }

    lines.push(Line::from(""));
    lines.push(correction_line(app, question));

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll_offset, 0));
    frame.render_widget(body, chunks[1]);

    // Footer hints
    let footer = Paragraph::new(Line::from(Span::styled(
        "a-e escolher · Enter confirmar · n/p questão · f atualizar · Esc voltar",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, chunks[2]);
}

/// Builds the display line of one alternative
///
/// Before the reveal the picked alternative is highlighted; afterwards the
/// correct one turns green and a wrong pick turns red.
fn alternative_line(app: &App, question: &Question, position: usize) -> Line<'static> {
    let alternative = &question.alternatives[position];
    let picked = app.selected_answer == Some(position);

    let marker = if picked { "●" } else { "○" };
    let style = if app.answer_revealed {
        if alternative.is_correct {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if picked {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    } else if picked {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(Span::styled(
        format!("  {} {}) {}", marker, alternative.letter, alternative.text),
        style,
    ))
}

/// Builds the correction line shown under the alternatives
fn correction_line(app: &App, question: &Question) -> Line<'static> {
    if !app.answer_revealed {
        return Line::from(Span::styled(
            if app.selected_answer.is_some() {
                "Enter para confirmar a resposta"
            } else {
                "Escolha uma alternativa (a-e)"
            },
            Style::default().fg(Color::DarkGray),
        ));
    }

    let picked_correct = app
        .selected_answer
        .and_then(|i| question.alternatives.get(i))
        .map(|a| a.is_correct)
        .unwrap_or(false);

    if picked_correct {
        Line::from(Span::styled(
            "✔ Resposta correta!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            format!("✘ Incorreta. Alternativa certa: {}", question.correct_alternative),
            Style::default().fg(Color::Red),
        ))
    }
}
