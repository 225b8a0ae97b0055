/// Commit screen: staged files, message editor, then the date input.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::render::{ACCENT, BG, DIM, fit_width};
use crate::app::{App, CommitSubstate};

pub fn draw(f: &mut Frame, app: &App, sub: CommitSubstate, area: Rect) {
    let staged_rows = u16::try_from(app.snapshot.staged.len())
        .unwrap_or(u16::MAX)
        .clamp(1, 8)
        + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(staged_rows), // staged files
            Constraint::Min(4),              // message
            Constraint::Length(3),           // date
            Constraint::Length(1),           // inline validation
        ])
        .split(area);

    draw_staged(f, app, chunks[0]);

    let editing_message = sub == CommitSubstate::Message;
    let message_block = input_block(" Commit message ", editing_message);
    let inner = message_block.inner(chunks[1]);
    f.render_widget(message_block, chunks[1]);
    f.render_widget(&app.commit.message, inner);

    if sub != CommitSubstate::Message {
        let title = if sub == CommitSubstate::Confirm {
            " Commit date · committing… "
        } else {
            " Commit date (empty = now) "
        };
        let date_block = input_block(title, sub == CommitSubstate::Date);
        let inner = date_block.inner(chunks[2]);
        f.render_widget(date_block, chunks[2]);
        f.render_widget(&app.commit.date, inner);
    }

    if let Some(err) = &app.commit.error {
        f.render_widget(validation_line(err), chunks[3]);
    }
}

fn draw_staged(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" Committing {} staged ", app.snapshot.staged.len()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(DIM))
        .style(Style::default().bg(BG));
    let room = usize::from(area.width.saturating_sub(6));
    let rows = usize::from(area.height.saturating_sub(2));
    let staged = &app.snapshot.staged;
    let mut lines: Vec<Line> = staged
        .iter()
        .take(rows)
        .map(|p| {
            Line::from(vec![
                Span::styled(" + ", Style::default().fg(Color::Rgb(80, 200, 80))),
                Span::raw(fit_width(p, room)),
            ])
        })
        .collect();
    if staged.len() > rows && rows > 0 {
        lines.truncate(rows - 1);
        lines.push(Line::from(Span::styled(
            format!("   … and {} more", staged.len() - (rows - 1)),
            Style::default().fg(DIM),
        )));
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn input_block(title: &str, active: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(if active { ACCENT } else { DIM })
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(if active { ACCENT } else { DIM }))
}

pub fn validation_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        format!(" ✗ {text}"),
        Style::default().fg(Color::Rgb(230, 90, 90)),
    )))
}
