/// Modify-HEAD screen: summary + menu, and the amend-message editor.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::commit_view::{input_block, validation_line};
use super::render::{ACCENT, BG, DIM};
use crate::app::{App, HeadModifySubstate};
use crate::git::HeadInfo;

const WARN: Color = Color::Rgb(230, 180, 60);

pub fn draw(f: &mut Frame, app: &App, sub: HeadModifySubstate, area: Rect) {
    match sub {
        HeadModifySubstate::Menu => draw_menu(f, app, area),
        HeadModifySubstate::AmendMessage => draw_amend(f, app, false, area),
        HeadModifySubstate::Amending => draw_amend(f, app, true, area),
    }
}

fn summary_lines(head: Option<&HeadInfo>) -> Vec<Line<'static>> {
    let Some(head) = head else {
        return vec![Line::from(Span::styled(
            "  Loading HEAD…",
            Style::default().fg(DIM),
        ))];
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("  {} ", head.short_hash),
                Style::default().fg(WARN).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                head.subject.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {} · {}", head.author, head.relative_date),
            Style::default().fg(DIM),
        )),
    ];
    if head.pushed {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  ⚠ HEAD is already on the remote tracking branch; rewriting it will need a force push.",
            Style::default().fg(WARN),
        )));
    }
    lines
}

fn draw_menu(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Modify HEAD ",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(ACCENT))
        .style(Style::default().bg(BG));

    let mut lines = summary_lines(app.head.as_ref());
    lines.push(Line::raw(""));
    for (key, label) in [
        ("[m]", "amend commit message"),
        ("[f]", "undo commit, keep its changes staged"),
        ("[Esc]", "cancel"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {key:<6}"),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw(label),
        ]));
    }
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_amend(f: &mut Frame, app: &App, busy: bool, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // current message
            Constraint::Min(4),    // editor
            Constraint::Length(1), // inline validation
        ])
        .split(area);

    let current = app
        .head
        .as_ref()
        .map(|h| h.subject.clone())
        .unwrap_or_else(|| "…".to_string());
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("  {current}"),
            Style::default().fg(DIM),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Current message ")
                .border_style(Style::default().fg(DIM)),
        )
        .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let block = if busy {
        input_block(" New message · amending… ", false)
    } else {
        input_block(" New message ", true)
    };
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);
    f.render_widget(&app.amend.message, inner);

    if let Some(err) = &app.amend.error {
        f.render_widget(validation_line(err), chunks[2]);
    }
}
