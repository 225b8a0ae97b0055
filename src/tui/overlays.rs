/// Overlay/popup draw functions.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::render::{DIM, centered};

const ERROR_FG: Color = Color::Rgb(230, 90, 90);

// ── Error banner ───────────────────────────────────────────────────────────────

pub fn draw_error(f: &mut Frame, text: &str, area: Rect) {
    let width = 64u16;
    let inner_width = usize::from(width.saturating_sub(4)).max(1);
    // Rough wrapped height: message rows + blank + hint, plus borders.
    let rows = text
        .lines()
        .map(|l| l.chars().count().div_ceil(inner_width).max(1))
        .sum::<usize>();
    let height = u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(4).min(16);
    let popup_area = centered(area, width, height);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Error ",
            Style::default().fg(ERROR_FG).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(ERROR_FG))
        .style(Style::default().bg(Color::Rgb(20, 8, 8)));

    let mut lines: Vec<Line> = text
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White))))
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "any key to dismiss · q to quit",
        Style::default().fg(DIM),
    )));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}
