/// Help screen: every key binding, grouped by screen.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::render::{ACCENT, BG, DIM};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "File list",
        &[
            ("↑/k  ↓/j", "move"),
            ("PgUp/b  PgDn/f", "page"),
            ("Home/g  End/G", "first / last file"),
            ("Space  Tab", "toggle selection"),
            ("a  d", "select all / deselect all"),
            ("Enter", "stage or unstage the selection"),
            ("c", "commit staged files"),
            ("m", "modify HEAD (amend message, undo commit)"),
            ("p  P", "focus preview; j/k then scroll it"),
            ("?", "toggle this help"),
            ("q", "quit"),
        ],
    ),
    (
        "Commit",
        &[
            ("Ctrl+D", "message done, go to date"),
            ("Enter", "commit (date empty = now)"),
            ("Esc", "back / cancel"),
        ],
    ),
    (
        "Modify HEAD",
        &[
            ("m", "amend message (Ctrl+D to confirm)"),
            ("f", "soft reset: undo commit, keep changes staged"),
            ("Esc  q", "cancel"),
        ],
    ),
    ("Anywhere", &[("Ctrl+C", "exit immediately")]),
];

pub fn draw(f: &mut Frame, area: Rect) {
    let mut lines = Vec::new();
    for (title, bindings) in SECTIONS {
        lines.push(Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        for (keys, what) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("    {keys:<16}"), Style::default().fg(ACCENT)),
                Span::styled(*what, Style::default().fg(Color::Rgb(190, 190, 210))),
            ]));
        }
        lines.push(Line::raw(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Help ",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(DIM))
        .style(Style::default().bg(BG));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
