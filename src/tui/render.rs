/// Ratatui draw entry-point for stagecraft.
/// Thin dispatcher; each screen lives in its own *_view.rs.
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, AppState, CommitSubstate, HeadModifySubstate};

pub const BG: Color = Color::Rgb(6, 6, 12);
pub const DIM: Color = Color::Rgb(90, 90, 120);
pub const ACCENT: Color = Color::Cyan;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // screen
            Constraint::Length(2), // footer
        ])
        .split(area);

    draw_header(f, app, chunks[0]);

    match app.state {
        AppState::FileList => super::files_view::draw(f, app, chunks[1]),
        AppState::Commit(sub) => super::commit_view::draw(f, app, sub, chunks[1]),
        AppState::ModifyHead(sub) => super::head_view::draw(f, app, sub, chunks[1]),
        AppState::Help => super::help_view::draw(f, chunks[1]),
    }

    draw_footer(f, app, chunks[2]);

    if let Some(err) = &app.error {
        super::overlays::draw_error(f, &err.text, area);
    }
}

// ── Header ────────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let branch = if app.snapshot.branch.is_empty() {
        "(detached)".to_string()
    } else {
        app.snapshot.branch.clone()
    };
    let line = Line::from(vec![
        Span::styled(
            "stagecraft",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  on  ", Style::default().fg(DIM)),
        Span::styled(
            branch,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(Color::Rgb(40, 40, 70)));
    f.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(block)
            .style(Style::default().bg(BG)),
        area,
    );
}

// ── Footer ────────────────────────────────────────────────────────────────────

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut status = app
        .status
        .as_ref()
        .map(|b| b.text.clone())
        .unwrap_or_default();
    if app.processing() {
        status.push_str(" [...]");
    }
    let lines = vec![
        Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Rgb(200, 200, 120)),
        )),
        Line::from(Span::styled(
            format!(" {}", key_hints(app)),
            Style::default().fg(DIM),
        )),
    ];
    f.render_widget(Paragraph::new(lines).style(Style::default().bg(BG)), area);
}

fn key_hints(app: &App) -> &'static str {
    match app.state {
        AppState::FileList if app.preview_focused => {
            "j/k scroll · PgUp/PgDn page · g/G top/bottom · p back to list · q quit"
        }
        AppState::FileList => {
            "space select · a/d all/none · enter apply · c commit · m HEAD · p preview · ? help · q quit"
        }
        AppState::Commit(CommitSubstate::Message) => "Ctrl+D continue · Esc cancel",
        AppState::Commit(CommitSubstate::Date) => "Enter commit · Esc back",
        AppState::Commit(CommitSubstate::Confirm) => "committing…",
        AppState::ModifyHead(HeadModifySubstate::Menu) => "m amend message · f undo commit · Esc cancel",
        AppState::ModifyHead(HeadModifySubstate::AmendMessage) => "Ctrl+D amend · Esc back",
        AppState::ModifyHead(HeadModifySubstate::Amending) => "amending…",
        AppState::Help => "? or q to close",
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Shorten `text` to at most `max` display columns, keeping the tail
/// (the file name end of a path) behind a leading ellipsis.
pub fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut kept = Vec::new();
    let mut used = 1; // the ellipsis
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        kept.push(c);
    }
    let mut out = String::from("…");
    out.extend(kept.into_iter().rev());
    out
}

/// Colour for one line of unified diff output.
pub fn diff_style(line: &str) -> Style {
    if line.starts_with("+++") || line.starts_with("---") {
        Style::default()
            .fg(Color::Rgb(180, 140, 255))
            .add_modifier(Modifier::BOLD)
    } else if line.starts_with('+') {
        Style::default().fg(Color::Rgb(80, 200, 80))
    } else if line.starts_with('-') {
        Style::default().fg(Color::Rgb(200, 80, 80))
    } else if line.starts_with("@@") {
        Style::default().fg(Color::Rgb(80, 160, 255))
    } else if line.starts_with("diff ") || line.starts_with("index ") {
        Style::default().fg(Color::Rgb(140, 100, 200))
    } else {
        Style::default().fg(Color::Rgb(170, 170, 190))
    }
}

/// Centered rectangle of at most `width`×`height` inside `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::{Msg, Settings};
    use crate::git::RepoSnapshot;
    use ratatui::{Terminal, backend::TestBackend};

    /// Render `app` into a test buffer and return it as text, one line per row.
    pub(crate) fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    pub(crate) fn app_with(snapshot: RepoSnapshot, size: (u16, u16)) -> App {
        let mut app = App::new(Settings::default(), size);
        app.update(Msg::StatusLoaded {
            generation: 1,
            result: Ok(snapshot),
        });
        app
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("src/main.rs", 20), "src/main.rs");
        assert_eq!(fit_width("src/deeply/nested/file.rs", 10), "…d/file.rs");
        assert_eq!(fit_width("日本語のファイル.txt", 9).width(), 9);
        assert_eq!(fit_width("abc", 0), "");
    }

    #[test]
    fn test_diff_style_by_prefix() {
        assert_eq!(diff_style("+added").fg, Some(Color::Rgb(80, 200, 80)));
        assert_eq!(diff_style("-gone").fg, Some(Color::Rgb(200, 80, 80)));
        assert_eq!(diff_style("@@ -1 +1 @@").fg, Some(Color::Rgb(80, 160, 255)));
        assert!(diff_style("+++ b/x").add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_header_and_footer() {
        let snap = RepoSnapshot::new(vec![], vec!["a.txt".into()], vec![], "feature/x".into());
        let mut app = app_with(snap, (100, 20));
        let text = screen(&app, 100, 20);
        assert!(text.contains("stagecraft"));
        assert!(text.contains("feature/x"));
        assert!(text.contains("q quit"));

        app.in_flight = 1;
        assert!(screen(&app, 100, 20).contains("[...]"));
    }

    #[test]
    fn test_error_overlay_is_drawn() {
        let mut app = app_with(RepoSnapshot::default(), (80, 20));
        app.update(Msg::Committed(Err(crate::git::GitError::Failed {
            command: "commit".into(),
            output: "boom".into(),
        })));
        assert!(screen(&app, 80, 20).contains("boom"));
    }
}
