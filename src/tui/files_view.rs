/// File list + preview screen.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::render::{ACCENT, BG, DIM, diff_style, fit_width};
use crate::app::App;
use crate::app::layout::GUTTER;
use crate::git::FileCategory;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let layout = app.layout;
    if layout.has_preview() && app.preview_focused {
        draw_preview(f, app, area);
        return;
    }
    if !layout.has_preview() {
        draw_list(f, app, area);
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(layout.list_width),
            Constraint::Length(GUTTER),
            Constraint::Length(layout.preview_width),
        ])
        .split(area);
    draw_list(f, app, cols[0]);
    draw_preview(f, app, cols[2]);
}

fn category_color(cat: FileCategory) -> Color {
    match cat {
        FileCategory::Staged => Color::Rgb(80, 200, 80),
        FileCategory::Unstaged => Color::Rgb(220, 160, 60),
        FileCategory::Untracked => Color::Rgb(130, 130, 160),
    }
}

// ── List pane ─────────────────────────────────────────────────────────────────

fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    let snap = &app.snapshot;
    let title = format!(
        " Files  +{} staged · -{} unstaged · ?{} untracked · {} selected ",
        snap.staged.len(),
        snap.unstaged.len(),
        snap.untracked.len(),
        app.files.selection().len(),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(if app.preview_focused { DIM } else { ACCENT }))
        .style(Style::default().bg(BG));

    if app.files.is_empty() {
        let msg = if snap.clean { "  Working tree clean" } else { "  Loading status…" };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(msg, Style::default().fg(DIM)))).block(block),
            area,
        );
        return;
    }

    // "[x] + " prefix, then the path
    let path_room = usize::from(area.width.saturating_sub(2 + 6));
    let items: Vec<ListItem> = app
        .files
        .entries()
        .iter()
        .map(|e| {
            let mark = if e.selected { "[x] " } else { "[ ] " };
            let color = category_color(e.category);
            ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(if e.selected { ACCENT } else { DIM })),
                Span::styled(
                    format!("{} ", e.category.symbol()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(fit_width(&e.path, path_room), Style::default().fg(color)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(30, 30, 55)).add_modifier(Modifier::BOLD));
    let mut state = ListState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(list, area, &mut state);
}

// ── Preview pane ──────────────────────────────────────────────────────────────

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.current_entry() {
        Some(e) => format!(
            " Preview: {} ({}) ",
            fit_width(&e.path, usize::from(area.width.saturating_sub(24))),
            e.category.label()
        ),
        None => " Preview ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default().fg(Color::Rgb(100, 180, 255)).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(if app.preview_focused {
            ACCENT
        } else {
            Color::Rgb(50, 80, 140)
        }))
        .style(Style::default().bg(BG));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.current_entry().is_none() {
        return;
    }

    let visible: Vec<Line> = app
        .preview
        .content
        .lines()
        .skip(usize::from(app.preview.scroll))
        .take(usize::from(inner.height))
        .map(|line| Line::from(Span::styled(line.replace('\t', "    "), diff_style(line))))
        .collect();
    f.render_widget(Paragraph::new(visible), inner);
}
