//! Pane geometry as a pure function of terminal size.
//!
//! ```text
//!   ┌──────── header (3) ────────┐
//!   │ list          ││ preview    │  content_height
//!   └──────── footer (2) ────────┘
//! ```

/// Columns between the list and preview panes.
pub const GUTTER: u16 = 2;
const HEADER_ROWS: u16 = 3;
const FOOTER_ROWS: u16 = 2;
const MIN_CONTENT_HEIGHT: u16 = 5;
const MIN_PANE_WIDTH: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    pub total_width: u16,
    pub total_height: u16,
    pub list_width: u16,
    /// Zero when the preview pane is disabled.
    pub preview_width: u16,
    pub content_height: u16,
}

impl Layout {
    pub fn new(width: u16, height: u16) -> Self {
        let content_height = height
            .saturating_sub(HEADER_ROWS + FOOTER_ROWS)
            .max(MIN_CONTENT_HEIGHT);

        let w = u32::from(width);
        let gutter = u32::from(GUTTER);
        let (mut list, mut preview) = if width < 100 {
            (w.saturating_sub(gutter), 0)
        } else if width < 140 {
            let list = w / 2;
            (list, w - list - gutter)
        } else {
            let list = 2 * w / 5;
            (list, w - list - gutter)
        };

        if list < MIN_PANE_WIDTH {
            // Never wider than the terminal itself.
            list = MIN_PANE_WIDTH.min(w.saturating_sub(gutter));
            preview = 0;
        }
        if preview < MIN_PANE_WIDTH {
            preview = 0;
        }

        Self {
            total_width: width,
            total_height: height,
            list_width: list as u16,
            preview_width: preview as u16,
            content_height,
        }
    }

    pub fn has_preview(&self) -> bool {
        self.preview_width > 0
    }

    /// Rows inside a bordered pane.
    pub fn list_height(&self) -> u16 {
        self.content_height.saturating_sub(2)
    }

    /// Rows of preview text visible below the pane title.
    pub fn preview_rows(&self) -> u16 {
        self.content_height.saturating_sub(3).max(1)
    }
}
