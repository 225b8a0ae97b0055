//! Application state owned by the update loop.
use std::collections::HashSet;
use std::time::Duration;

use tui_textarea::TextArea;

use super::diff_cache::DiffCache;
use super::keys::KeyContext;
use super::layout::Layout;
use super::message::Command;
use super::selection::{FileEntry, FileListing};
use crate::git::{HeadInfo, RepoSnapshot};

// ── Modes ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    FileList,
    Commit(CommitSubstate),
    ModifyHead(HeadModifySubstate),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitSubstate {
    Message,
    Date,
    /// Commit dispatched; waiting on its result.
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadModifySubstate {
    Menu,
    AmendMessage,
    /// Amend dispatched; waiting on its result.
    Amending,
}

// ── Drafts ─────────────────────────────────────────────────────────────────────

pub struct CommitDraft {
    pub message: TextArea<'static>,
    pub date: TextArea<'static>,
    /// Inline validation error for whichever input is active.
    pub error: Option<String>,
}

impl Default for CommitDraft {
    fn default() -> Self {
        let mut date = TextArea::default();
        date.set_placeholder_text("now (or YYYY-MM-DD [HH:MM:SS])");
        Self {
            message: TextArea::default(),
            date,
            error: None,
        }
    }
}

impl CommitDraft {
    pub fn message_text(&self) -> String {
        text_of(&self.message)
    }

    pub fn date_text(&self) -> String {
        text_of(&self.date)
    }
}

#[derive(Default)]
pub struct AmendDraft {
    pub message: TextArea<'static>,
    pub error: Option<String>,
}

impl AmendDraft {
    pub fn prefilled(subject: &str) -> Self {
        let mut message = TextArea::from(subject.lines().map(str::to_string).collect::<Vec<_>>());
        message.move_cursor(tui_textarea::CursorMove::Bottom);
        message.move_cursor(tui_textarea::CursorMove::End);
        Self {
            message,
            error: None,
        }
    }

    pub fn text(&self) -> String {
        text_of(&self.message)
    }
}

/// Joined and trimmed; whitespace-only counts as empty.
fn text_of(area: &TextArea<'_>) -> String {
    area.lines().join("\n").trim().to_string()
}

// ── Preview / banners / settings ───────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Preview {
    /// Path whose text is shown (or being loaded).
    pub path: Option<String>,
    pub content: String,
    pub scroll: u16,
}

impl Preview {
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub token: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub status_clear: Duration,
    pub error_clear: Duration,
    pub scroll_step: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            status_clear: Duration::from_secs(2),
            error_clear: Duration::from_secs(3),
            scroll_step: 3,
        }
    }
}

// ── App ────────────────────────────────────────────────────────────────────────

pub struct App {
    pub state: AppState,
    pub snapshot: RepoSnapshot,
    pub files: FileListing,
    pub cursor: usize,
    pub layout: Layout,
    pub preview: Preview,
    pub preview_focused: bool,
    pub(super) diff_cache: DiffCache,
    /// Paths with a preview fetch in flight.
    pub(super) pending_diffs: HashSet<String>,
    pub commit: CommitDraft,
    /// Fetched on entering the HEAD flow, dropped on leaving it.
    pub head: Option<HeadInfo>,
    pub amend: AmendDraft,
    pub status: Option<Banner>,
    pub error: Option<Banner>,
    /// Backend units dispatched and not yet answered.
    pub in_flight: usize,
    next_token: u64,
    /// Newest status refresh dispatched, and newest one applied.
    status_requested: u64,
    status_applied: u64,
    /// Only the HEAD fetch with this generation may populate `head`.
    head_requested: u64,
    pub should_quit: bool,
    pub(super) settings: Settings,
}

impl App {
    pub fn new(settings: Settings, (width, height): (u16, u16)) -> Self {
        Self {
            state: AppState::FileList,
            snapshot: RepoSnapshot::default(),
            files: FileListing::default(),
            cursor: 0,
            layout: Layout::new(width, height),
            preview: Preview::default(),
            preview_focused: false,
            diff_cache: DiffCache::default(),
            pending_diffs: HashSet::new(),
            commit: CommitDraft::default(),
            head: None,
            amend: AmendDraft::default(),
            status: None,
            error: None,
            in_flight: 0,
            next_token: 0,
            status_requested: 0,
            status_applied: 0,
            head_requested: 0,
            should_quit: false,
            settings,
        }
    }

    /// Units of work to run before the first key press.
    pub fn init(&mut self) -> Vec<Command> {
        let refresh = self.refresh_status();
        self.track(vec![refresh])
    }

    pub fn processing(&self) -> bool {
        self.in_flight > 0
    }

    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.files.get(self.cursor)
    }

    pub fn staged_count(&self) -> usize {
        self.snapshot.staged.len()
    }

    pub fn key_context(&self) -> KeyContext {
        if self.error.is_some() {
            return KeyContext::ErrorOverlay;
        }
        match self.state {
            AppState::FileList => KeyContext::FileList,
            AppState::Help => KeyContext::Help,
            AppState::Commit(CommitSubstate::Message) => KeyContext::MessageInput,
            AppState::Commit(CommitSubstate::Date) => KeyContext::DateInput,
            AppState::Commit(CommitSubstate::Confirm) => KeyContext::Busy,
            AppState::ModifyHead(HeadModifySubstate::Menu) => KeyContext::HeadMenu,
            AppState::ModifyHead(HeadModifySubstate::AmendMessage) => KeyContext::MessageInput,
            AppState::ModifyHead(HeadModifySubstate::Amending) => KeyContext::Busy,
        }
    }

    /// Count newly scheduled backend work toward the footer indicator.
    pub(super) fn track(&mut self, cmds: Vec<Command>) -> Vec<Command> {
        self.in_flight += cmds.iter().filter(|c| c.is_backend()).count();
        cmds
    }

    pub(super) fn refresh_status(&mut self) -> Command {
        self.status_requested += 1;
        Command::RefreshStatus(self.status_requested)
    }

    /// Record that a status result is being applied; false if a newer one
    /// already was.
    pub(super) fn accept_status(&mut self, generation: u64) -> bool {
        if generation <= self.status_applied {
            return false;
        }
        self.status_applied = generation;
        true
    }

    pub(super) fn fetch_head_info(&mut self) -> Command {
        self.head_requested += 1;
        Command::FetchHeadInfo(self.head_requested)
    }

    pub(super) fn is_current_head_fetch(&self, generation: u64) -> bool {
        generation == self.head_requested
    }

    fn token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Show an ephemeral status line; returns the timer that clears it.
    pub(super) fn set_status(&mut self, text: impl Into<String>) -> Command {
        let token = self.token();
        self.status = Some(Banner {
            text: text.into(),
            token,
        });
        Command::ExpireStatus {
            token,
            after: self.settings.status_clear,
        }
    }

    pub(super) fn set_error(&mut self, text: impl Into<String>) -> Command {
        let token = self.token();
        let text = text.into();
        tracing::warn!(error = %text, "operation failed");
        self.error = Some(Banner { text, token });
        Command::ExpireError {
            token,
            after: self.settings.error_clear,
        }
    }
}
