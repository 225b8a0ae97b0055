//! The transition table: `(state, Msg) -> (state', [Command])`.
//!
//! Every state edit happens here, one message at a time, in dequeue order.
//! Results from the backend never assume they arrive in the order they were
//! scheduled; anything recency-sensitive checks context first.
use tracing::{debug, info};

use super::keys::{Intent, map_key};
use super::layout::Layout;
use super::message::{Command, Msg};
use super::selection::ApplyPlan;
use super::state::{AmendDraft, App, AppState, CommitDraft, CommitSubstate, HeadModifySubstate};
use crate::git::{FileCategory, GitError, HeadInfo, RepoSnapshot, validate_commit_date};

const EMPTY_MESSAGE: &str = "Commit message cannot be empty";
const LOADING: &str = "Loading...";

fn plural(n: usize) -> String {
    format!("{n} file{}", if n == 1 { "" } else { "s" })
}

impl App {
    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        if msg.is_backend_result() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        let cmds = match msg {
            Msg::Key(key) => match map_key(key, self.key_context()) {
                Some(intent) => self.on_intent(intent),
                None => Vec::new(),
            },
            Msg::Resize(w, h) => self.on_resize(w, h),
            Msg::StatusLoaded { generation, result } => self.on_status(generation, result),
            Msg::DiffLoaded {
                path,
                category,
                result,
            } => self.on_diff(path, category, result),
            Msg::Staged { paths, result } => self.on_staging(paths, result, true),
            Msg::Unstaged { paths, result } => self.on_staging(paths, result, false),
            Msg::Committed(result) => self.on_committed(result),
            Msg::HeadInfoLoaded { generation, result } => self.on_head_info(generation, result),
            Msg::Amended(result) => self.on_amended(result),
            Msg::SoftResetDone(result) => self.on_soft_reset(result),
            Msg::StatusExpired(token) => {
                if self.status.as_ref().is_some_and(|b| b.token == token) {
                    self.status = None;
                }
                Vec::new()
            }
            Msg::ErrorExpired(token) => {
                if self.error.as_ref().is_some_and(|b| b.token == token) {
                    self.error = None;
                }
                Vec::new()
            }
        };
        self.track(cmds)
    }

    // ── Input ──────────────────────────────────────────────────────────────

    fn on_intent(&mut self, intent: Intent) -> Vec<Command> {
        if intent == Intent::Exit {
            self.should_quit = true;
            return Vec::new();
        }
        if self.error.is_some() {
            match intent {
                Intent::Quit => self.should_quit = true,
                _ => self.error = None,
            }
            return Vec::new();
        }

        match self.state {
            AppState::FileList => self.file_list_intent(intent),
            AppState::Help => {
                if matches!(intent, Intent::ToggleHelp | Intent::Quit) {
                    self.state = AppState::FileList;
                }
                Vec::new()
            }
            AppState::Commit(sub) => self.commit_intent(sub, intent),
            AppState::ModifyHead(sub) => self.head_intent(sub, intent),
        }
    }

    fn file_list_intent(&mut self, intent: Intent) -> Vec<Command> {
        if self.preview_focused {
            match intent {
                Intent::MoveUp
                | Intent::MoveDown
                | Intent::PageUp
                | Intent::PageDown
                | Intent::JumpTop
                | Intent::JumpBottom => {
                    self.scroll_preview(intent);
                    return Vec::new();
                }
                _ => {}
            }
        }

        let page = usize::from(self.layout.list_height().max(1));
        let last = self.files.len().saturating_sub(1);
        match intent {
            Intent::MoveUp => self.move_cursor(self.cursor.saturating_sub(1)),
            Intent::MoveDown => self.move_cursor((self.cursor + 1).min(last)),
            Intent::PageUp => self.move_cursor(self.cursor.saturating_sub(page)),
            Intent::PageDown => self.move_cursor((self.cursor + page).min(last)),
            Intent::JumpTop => self.move_cursor(0),
            Intent::JumpBottom => self.move_cursor(last),
            Intent::ToggleSelection => {
                self.files.toggle(self.cursor);
                Vec::new()
            }
            Intent::SelectAll => {
                self.files.select_all();
                Vec::new()
            }
            Intent::DeselectAll => {
                self.files.clear_selection();
                Vec::new()
            }
            Intent::Apply => self.apply_selection(),
            Intent::EnterCommit => {
                if self.staged_count() == 0 {
                    return vec![self.set_status("No files staged")];
                }
                self.commit = CommitDraft::default();
                self.state = AppState::Commit(CommitSubstate::Message);
                Vec::new()
            }
            Intent::EnterModifyHead => {
                self.head = None;
                self.amend = AmendDraft::default();
                self.state = AppState::ModifyHead(HeadModifySubstate::Menu);
                vec![self.fetch_head_info()]
            }
            Intent::TogglePreviewFocus => {
                if self.layout.has_preview() {
                    self.preview_focused = !self.preview_focused;
                }
                Vec::new()
            }
            Intent::ToggleHelp => {
                self.state = AppState::Help;
                Vec::new()
            }
            Intent::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn apply_selection(&mut self) -> Vec<Command> {
        let Some(plan) = self.files.plan_apply() else {
            return vec![self.set_status("No files selected")];
        };
        self.files.clear_selection();
        let (count, cmd) = match plan {
            ApplyPlan::Stage(paths) => (paths.len(), Command::Stage(paths)),
            ApplyPlan::Unstage(paths) => (paths.len(), Command::Unstage(paths)),
        };
        debug!(?cmd, "applying selection");
        vec![self.set_status(format!("Processing {}...", plural(count))), cmd]
    }

    fn commit_intent(&mut self, sub: CommitSubstate, intent: Intent) -> Vec<Command> {
        match (sub, intent) {
            (CommitSubstate::Message, Intent::Confirm) => {
                if self.commit.message_text().is_empty() {
                    self.commit.error = Some(EMPTY_MESSAGE.to_string());
                } else {
                    self.commit.error = None;
                    self.state = AppState::Commit(CommitSubstate::Date);
                }
                Vec::new()
            }
            (CommitSubstate::Message, Intent::Cancel) => {
                self.commit = CommitDraft::default();
                self.state = AppState::FileList;
                Vec::new()
            }
            (CommitSubstate::Message, Intent::Edit(key)) => {
                if self.commit.message.input(key) {
                    self.commit.error = None;
                }
                Vec::new()
            }
            (CommitSubstate::Date, Intent::Confirm) => {
                match validate_commit_date(&self.commit.date_text()) {
                    Ok(date) => {
                        self.commit.error = None;
                        self.state = AppState::Commit(CommitSubstate::Confirm);
                        vec![Command::Commit {
                            message: self.commit.message_text(),
                            date,
                        }]
                    }
                    Err(e) => {
                        self.commit.error = Some(e);
                        Vec::new()
                    }
                }
            }
            (CommitSubstate::Date, Intent::Cancel) => {
                self.commit.date = CommitDraft::default().date;
                self.commit.error = None;
                self.state = AppState::Commit(CommitSubstate::Message);
                Vec::new()
            }
            (CommitSubstate::Date, Intent::Edit(key)) => {
                if self.commit.date.input(key) {
                    self.commit.error = None;
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn head_intent(&mut self, sub: HeadModifySubstate, intent: Intent) -> Vec<Command> {
        match (sub, intent) {
            (HeadModifySubstate::Menu, Intent::AmendMessage) => {
                self.amend = match &self.head {
                    Some(head) => AmendDraft::prefilled(&head.subject),
                    None => AmendDraft::default(),
                };
                self.state = AppState::ModifyHead(HeadModifySubstate::AmendMessage);
                Vec::new()
            }
            (HeadModifySubstate::Menu, Intent::AmendFiles) => {
                self.leave_head_flow();
                vec![Command::SoftReset]
            }
            (HeadModifySubstate::Menu, Intent::Cancel) => {
                self.leave_head_flow();
                Vec::new()
            }
            (HeadModifySubstate::AmendMessage, Intent::Confirm) => {
                let message = self.amend.text();
                if message.is_empty() {
                    self.amend.error = Some(EMPTY_MESSAGE.to_string());
                    return Vec::new();
                }
                self.amend.error = None;
                self.state = AppState::ModifyHead(HeadModifySubstate::Amending);
                vec![Command::AmendMessage(message)]
            }
            (HeadModifySubstate::AmendMessage, Intent::Cancel) => {
                self.amend.error = None;
                self.state = AppState::ModifyHead(HeadModifySubstate::Menu);
                Vec::new()
            }
            (HeadModifySubstate::AmendMessage, Intent::Edit(key)) => {
                if self.amend.message.input(key) {
                    self.amend.error = None;
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn leave_head_flow(&mut self) {
        self.head = None;
        self.amend = AmendDraft::default();
        self.state = AppState::FileList;
    }

    // ── Cursor and preview ─────────────────────────────────────────────────

    fn move_cursor(&mut self, to: usize) -> Vec<Command> {
        if to == self.cursor {
            return Vec::new();
        }
        self.cursor = to;
        self.sync_preview()
    }

    fn scroll_preview(&mut self, intent: Intent) {
        let rows = self.layout.preview_rows();
        let max = u16::try_from(self.preview.line_count().saturating_sub(usize::from(rows)))
            .unwrap_or(u16::MAX);
        let step = self.settings.scroll_step;
        let scroll = &mut self.preview.scroll;
        *scroll = match intent {
            Intent::MoveUp => scroll.saturating_sub(step),
            Intent::MoveDown => scroll.saturating_add(step),
            Intent::PageUp => scroll.saturating_sub(rows),
            Intent::PageDown => scroll.saturating_add(rows),
            Intent::JumpTop => 0,
            Intent::JumpBottom => max,
            _ => *scroll,
        }
        .min(max);
    }

    /// Point the preview at the entry under the cursor, from cache or by
    /// scheduling a fetch. Nothing is fetched while the pane is hidden.
    fn sync_preview(&mut self) -> Vec<Command> {
        let Some(entry) = self.current_entry() else {
            self.preview = Default::default();
            return Vec::new();
        };
        let (path, category) = (entry.path.clone(), entry.category);

        if self.preview.path.as_deref() != Some(path.as_str()) {
            self.preview.scroll = 0;
        }
        if !self.layout.has_preview() {
            self.preview.path = None;
            self.preview.content.clear();
            return Vec::new();
        }

        if let Some(text) = self.diff_cache.get(&path) {
            self.preview.content = text.to_string();
            self.preview.path = Some(path);
            return Vec::new();
        }
        self.preview.content = LOADING.to_string();
        self.preview.path = Some(path.clone());
        if self.pending_diffs.insert(path.clone()) {
            vec![Command::FetchDiff { path, category }]
        } else {
            Vec::new()
        }
    }

    fn on_resize(&mut self, width: u16, height: u16) -> Vec<Command> {
        self.layout = Layout::new(width, height);
        if !self.layout.has_preview() {
            self.preview_focused = false;
        }
        self.sync_preview()
    }

    fn on_diff(
        &mut self,
        path: String,
        category: FileCategory,
        result: Result<String, GitError>,
    ) -> Vec<Command> {
        self.pending_diffs.remove(&path);
        let current = self
            .current_entry()
            .is_some_and(|e| e.path == path && e.category == category)
            && self.preview.path.as_deref() == Some(path.as_str());
        if !current {
            debug!(%path, "discarding stale preview");
            return Vec::new();
        }
        match result {
            Ok(text) => {
                self.preview.content = text.clone();
                self.diff_cache.insert(path, text);
                Vec::new()
            }
            Err(e) => {
                self.preview.content = format!("Error loading preview: {e}");
                vec![self.set_error(format!("Diff failed: {e}"))]
            }
        }
    }

    /// Forget cached previews for paths whose state just changed.
    fn invalidate(&mut self, paths: &[String]) {
        self.diff_cache.invalidate(paths);
        for p in paths {
            self.pending_diffs.remove(p);
        }
        if self
            .preview
            .path
            .as_ref()
            .is_some_and(|p| paths.contains(p))
        {
            self.preview.path = None;
        }
    }

    fn forget_all_previews(&mut self) {
        self.diff_cache.clear();
        self.pending_diffs.clear();
        self.preview.path = None;
    }

    // ── Backend results ────────────────────────────────────────────────────

    fn on_status(
        &mut self,
        generation: u64,
        result: Result<RepoSnapshot, GitError>,
    ) -> Vec<Command> {
        if !self.accept_status(generation) {
            debug!(generation, "discarding stale status");
            return Vec::new();
        }
        match result {
            Ok(snapshot) => {
                debug!(
                    staged = snapshot.staged.len(),
                    unstaged = snapshot.unstaged.len(),
                    untracked = snapshot.untracked.len(),
                    "status refreshed"
                );
                self.snapshot = snapshot;
                self.files.replace(&self.snapshot);
                self.cursor = self.cursor.min(self.files.len().saturating_sub(1));
                self.sync_preview()
            }
            Err(e) => vec![self.set_error(format!("Status failed: {e}"))],
        }
    }

    fn on_staging(
        &mut self,
        paths: Vec<String>,
        result: Result<(), GitError>,
        staging: bool,
    ) -> Vec<Command> {
        self.files.clear_selection();
        self.invalidate(&paths);
        let feedback = match result {
            Ok(()) => {
                let verb = if staging { "Staged" } else { "Unstaged" };
                info!(count = paths.len(), "{verb}");
                self.set_status(format!("{verb} {}", plural(paths.len())))
            }
            Err(e) => {
                let verb = if staging { "Stage" } else { "Unstage" };
                self.set_error(format!("{verb} failed: {e}"))
            }
        };
        vec![feedback, self.refresh_status()]
    }

    fn on_committed(&mut self, result: Result<(), GitError>) -> Vec<Command> {
        match result {
            Ok(()) => {
                info!("commit created");
                self.commit = CommitDraft::default();
                self.state = AppState::FileList;
                self.forget_all_previews();
                vec![
                    self.set_status("Commit created successfully"),
                    self.refresh_status(),
                ]
            }
            Err(e) => {
                if self.state == AppState::Commit(CommitSubstate::Confirm) {
                    self.state = AppState::Commit(CommitSubstate::Date);
                }
                vec![self.set_error(format!("Commit failed: {e}"))]
            }
        }
    }

    fn on_head_info(
        &mut self,
        generation: u64,
        result: Result<HeadInfo, GitError>,
    ) -> Vec<Command> {
        let AppState::ModifyHead(sub) = self.state else {
            debug!("HEAD info arrived outside the HEAD flow; dropped");
            return Vec::new();
        };
        if !self.is_current_head_fetch(generation) {
            debug!(generation, "discarding stale HEAD info");
            return Vec::new();
        }
        match result {
            Ok(info) => {
                if sub == HeadModifySubstate::AmendMessage && self.amend.text().is_empty() {
                    self.amend = AmendDraft::prefilled(&info.subject);
                }
                self.head = Some(info);
                Vec::new()
            }
            Err(e) => {
                self.leave_head_flow();
                vec![self.set_error(format!("Could not read HEAD: {e}"))]
            }
        }
    }

    fn on_amended(&mut self, result: Result<(), GitError>) -> Vec<Command> {
        match result {
            Ok(()) => {
                info!("HEAD message amended");
                self.leave_head_flow();
                // Anything staged was folded into HEAD as well.
                self.forget_all_previews();
                vec![
                    self.set_status("Commit message amended successfully"),
                    self.refresh_status(),
                ]
            }
            Err(e) => {
                if self.state == AppState::ModifyHead(HeadModifySubstate::Amending) {
                    self.state = AppState::ModifyHead(HeadModifySubstate::AmendMessage);
                }
                vec![self.set_error(format!("Amend failed: {e}"))]
            }
        }
    }

    fn on_soft_reset(&mut self, result: Result<(), GitError>) -> Vec<Command> {
        match result {
            Ok(()) => {
                info!("HEAD soft reset");
                self.forget_all_previews();
                vec![
                    self.set_status("HEAD soft reset. Changes staged."),
                    self.refresh_status(),
                ]
            }
            Err(e) => vec![self.set_error(format!("Soft reset failed: {e}"))],
        }
    }
}
