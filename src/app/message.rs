//! The closed set of inbound messages and outbound units of work.
use std::time::Duration;

use crossterm::event::KeyEvent;

use crate::git::{FileCategory, GitError, HeadInfo, RepoSnapshot};

// ── Msg: everything the update loop consumes ───────────────────────────────────

#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Echoes the generation of the `RefreshStatus` that produced it.
    StatusLoaded {
        generation: u64,
        result: Result<RepoSnapshot, GitError>,
    },
    /// Preview text for `path` as it was categorised when requested;
    /// possibly stale by the time it arrives.
    DiffLoaded {
        path: String,
        category: FileCategory,
        result: Result<String, GitError>,
    },
    Staged {
        paths: Vec<String>,
        result: Result<(), GitError>,
    },
    Unstaged {
        paths: Vec<String>,
        result: Result<(), GitError>,
    },
    Committed(Result<(), GitError>),
    HeadInfoLoaded {
        generation: u64,
        result: Result<HeadInfo, GitError>,
    },
    Amended(Result<(), GitError>),
    SoftResetDone(Result<(), GitError>),
    /// Clear the status line if it still carries this token.
    StatusExpired(u64),
    ErrorExpired(u64),
}

impl Msg {
    /// True for the result of a backend unit of work.
    pub fn is_backend_result(&self) -> bool {
        !matches!(
            self,
            Self::Key(_) | Self::Resize(..) | Self::StatusExpired(_) | Self::ErrorExpired(_)
        )
    }
}

// ── Command: units of work scheduled by `update` ───────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generations only grow; a result older than one already applied is stale.
    RefreshStatus(u64),
    FetchDiff { path: String, category: FileCategory },
    Stage(Vec<String>),
    Unstage(Vec<String>),
    Commit { message: String, date: String },
    AmendMessage(String),
    SoftReset,
    FetchHeadInfo(u64),
    ExpireStatus { token: u64, after: Duration },
    ExpireError { token: u64, after: Duration },
}

impl Command {
    /// Whether the unit talks to the backend; timers do not count as work.
    pub fn is_backend(&self) -> bool {
        !matches!(self, Self::ExpireStatus { .. } | Self::ExpireError { .. })
    }
}
