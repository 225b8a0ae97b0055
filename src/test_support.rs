//! In-memory `Backend` for unit tests. Records every call and keeps a
//! snapshot that stage/unstage/commit mutate the way git would.
use std::collections::HashMap;
use std::sync::Mutex;

use crate::git::{Backend, GitError, HeadInfo, RepoSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Status,
    Stage(Vec<String>),
    Unstage(Vec<String>),
    Diff(String, bool),
    ReadFile(String),
    Commit(String, String),
    Amend(String),
    SoftReset,
    HeadInfo,
}

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    snapshot: Mutex<RepoSnapshot>,
    diffs: Mutex<HashMap<(String, bool), String>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    head: Mutex<Option<HeadInfo>>,
    failure: Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn with_snapshot(snapshot: RepoSnapshot) -> Self {
        let fake = Self::default();
        *fake.snapshot.lock().unwrap() = snapshot;
        fake
    }

    pub fn set_diff(&self, path: &str, staged: bool, text: &str) {
        self.diffs
            .lock()
            .unwrap()
            .insert((path.to_string(), staged), text.to_string());
    }

    pub fn set_file(&self, path: &str, bytes: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes.to_vec());
    }

    pub fn set_head(&self, info: HeadInfo) {
        *self.head.lock().unwrap() = Some(info);
    }

    /// Make every subsequent call fail with `output`.
    pub fn fail_with(&self, output: &str) {
        *self.failure.lock().unwrap() = Some(output.to_string());
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn snapshot(&self) -> RepoSnapshot {
        self.snapshot.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), GitError> {
        let command = format!("{call:?}");
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(output) => Err(GitError::Failed { command, output }),
            None => Ok(()),
        }
    }

    fn rebuild(&self, f: impl FnOnce(&mut Vec<String>, &mut Vec<String>, &mut Vec<String>)) {
        let mut snap = self.snapshot.lock().unwrap();
        let (mut staged, mut unstaged, mut untracked) = (
            std::mem::take(&mut snap.staged),
            std::mem::take(&mut snap.unstaged),
            std::mem::take(&mut snap.untracked),
        );
        f(&mut staged, &mut unstaged, &mut untracked);
        let branch = std::mem::take(&mut snap.branch);
        *snap = RepoSnapshot::new(staged, unstaged, untracked, branch);
    }
}

impl Backend for FakeBackend {
    async fn status(&self) -> Result<RepoSnapshot, GitError> {
        self.record(Call::Status)?;
        Ok(self.snapshot())
    }

    async fn stage(&self, paths: &[String]) -> Result<(), GitError> {
        self.record(Call::Stage(paths.to_vec()))?;
        self.rebuild(|staged, unstaged, untracked| {
            unstaged.retain(|p| !paths.contains(p));
            untracked.retain(|p| !paths.contains(p));
            staged.extend(paths.iter().cloned());
        });
        Ok(())
    }

    async fn unstage(&self, paths: &[String]) -> Result<(), GitError> {
        self.record(Call::Unstage(paths.to_vec()))?;
        self.rebuild(|staged, unstaged, _| {
            staged.retain(|p| !paths.contains(p));
            unstaged.extend(paths.iter().cloned());
        });
        Ok(())
    }

    async fn diff(&self, path: &str, staged: bool) -> Result<String, GitError> {
        self.record(Call::Diff(path.to_string(), staged))?;
        Ok(self
            .diffs
            .lock()
            .unwrap()
            .get(&(path.to_string(), staged))
            .cloned()
            .unwrap_or_default())
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, GitError> {
        self.record(Call::ReadFile(path.to_string()))?;
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| GitError::Io {
                path: path.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }

    async fn commit(&self, message: &str, date: &str) -> Result<(), GitError> {
        self.record(Call::Commit(message.to_string(), date.to_string()))?;
        self.rebuild(|staged, _, _| staged.clear());
        Ok(())
    }

    async fn amend_message(&self, message: &str) -> Result<(), GitError> {
        self.record(Call::Amend(message.to_string()))
    }

    async fn soft_reset_head(&self) -> Result<(), GitError> {
        self.record(Call::SoftReset)
    }

    async fn head_info(&self) -> Result<HeadInfo, GitError> {
        self.record(Call::HeadInfo)?;
        self.head.lock().unwrap().clone().ok_or_else(|| GitError::Failed {
            command: "log".to_string(),
            output: "no HEAD".to_string(),
        })
    }
}

pub fn head(subject: &str) -> HeadInfo {
    HeadInfo {
        hash: "0123456789abcdef".to_string(),
        short_hash: "0123456".to_string(),
        subject: subject.to_string(),
        author: "Test User".to_string(),
        relative_date: "2 minutes ago".to_string(),
        pushed: false,
    }
}
