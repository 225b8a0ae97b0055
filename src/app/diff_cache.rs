//! Preview cache and the preview loader.
//!
//! Every path selected this session gets its preview memoised. A repeat
//! selection returns the cached text instantly with no backend call. Entries
//! are dropped only when stagecraft itself changes the file's state (stage,
//! unstage, commit, reset); edits made by other processes are not tracked.
use std::collections::HashMap;

use crate::git::{Backend, FileCategory, GitError};

pub const BINARY_PLACEHOLDER: &str = "[BINARY] File cannot be previewed";

/// Only this much of a file is inspected for binary content.
const SAMPLE_SIZE: usize = 8 * 1024;
/// Percentage of non-text bytes above which a sample counts as binary.
const NON_TEXT_LIMIT_PCT: usize = 30;

#[derive(Debug, Default)]
pub struct DiffCache {
    entries: HashMap<String, String>,
}

impl DiffCache {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn insert(&mut self, path: String, text: String) {
        self.entries.insert(path, text);
    }

    pub fn invalidate<'a>(&mut self, paths: impl IntoIterator<Item = &'a String>) {
        for p in paths {
            self.entries.remove(p);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ── Binary detection ───────────────────────────────────────────────────────────

fn is_text_byte(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\r' | b' ') || (32..=126).contains(&b) || (128..=191).contains(&b)
}

/// Heuristic: a NUL byte in the first 8 KiB, or more than 30% of those bytes
/// outside printable ASCII, common whitespace and UTF-8 continuation bytes.
pub fn is_binary(data: &[u8]) -> bool {
    let sample = &data[..data.len().min(SAMPLE_SIZE)];
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    let non_text = sample.iter().filter(|&&b| !is_text_byte(b)).count();
    non_text * 100 / sample.len() > NON_TEXT_LIMIT_PCT
}

fn render_raw(bytes: &[u8]) -> String {
    if is_binary(bytes) {
        BINARY_PLACEHOLDER.to_string()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

// ── Loader ─────────────────────────────────────────────────────────────────────

/// Produce the preview text for one file. Runs inside a dispatched unit of work.
///
/// Tracked files show their diff for the given category; when that diff is
/// empty (mode-only change, say) the file content is shown instead. Untracked
/// files always show their content.
pub async fn load_preview<B: Backend>(
    backend: &B,
    path: &str,
    category: FileCategory,
) -> Result<String, GitError> {
    let staged = match category {
        FileCategory::Untracked => return Ok(render_raw(&backend.read_file(path).await?)),
        FileCategory::Staged => true,
        FileCategory::Unstaged => false,
    };

    let diff = backend.diff(path, staged).await?;
    if !diff.trim().is_empty() {
        return Ok(diff);
    }
    match backend.read_file(path).await {
        Ok(bytes) => Ok(render_raw(&bytes)),
        Err(e) => Ok(format!("(File has no changes)\n\nCould not read file: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, FakeBackend};

    #[test]
    fn test_one_nul_byte_is_binary() {
        let mut buf = vec![b'a'; 100];
        buf[50] = 0;
        assert!(is_binary(&buf));
    }

    #[test]
    fn test_printable_ascii_is_text() {
        let buf: Vec<u8> = (0..1000).map(|i| b' ' + (i % 95) as u8).collect();
        assert!(!is_binary(&buf));
    }

    #[test]
    fn test_thirty_five_percent_non_text_is_binary() {
        let mut buf = vec![b'x'; 100];
        for b in buf.iter_mut().take(35) {
            *b = 0x01;
        }
        assert!(is_binary(&buf));
    }

    #[test]
    fn test_thirty_percent_non_text_is_still_text() {
        let mut buf = vec![b'x'; 100];
        for b in buf.iter_mut().take(30) {
            *b = 0xF0;
        }
        assert!(!is_binary(&buf));
    }

    #[test]
    fn test_utf8_text_is_text() {
        assert!(!is_binary("naïve café, résumé\n".as_bytes()));
        assert!(!is_binary(b""));
    }

    #[test]
    fn test_nul_past_sample_window_is_ignored() {
        let mut buf = vec![b'a'; SAMPLE_SIZE + 10];
        buf[SAMPLE_SIZE + 5] = 0;
        assert!(!is_binary(&buf));
    }

    #[test]
    fn test_cache_invalidate_and_clear() {
        let mut cache = DiffCache::default();
        cache.insert("a".into(), "A".into());
        cache.insert("b".into(), "B".into());
        cache.invalidate(&["a".to_string()]);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some("B"));
        cache.clear();
        assert_eq!(cache.get("b"), None);
    }

    #[tokio::test]
    async fn test_tracked_file_uses_category_diff() {
        let fake = FakeBackend::default();
        fake.set_diff("a.rs", true, "+added\n");
        let text = load_preview(&fake, "a.rs", FileCategory::Staged).await.unwrap();
        assert_eq!(text, "+added\n");
        assert_eq!(fake.calls(), vec![Call::Diff("a.rs".into(), true)]);
    }

    #[tokio::test]
    async fn test_empty_diff_falls_back_to_content() {
        let fake = FakeBackend::default();
        fake.set_file("script.sh", b"echo hi\n");
        let text = load_preview(&fake, "script.sh", FileCategory::Unstaged)
            .await
            .unwrap();
        assert_eq!(text, "echo hi\n");
    }

    #[tokio::test]
    async fn test_empty_diff_unreadable_file_gets_placeholder() {
        let fake = FakeBackend::default();
        let text = load_preview(&fake, "gone.rs", FileCategory::Unstaged)
            .await
            .unwrap();
        assert!(text.starts_with("(File has no changes)"));
    }

    #[tokio::test]
    async fn test_untracked_binary_gets_placeholder() {
        let fake = FakeBackend::default();
        fake.set_file("logo.png", &[0x89, b'P', b'N', b'G', 0, 0, 0]);
        let text = load_preview(&fake, "logo.png", FileCategory::Untracked)
            .await
            .unwrap();
        assert_eq!(text, BINARY_PLACEHOLDER);
        assert_eq!(fake.calls(), vec![Call::ReadFile("logo.png".into())]);
    }

    #[tokio::test]
    async fn test_untracked_unreadable_is_an_error() {
        let fake = FakeBackend::default();
        assert!(
            load_preview(&fake, "missing", FileCategory::Untracked)
                .await
                .is_err()
        );
    }
}
