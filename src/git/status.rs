//! Porcelain status parsing and the immutable `RepoSnapshot` built from it.

// ── Categories ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Staged,
    Unstaged,
    Untracked,
}

impl FileCategory {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Staged => "+",
            Self::Unstaged => "-",
            Self::Untracked => "?",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Staged => "staged",
            Self::Unstaged => "unstaged",
            Self::Untracked => "untracked",
        }
    }
}

// ── Snapshot ───────────────────────────────────────────────────────────────────

/// Result of one status query. Replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoSnapshot {
    pub staged: Vec<String>,
    pub unstaged: Vec<String>,
    pub untracked: Vec<String>,
    /// Empty when HEAD is detached.
    pub branch: String,
    pub clean: bool,
}

impl RepoSnapshot {
    pub fn new(
        staged: Vec<String>,
        unstaged: Vec<String>,
        untracked: Vec<String>,
        branch: String,
    ) -> Self {
        let clean = staged.is_empty() && unstaged.is_empty() && untracked.is_empty();
        Self {
            staged,
            unstaged,
            untracked,
            branch,
            clean,
        }
    }

    /// Parse `git status --porcelain=v1 -z -u` output.
    ///
    /// Entries are `XY <path>` separated by NUL. Rename and copy entries are
    /// followed by an extra NUL field holding the source path, which is skipped.
    /// A path lands in exactly one category; the index column wins.
    pub fn parse(output: &str, branch: String) -> Self {
        let mut staged = Vec::new();
        let mut unstaged = Vec::new();
        let mut untracked = Vec::new();

        let mut fields = output.split('\0');
        while let Some(entry) = fields.next() {
            let bytes = entry.as_bytes();
            if bytes.len() < 4 {
                continue;
            }
            let (x, y) = (bytes[0], bytes[1]);
            let Some(path) = entry.get(3..) else { continue };
            let path = path.to_string();

            if matches!(x, b'R' | b'C') {
                fields.next();
            }

            match (x, y) {
                (b'?', b'?') => untracked.push(path),
                (b'!', b'!') => {}
                (x, _) if x != b' ' && x != b'?' => staged.push(path),
                (_, y) if y != b' ' => unstaged.push(path),
                _ => {}
            }
        }

        Self::new(staged, unstaged, untracked, branch)
    }

    /// All paths in display order: unstaged, then staged, then untracked.
    pub fn ordered(&self) -> impl Iterator<Item = (&str, FileCategory)> {
        tagged(&self.unstaged, FileCategory::Unstaged)
            .chain(tagged(&self.staged, FileCategory::Staged))
            .chain(tagged(&self.untracked, FileCategory::Untracked))
    }
}

fn tagged(paths: &[String], cat: FileCategory) -> impl Iterator<Item = (&str, FileCategory)> {
    paths.iter().map(move |p| (p.as_str(), cat))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories() {
        let out = " M src/lib.rs\0M  README.md\0?? notes.txt\0A  new.rs\0 D gone.rs\0";
        let snap = RepoSnapshot::parse(out, "main".to_string());
        assert_eq!(snap.unstaged, vec!["src/lib.rs", "gone.rs"]);
        assert_eq!(snap.staged, vec!["README.md", "new.rs"]);
        assert_eq!(snap.untracked, vec!["notes.txt"]);
        assert_eq!(snap.branch, "main");
        assert!(!snap.clean);
    }

    #[test]
    fn test_partially_staged_counts_as_staged() {
        let snap = RepoSnapshot::parse("MM both.rs\0", String::new());
        assert_eq!(snap.staged, vec!["both.rs"]);
        assert!(snap.unstaged.is_empty());
    }

    #[test]
    fn test_rename_skips_source_field() {
        let out = "R  new_name.rs\0old_name.rs\0 M other.rs\0";
        let snap = RepoSnapshot::parse(out, String::new());
        assert_eq!(snap.staged, vec!["new_name.rs"]);
        assert_eq!(snap.unstaged, vec!["other.rs"]);
        assert!(snap.untracked.is_empty());
    }

    #[test]
    fn test_paths_with_spaces_and_unicode() {
        let out = "?? my file.txt\0 M café/menu.md\0";
        let snap = RepoSnapshot::parse(out, String::new());
        assert_eq!(snap.untracked, vec!["my file.txt"]);
        assert_eq!(snap.unstaged, vec!["café/menu.md"]);
    }

    #[test]
    fn test_empty_output_is_clean() {
        let snap = RepoSnapshot::parse("", "dev".to_string());
        assert!(snap.clean);
        assert_eq!(snap.ordered().count(), 0);
    }

    #[test]
    fn test_ordered_is_unstaged_staged_untracked() {
        let snap = RepoSnapshot::new(
            vec!["s".into()],
            vec!["u".into()],
            vec!["n".into()],
            String::new(),
        );
        let order: Vec<_> = snap.ordered().collect();
        assert_eq!(
            order,
            vec![
                ("u", FileCategory::Unstaged),
                ("s", FileCategory::Staged),
                ("n", FileCategory::Untracked),
            ]
        );
    }
}
