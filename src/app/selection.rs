//! Selection model: the file listing derived from a snapshot plus the set of
//! marked list positions.
use std::collections::BTreeSet;

use crate::git::{FileCategory, RepoSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub category: FileCategory,
    /// Mirrors membership in the listing's `SelectionSet`.
    pub selected: bool,
}

/// Sparse set of selected list positions.
///
/// Positions refer to the listing that existed when they were marked and
/// carry no meaning across a snapshot refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    positions: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn contains(&self, pos: usize) -> bool {
        self.positions.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }
}

/// Which backend mutation a confirmed selection turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyPlan {
    Stage(Vec<String>),
    Unstage(Vec<String>),
}

// ── Listing ────────────────────────────────────────────────────────────────────

/// Ordered file entries (unstaged, staged, untracked) with their selection.
/// Every mutation updates the set and the per-entry flags together.
#[derive(Debug, Clone, Default)]
pub struct FileListing {
    entries: Vec<FileEntry>,
    selection: SelectionSet,
}

impl FileListing {
    pub fn from_snapshot(snapshot: &RepoSnapshot) -> Self {
        let entries = snapshot
            .ordered()
            .map(|(path, category)| FileEntry {
                path: path.to_string(),
                category,
                selected: false,
            })
            .collect();
        Self {
            entries,
            selection: SelectionSet::default(),
        }
    }

    /// Rebuild from a fresh snapshot. The selection survives only when the
    /// new listing has exactly the same paths in the same positions.
    pub fn replace(&mut self, snapshot: &RepoSnapshot) {
        let mut next = Self::from_snapshot(snapshot);
        let same_layout = next.entries.len() == self.entries.len()
            && next
                .entries
                .iter()
                .zip(&self.entries)
                .all(|(a, b)| a.path == b.path && a.category == b.category);
        if same_layout {
            for pos in self.selection.iter() {
                next.entries[pos].selected = true;
            }
            next.selection = std::mem::take(&mut self.selection);
        }
        *self = next;
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn get(&self, pos: usize) -> Option<&FileEntry> {
        self.entries.get(pos)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn toggle(&mut self, pos: usize) {
        let Some(entry) = self.entries.get_mut(pos) else { return };
        entry.selected = !entry.selected;
        if entry.selected {
            self.selection.positions.insert(pos);
        } else {
            self.selection.positions.remove(&pos);
        }
    }

    pub fn select_all(&mut self) {
        for (pos, entry) in self.entries.iter_mut().enumerate() {
            entry.selected = true;
            self.selection.positions.insert(pos);
        }
    }

    pub fn clear_selection(&mut self) {
        for pos in std::mem::take(&mut self.selection.positions) {
            if let Some(entry) = self.entries.get_mut(pos) {
                entry.selected = false;
            }
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &FileEntry> + '_ {
        self.selection.iter().filter_map(|pos| self.entries.get(pos))
    }

    /// Decide what applying the selection does.
    ///
    /// Majority rule: when more selected entries are not yet staged than are
    /// staged, stage those; otherwise unstage the staged ones.
    /// Returns `None` for an empty selection.
    pub fn plan_apply(&self) -> Option<ApplyPlan> {
        if self.selection.is_empty() {
            return None;
        }
        let (staged, not_staged): (Vec<&FileEntry>, Vec<&FileEntry>) = self
            .selected()
            .partition(|e| e.category == FileCategory::Staged);
        let paths = |v: Vec<&FileEntry>| -> Vec<String> {
            v.into_iter().map(|e| e.path.clone()).collect()
        };
        if not_staged.len() > staged.len() {
            Some(ApplyPlan::Stage(paths(not_staged)))
        } else {
            Some(ApplyPlan::Unstage(paths(staged)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(unstaged: &[&str], staged: &[&str], untracked: &[&str]) -> RepoSnapshot {
        let own = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        RepoSnapshot::new(own(staged), own(unstaged), own(untracked), "main".into())
    }

    fn flags(listing: &FileListing) -> Vec<bool> {
        listing.entries().iter().map(|e| e.selected).collect()
    }

    #[test]
    fn test_toggle_keeps_flags_in_sync() {
        let mut l = FileListing::from_snapshot(&snapshot(&["a", "b"], &["c"], &[]));
        l.toggle(1);
        assert!(l.selection().contains(1));
        assert_eq!(flags(&l), vec![false, true, false]);
        l.toggle(1);
        assert!(l.selection().is_empty());
        assert_eq!(flags(&l), vec![false, false, false]);
    }

    #[test]
    fn test_toggle_out_of_range_is_ignored() {
        let mut l = FileListing::from_snapshot(&snapshot(&["a"], &[], &[]));
        l.toggle(5);
        assert!(l.selection().is_empty());
    }

    #[test]
    fn test_select_all_then_deselect_all_is_empty() {
        let mut l = FileListing::from_snapshot(&snapshot(&["a", "b"], &["c"], &["d"]));
        l.select_all();
        l.select_all();
        assert_eq!(l.selection().len(), 4);
        l.clear_selection();
        l.clear_selection();
        assert!(l.selection().is_empty());
        assert!(flags(&l).iter().all(|f| !f));
    }

    #[test]
    fn test_plan_stages_when_unstaged_majority() {
        let mut l = FileListing::from_snapshot(&snapshot(&["a", "b"], &["c"], &["d"]));
        l.select_all();
        assert_eq!(
            l.plan_apply(),
            Some(ApplyPlan::Stage(vec!["a".into(), "b".into(), "d".into()]))
        );
    }

    #[test]
    fn test_plan_unstages_on_tie_or_staged_majority() {
        let mut l = FileListing::from_snapshot(&snapshot(&["a"], &["b"], &[]));
        l.select_all();
        assert_eq!(l.plan_apply(), Some(ApplyPlan::Unstage(vec!["b".into()])));
    }

    #[test]
    fn test_plan_empty_selection_is_none() {
        let l = FileListing::from_snapshot(&snapshot(&["a"], &[], &[]));
        assert_eq!(l.plan_apply(), None);
    }

    #[test]
    fn test_replace_keeps_selection_only_for_identical_listing() {
        let snap = snapshot(&["a", "b"], &[], &[]);
        let mut l = FileListing::from_snapshot(&snap);
        l.toggle(0);
        l.replace(&snap);
        assert!(l.selection().contains(0));
        assert!(l.entries()[0].selected);

        l.replace(&snapshot(&["b"], &["a"], &[]));
        assert!(l.selection().is_empty());
        assert!(flags(&l).iter().all(|f| !f));
    }
}
