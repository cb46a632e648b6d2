//! Pending change capture from the working tree using git2.

use std::collections::HashSet;
use std::fmt;

use git2::{Delta, Diff, DiffFormat, DiffOptions, ErrorCode, Repository, Tree};
use tracing::warn;

use crate::error::GitError;

/// Maximum characters (not bytes) of unified diff text kept before truncation.
///
/// The truncation notice appended after the cut is not counted.
pub const MAX_DIFF_LENGTH: usize = 30_000;

/// First line of the notice appended to a truncated diff.
pub const TRUNCATION_NOTICE: &str = "[diff truncated]";

/// Status of a changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "Added"),
            FileStatus::Modified => write!(f, "Modified"),
            FileStatus::Deleted => write!(f, "Deleted"),
            FileStatus::Renamed => write!(f, "Renamed"),
        }
    }
}

/// A file that was changed in the working tree.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    pub path: String,
    pub status: FileStatus,
    /// Old path for renamed files (None for non-rename changes).
    pub old_path: Option<String>,
}

/// The uncommitted changes in the working tree at the moment of capture.
///
/// A clean working tree is represented by an empty change set, never by an
/// error.
#[derive(Debug, Clone, Default)]
pub struct PendingChangeSet {
    pub diff_text: String,
    pub changed_files: Vec<ChangedFile>,
    pub truncated: bool,
    pub additions: usize,
    pub deletions: usize,
}

impl PendingChangeSet {
    /// Build a change set from raw diff text alone.
    ///
    /// Used by providers that only expose the textual diff.
    pub fn from_text(diff_text: impl Into<String>) -> Self {
        Self {
            diff_text: diff_text.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diff_text.is_empty() && self.changed_files.is_empty()
    }
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// `Ok(Some(tree))` for repos with a valid HEAD, or `Err(GitError::DiffFailed)`
/// for real errors (corrupt HEAD, permission issues, missing objects).
pub(crate) fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Collect the working tree diff (staged + unstaged + untracked).
///
/// Merges `diff_tree_to_index` (staged changes) with `diff_index_to_workdir`
/// (unstaged changes including untracked files) to capture all pending changes.
pub fn collect_pending_changes(repo: &Repository) -> Result<PendingChangeSet, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let staged_diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    let mut opts = DiffOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .show_untracked_content(true);
    let unstaged_diff = repo
        .diff_index_to_workdir(None, Some(&mut opts))
        .map_err(GitError::DiffFailed)?;

    Ok(build_change_set(&staged_diff, &unstaged_diff))
}

/// Merge staged and unstaged diffs into a single [`PendingChangeSet`].
fn build_change_set(staged: &Diff<'_>, unstaged: &Diff<'_>) -> PendingChangeSet {
    let mut changed_files = Vec::new();
    collect_files_from_diff(staged, &mut changed_files);
    collect_files_from_diff(unstaged, &mut changed_files);

    changed_files.sort_by(|a, b| a.path.cmp(&b.path));
    changed_files.dedup_by(|a, b| a.path == b.path);

    let mut set = PendingChangeSet {
        changed_files,
        ..Default::default()
    };

    if set.changed_files.is_empty() {
        return set;
    }

    let mut text = DiffText::default();
    text.append(staged, &mut set);
    text.append(unstaged, &mut set);
    text.finish(&mut set);

    set
}

/// Running state while printing patches into the change set.
#[derive(Default)]
struct DiffText {
    chars: usize,
    /// Paths with at least one line in the text.
    shown: HashSet<String>,
    /// Path whose patch was cut part-way.
    cut: Option<String>,
}

impl DiffText {
    /// Append unified diff text from a diff object, respecting the max length.
    fn append(&mut self, diff: &Diff<'_>, set: &mut PendingChangeSet) {
        if set.truncated {
            return;
        }

        let result = diff.print(DiffFormat::Patch, |delta, _hunk, line| {
            if set.truncated {
                return true;
            }

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string());

            let origin = line.origin();
            let prefixed = matches!(origin, '+' | '-' | ' ');
            let content = String::from_utf8_lossy(line.content());
            let width = content.chars().count() + usize::from(prefixed);

            if self.chars + width > MAX_DIFF_LENGTH {
                set.truncated = true;
                self.cut = path;
                return true;
            }

            match origin {
                '+' => set.additions += 1,
                '-' => set.deletions += 1,
                _ => {}
            }

            if prefixed {
                set.diff_text.push(origin);
            }
            set.diff_text.push_str(&content);
            self.chars += width;

            if let Some(path) = path {
                self.shown.insert(path);
            }

            true
        });

        if let Err(e) = result {
            warn!("Failed to collect diff text: {e}");
            set.truncated = true;
        }
    }

    /// Close a truncated diff with a notice naming what the text leaves out.
    fn finish(self, set: &mut PendingChangeSet) {
        if !set.truncated {
            return;
        }

        if !set.diff_text.is_empty() && !set.diff_text.ends_with('\n') {
            set.diff_text.push('\n');
        }
        set.diff_text.push_str(TRUNCATION_NOTICE);
        set.diff_text.push('\n');

        if let Some(cut) = &self.cut {
            set.diff_text.push_str(&format!("Partially shown: {cut}\n"));
        }

        let omitted: Vec<&ChangedFile> = set
            .changed_files
            .iter()
            .filter(|f| !self.shown.contains(&f.path) && self.cut.as_ref() != Some(&f.path))
            .collect();
        if !omitted.is_empty() {
            let mut notice = String::from("Not shown:\n");
            for file in omitted {
                notice.push_str(&format!("- {} ({})\n", file.path, file.status));
            }
            set.diff_text.push_str(&notice);
        }
    }
}

fn collect_files_from_diff(diff: &Diff<'_>, files: &mut Vec<ChangedFile>) {
    for delta in diff.deltas() {
        let status = match delta.status() {
            Delta::Added | Delta::Untracked => FileStatus::Added,
            Delta::Deleted => FileStatus::Deleted,
            Delta::Renamed => FileStatus::Renamed,
            _ => FileStatus::Modified,
        };

        let new_path = delta
            .new_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());
        let old_path = delta
            .old_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());

        let (path, old_path) = match status {
            FileStatus::Renamed => (new_path.clone().or_else(|| old_path.clone()), old_path),
            _ => (new_path.or(old_path), None),
        };

        if let Some(path) = path.filter(|p| !p.is_empty()) {
            files.push(ChangedFile {
                path,
                status,
                old_path,
            });
        }
    }
}
