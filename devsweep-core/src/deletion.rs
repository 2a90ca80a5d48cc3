use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, SweepError};
use crate::scanner::{CancellationToken, DeletionResult, Item};
use crate::size::calculate_dir_size;

/// One entry of a deletion run, captured when the run starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionTarget {
    pub path: PathBuf,
    pub size: u64,
}

impl From<&Item> for DeletionTarget {
    fn from(item: &Item) -> Self {
        Self {
            path: item.path.clone(),
            size: item.size,
        }
    }
}

/// Remove a file or directory tree.
///
/// The path is checked first so a vanished or unreadable target reports
/// `PathNotFound` / `PermissionDenied` instead of a generic failure. Symlinks
/// are removed, never followed.
pub fn remove_path(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(|e| SweepError::from_io(e, path))?;
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| SweepError::from_io(e, path))
}

/// Delete one target and describe the outcome.
///
/// A target whose size was never resolved is measured right before removal
/// so the ledger records what was actually freed.
pub fn delete_target(target: &DeletionTarget) -> DeletionResult {
    if target.size > 0 {
        return delete_with(target, remove_path);
    }
    let measured = DeletionTarget {
        path: target.path.clone(),
        size: measure(&target.path),
    };
    delete_with(&measured, remove_path)
}

fn measure(path: &Path) -> u64 {
    match calculate_dir_size(path, &CancellationToken::new()) {
        Ok(size) => size.bytes,
        Err(partial) => {
            debug!(path = %path.display(), error = %partial, "size before delete incomplete");
            partial.partial.bytes
        }
    }
}

fn delete_with<F>(target: &DeletionTarget, remover: F) -> DeletionResult
where
    F: FnOnce(&Path) -> Result<()>,
{
    match remover(&target.path) {
        Ok(()) => {
            info!(path = %target.path.display(), size = target.size, "deleted");
            DeletionResult::succeeded(target.path.clone(), target.size)
        }
        Err(e) => {
            warn!(path = %target.path.display(), error = %e, "delete failed");
            DeletionResult::failed(target.path.clone(), target.size, e.to_string())
        }
    }
}

/// Final ledger of a run
#[derive(Debug, Clone, Default)]
pub struct DeletionSummary {
    pub results: Vec<DeletionResult>,
    /// Bytes of successful deletions only
    pub total_freed: u64,
}

impl DeletionSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Deletes a fixed list of targets one at a time.
///
/// The caller pulls a target with [`next_target`](Self::next_target), removes
/// it wherever it likes and hands the outcome back through
/// [`record`](Self::record). Only one target is ever in flight. The target
/// list is frozen at construction. There is no way to abort a run; it ends
/// when every target has a ledger entry.
#[derive(Debug, Clone)]
pub struct DeletionRun {
    targets: Vec<DeletionTarget>,
    next: usize,
    in_flight: bool,
    ledger: Vec<DeletionResult>,
    total_freed: u64,
}

impl DeletionRun {
    pub fn new(targets: Vec<DeletionTarget>) -> Self {
        Self {
            targets,
            next: 0,
            in_flight: false,
            ledger: Vec::new(),
            total_freed: 0,
        }
    }

    /// The next target to delete, or `None` while one is still in flight or
    /// when the run is exhausted
    pub fn next_target(&mut self) -> Option<DeletionTarget> {
        if self.in_flight {
            return None;
        }
        let target = self.targets.get(self.next)?.clone();
        self.in_flight = true;
        Some(target)
    }

    /// Target currently being deleted
    pub fn current(&self) -> Option<&DeletionTarget> {
        self.in_flight
            .then(|| self.targets.get(self.next))
            .flatten()
    }

    /// Append the outcome of the in-flight target. Results for anything else
    /// are ignored and `false` is returned.
    pub fn record(&mut self, result: DeletionResult) -> bool {
        let Some(current) = self.current() else {
            warn!(path = %result.path.display(), "deletion result with nothing in flight");
            return false;
        };
        if current.path != result.path {
            warn!(path = %result.path.display(), "deletion result for unexpected path");
            return false;
        }

        if result.success {
            self.total_freed += result.size;
        }
        self.ledger.push(result);
        self.next += 1;
        self.in_flight = false;
        true
    }

    pub fn is_finished(&self) -> bool {
        !self.in_flight && self.next >= self.targets.len()
    }

    /// `(completed, total)`
    pub fn progress(&self) -> (usize, usize) {
        (self.ledger.len(), self.targets.len())
    }

    pub fn targets(&self) -> &[DeletionTarget] {
        &self.targets
    }

    pub fn ledger(&self) -> &[DeletionResult] {
        &self.ledger
    }

    pub fn total_freed(&self) -> u64 {
        self.total_freed
    }

    pub fn into_summary(self) -> DeletionSummary {
        DeletionSummary {
            results: self.ledger,
            total_freed: self.total_freed,
        }
    }

    /// Delete everything in order without yielding between items
    pub fn run_to_completion<F>(mut self, mut remover: F) -> DeletionSummary
    where
        F: FnMut(&DeletionTarget) -> DeletionResult,
    {
        while let Some(target) = self.next_target() {
            let result = remover(&target);
            if !self.record(result) {
                // A remover that reports the wrong path still consumes the slot
                self.record(DeletionResult::failed(
                    target.path.clone(),
                    target.size,
                    "remover reported a different path",
                ));
            }
        }
        self.into_summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_root() -> TempDir {
        tempfile::Builder::new()
            .prefix("devsweep-delete")
            .tempdir()
            .unwrap()
    }

    fn target(path: PathBuf, size: u64) -> DeletionTarget {
        DeletionTarget { path, size }
    }

    #[test]
    fn test_remove_path_deletes_tree() {
        let temp = temp_root();
        let dir = temp.path().join("node_modules/pkg");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.js"), "x").unwrap();

        remove_path(&temp.path().join("node_modules")).unwrap();
        assert!(!temp.path().join("node_modules").exists());
    }

    #[test]
    fn test_remove_missing_path_is_not_found() {
        let temp = temp_root();
        let err = remove_path(&temp.path().join("gone")).unwrap_err();
        assert!(matches!(err, SweepError::PathNotFound(_)));
    }

    #[test]
    fn test_delete_target_missing_reports_failure() {
        let temp = temp_root();
        let result = delete_target(&target(temp.path().join("gone"), 77));
        assert!(!result.success);
        assert!(result.error.is_some());
        assert_eq!(result.size, 77);
    }

    #[test]
    fn test_unsized_target_is_measured_before_removal() {
        let temp = temp_root();
        let dir = temp.path().join("app/node_modules/pkg");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.js"), vec![b'x'; 4096]).unwrap();
        let path = temp.path().join("app/node_modules");

        let mut run = DeletionRun::new(vec![target(path.clone(), 0)]);
        let next = run.next_target().unwrap();
        let result = delete_target(&next);
        assert!(result.success);
        assert_eq!(result.size, 4096);
        assert!(!path.exists());

        assert!(run.record(result));
        assert_eq!(run.total_freed(), 4096);
    }

    #[test]
    fn test_known_size_is_kept() {
        let temp = temp_root();
        let path = temp.path().join("node_modules");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("a.js"), "abc").unwrap();

        let result = delete_target(&target(path, 900));
        assert!(result.success);
        assert_eq!(result.size, 900);
    }

    #[test]
    fn test_run_one_in_flight() {
        let mut run = DeletionRun::new(vec![
            target(PathBuf::from("/a"), 1),
            target(PathBuf::from("/b"), 2),
        ]);

        let first = run.next_target().unwrap();
        assert!(run.next_target().is_none());
        assert_eq!(run.current(), Some(&first));

        assert!(!run.record(DeletionResult::succeeded(PathBuf::from("/b"), 2)));
        assert!(run.record(DeletionResult::succeeded(PathBuf::from("/a"), 1)));
        assert_eq!(run.progress(), (1, 2));
        assert!(!run.is_finished());

        assert_eq!(run.next_target().unwrap().path, PathBuf::from("/b"));
        assert!(run.record(DeletionResult::failed(PathBuf::from("/b"), 2, "nope")));
        assert!(run.is_finished());
        assert!(run.next_target().is_none());
        assert_eq!(run.total_freed(), 1);
    }

    #[test]
    fn test_record_without_flight_is_ignored() {
        let mut run = DeletionRun::new(vec![target(PathBuf::from("/a"), 1)]);
        assert!(!run.record(DeletionResult::succeeded(PathBuf::from("/a"), 1)));
        assert!(run.ledger().is_empty());
    }

    #[test]
    fn test_empty_run_frees_nothing() {
        let run = DeletionRun::new(Vec::new());
        assert!(run.is_finished());
        let summary = run.run_to_completion(delete_target);
        assert_eq!(summary.total_freed, 0);
        assert!(summary.results.is_empty());
    }

    #[test]
    fn test_run_to_completion_sum_law() {
        let temp = temp_root();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::create_dir_all(&a).unwrap();

        let run = DeletionRun::new(vec![target(a, 1000), target(b, 2000)]);
        let summary = run.run_to_completion(delete_target);

        let expected: u64 = summary
            .results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.size)
            .sum();
        assert_eq!(summary.total_freed, expected);
        assert_eq!(summary.total_freed, 1000);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
    }
}
