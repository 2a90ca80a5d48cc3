use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use jwalk::{Parallelism, WalkDirGeneric};
use tracing::{debug, info};

use super::item::{ArtifactKind, Item};
use super::policy::ArtifactScanner;
use super::progress::ScanProgress;
use crate::error::{Result, SweepError};

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Capacity of the discovery queue between walker and consumer
    pub queue_capacity: usize,
    /// Compute each target's size during the walk
    pub resolve_sizes: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10,
            resolve_sizes: true,
        }
    }
}

/// The user's home directory, or `/` when it cannot be determined
pub fn resolve_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Cancellation token for stopping scans
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters shared between the walker and whoever watches it
#[derive(Debug, Default)]
pub struct WalkCounters {
    dirs_scanned: AtomicU64,
    items_found: AtomicU64,
    bytes_found: AtomicU64,
    errors: AtomicU64,
    current_path: Mutex<Option<PathBuf>>,
}

impl WalkCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            dirs_scanned: self.dirs_scanned.load(Ordering::Relaxed),
            items_found: self.items_found.load(Ordering::Relaxed),
            bytes_found: self.bytes_found.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            current_path: self.current_path.lock().ok().and_then(|g| g.clone()),
        }
    }

    fn visit(&self, path: &Path) {
        self.dirs_scanned.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut guard) = self.current_path.lock() {
            *guard = Some(path.to_path_buf());
        }
    }
}

/// Totals of a finished walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub items_found: u64,
    pub total_size: u64,
    pub directories_scanned: u64,
    pub errors: u64,
}

/// Per-entry walker state: the artifact kind, set on matched targets
type TargetState = ((), Option<ArtifactKind>);

/// Walk `root` depth-first and hand every target to `emit` as soon as it is
/// found.
///
/// The root itself is always descended. Pruned directories and targets are
/// never entered. Unreadable entries are counted and skipped. When `cancel`
/// fires the walk stops and returns `SweepError::Cancelled`; items already
/// emitted stay with the caller. An `Err` from `emit` stops the walk and is
/// returned as-is.
pub fn walk_targets<F>(
    scanner: &Arc<dyn ArtifactScanner>,
    root: &Path,
    cancel: &CancellationToken,
    config: &ScanConfig,
    counters: &WalkCounters,
    mut emit: F,
) -> Result<WalkSummary>
where
    F: FnMut(Item) -> Result<()>,
{
    let mut summary = WalkSummary::default();

    let policy = Arc::clone(scanner);
    let cancel_for_filter = cancel.clone();
    let walker = WalkDirGeneric::<TargetState>::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(Parallelism::Serial)
        .process_read_dir(move |depth, _dir_path, _state, children| {
            if cancel_for_filter.is_cancelled() {
                children.clear();
                return;
            }
            // jwalk hands the root entry over with no depth; it is never
            // pruned or classified
            if depth.is_none() {
                return;
            }

            // Only directories can be targets; errors stay so they get counted
            children.retain(|child| match child {
                Ok(entry) => {
                    entry.file_type.is_dir()
                        && !policy
                            .should_skip_subtree(&entry.path(), &entry.file_name.to_string_lossy())
                }
                Err(_) => true,
            });

            for entry in children.iter_mut().flatten() {
                let path = entry.path();
                let name = entry.file_name.to_string_lossy().into_owned();
                if let Some(kind) = policy.classify(&path, &name) {
                    entry.client_state = Some(kind);
                    entry.read_children_path = None;
                }
            }
        });

    for entry_result in walker {
        if cancel.is_cancelled() {
            info!(root = %root.display(), found = summary.items_found, "walk cancelled");
            return Err(SweepError::Cancelled);
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                summary.errors += 1;
                counters.errors.fetch_add(1, Ordering::Relaxed);
                continue;
            }
        };

        if entry.depth == 0 || !entry.file_type.is_dir() {
            continue;
        }

        let path = entry.path();
        counters.visit(&path);
        summary.directories_scanned += 1;

        let Some(kind) = entry.client_state else {
            continue;
        };

        let mut item = Item::new(path.clone(), kind, scanner.resolve_project_context(&path));
        item.last_modified = entry.metadata().ok().and_then(|m| m.modified().ok());

        if config.resolve_sizes
            && let Err(e) = scanner.resolve_size(&mut item, cancel)
        {
            debug!(path = %path.display(), error = %e, "size resolution failed");
        }

        summary.items_found += 1;
        summary.total_size += item.size;
        counters.items_found.fetch_add(1, Ordering::Relaxed);
        counters.bytes_found.fetch_add(item.size, Ordering::Relaxed);

        debug!(path = %path.display(), kind = kind.label(), size = item.size, "target found");
        emit(item)?;
    }

    // Cancellation may have emptied the last directory listing
    if cancel.is_cancelled() {
        return Err(SweepError::Cancelled);
    }

    info!(
        root = %root.display(),
        found = summary.items_found,
        dirs = summary.directories_scanned,
        "walk complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::policy::{NodeModulesScanner, PodsScanner, UnifiedScanner};
    use std::fs;
    use tempfile::TempDir;

    fn temp_root() -> TempDir {
        tempfile::Builder::new()
            .prefix("devsweep-walk")
            .tempdir()
            .unwrap()
    }

    fn collect(scanner: Arc<dyn ArtifactScanner>, root: &Path) -> (Vec<Item>, Result<WalkSummary>) {
        let mut items = Vec::new();
        let counters = WalkCounters::new();
        let result = walk_targets(
            &scanner,
            root,
            &CancellationToken::new(),
            &ScanConfig::default(),
            &counters,
            |item| {
                items.push(item);
                Ok(())
            },
        );
        (items, result)
    }

    #[test]
    fn test_walk_empty_dir() {
        let temp = temp_root();
        let (items, result) = collect(Arc::new(NodeModulesScanner), temp.path());
        assert!(items.is_empty());
        assert_eq!(result.unwrap().items_found, 0);
    }

    #[test]
    fn test_root_named_like_skipped_dir_is_walked() {
        let temp = temp_root();
        for name in ["build", "tmp", "Library"] {
            let root = temp.path().join(name);
            fs::create_dir_all(root.join("app/node_modules")).unwrap();

            let (items, result) = collect(Arc::new(NodeModulesScanner), &root);
            assert_eq!(items.len(), 1, "root {name}");
            assert_eq!(items[0].path, root.join("app/node_modules"));
            assert_eq!(result.unwrap().directories_scanned, 2);
        }
    }

    #[test]
    fn test_root_named_node_modules_is_descended_not_classified() {
        let temp = temp_root();
        let root = temp.path().join("node_modules");
        fs::create_dir_all(root.join("app/ios/Pods")).unwrap();
        fs::write(root.join("app/ios/Podfile"), "").unwrap();

        // The root is no target of its own
        let (items, result) = collect(Arc::new(NodeModulesScanner), &root);
        assert!(items.is_empty());
        assert_eq!(result.unwrap().items_found, 0);

        // and its children are still read
        let (items, _) = collect(Arc::new(PodsScanner), &root);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, root.join("app/ios/Pods"));
    }

    #[test]
    fn test_walk_emits_in_preorder() {
        let temp = temp_root();
        for project in ["b-web", "a-api", "c-app"] {
            fs::create_dir_all(temp.path().join(project).join("node_modules")).unwrap();
        }

        let (items, _) = collect(Arc::new(NodeModulesScanner), temp.path());
        let names: Vec<_> = items
            .iter()
            .map(|i| i.project_context.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a-api", "b-web", "c-app"]);
    }

    #[test]
    fn test_walk_prunes_skipped_dirs() {
        let temp = temp_root();
        fs::create_dir_all(temp.path().join("proj/dist/node_modules")).unwrap();
        fs::create_dir_all(temp.path().join(".git/node_modules")).unwrap();
        fs::create_dir_all(temp.path().join("proj/node_modules")).unwrap();

        let (items, _) = collect(Arc::new(NodeModulesScanner), temp.path());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, temp.path().join("proj/node_modules"));
    }

    #[test]
    fn test_walk_never_descends_into_targets() {
        let temp = temp_root();
        let outer = temp.path().join("ios/node_modules");
        fs::create_dir_all(outer.join("pkg/ios")).unwrap();
        fs::write(outer.join("pkg/ios/Podfile"), "").unwrap();
        fs::create_dir_all(outer.join("pkg/ios/Pods")).unwrap();

        let scanner: Arc<dyn ArtifactScanner> = Arc::new(UnifiedScanner::standard());
        let (items, _) = collect(scanner, temp.path());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ArtifactKind::NodeModules);
    }

    #[test]
    fn test_walk_records_mtime_and_context() {
        let temp = temp_root();
        fs::create_dir_all(temp.path().join("site/node_modules")).unwrap();
        fs::write(temp.path().join("site/package.json"), "{}").unwrap();

        let (items, _) = collect(Arc::new(NodeModulesScanner), temp.path());
        assert_eq!(items[0].project_context, temp.path().join("site"));
        assert!(items[0].last_modified.is_some());
    }

    #[test]
    fn test_walk_emit_error_stops_walk() {
        let temp = temp_root();
        fs::create_dir_all(temp.path().join("a/node_modules")).unwrap();
        fs::create_dir_all(temp.path().join("b/node_modules")).unwrap();

        let scanner: Arc<dyn ArtifactScanner> = Arc::new(NodeModulesScanner);
        let mut seen = 0;
        let result = walk_targets(
            &scanner,
            temp.path(),
            &CancellationToken::new(),
            &ScanConfig::default(),
            &WalkCounters::new(),
            |_| {
                seen += 1;
                Err(SweepError::Cancelled)
            },
        );
        assert_eq!(seen, 1);
        assert!(result.unwrap_err().is_cancelled());
    }

    #[test]
    fn test_walk_missing_root_is_empty() {
        let temp = temp_root();
        let (items, result) = collect(Arc::new(NodeModulesScanner), &temp.path().join("nope"));
        assert!(items.is_empty());
        assert_eq!(result.unwrap().items_found, 0);
    }

    #[test]
    fn test_counters_track_progress() {
        let temp = temp_root();
        fs::create_dir_all(temp.path().join("x/y")).unwrap();
        fs::create_dir_all(temp.path().join("x/node_modules")).unwrap();

        let scanner: Arc<dyn ArtifactScanner> = Arc::new(NodeModulesScanner);
        let counters = WalkCounters::new();
        walk_targets(
            &scanner,
            temp.path(),
            &CancellationToken::new(),
            &ScanConfig::default(),
            &counters,
            |_| Ok(()),
        )
        .unwrap();

        let progress = counters.snapshot();
        assert_eq!(progress.dirs_scanned, 3);
        assert_eq!(progress.items_found, 1);
        assert!(progress.current_path.is_some());
    }
}
