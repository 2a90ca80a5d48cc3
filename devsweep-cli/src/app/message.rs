use std::path::PathBuf;
use std::sync::Arc;

use devsweep_core::{
    ArtifactScanner, CancellationToken, DeletionResult, DeletionTarget, DirSize,
    DirectCleanupId, DirectCleanupResult, Item, ScanCompletion,
};

/// Results of background work, delivered to the controller one at a time
#[derive(Debug)]
pub enum AppMessage {
    /// The walk found a target
    ItemFound(Item),
    /// The walk ended; no more `ItemFound` for this scan
    ScanFinished(ScanCompletion),
    /// A late size calculation finished for the scan session `session`
    SizeResolved {
        session: u64,
        path: PathBuf,
        size: DirSize,
    },
    /// One deletion step finished
    ItemDeleted(DeletionResult),
    /// Every requested direct cleanup finished
    DirectCleanupFinished(Vec<DirectCleanupResult>),
}

/// Work the controller wants done outside the event loop
pub enum Effect {
    /// Start a walk, replacing any previous one
    StartScan {
        scanner: Arc<dyn ArtifactScanner>,
        root: PathBuf,
        cancel: CancellationToken,
    },
    /// Deliver the next discovery or the completion, exactly once
    PullDiscovery,
    /// Compute an item's size on the size worker. Dropped once `cancel`
    /// fires.
    ResolveSize {
        session: u64,
        path: PathBuf,
        cancel: CancellationToken,
    },
    /// Delete one target
    DeleteItem(DeletionTarget),
    /// Run direct cleanups in order
    RunDirectCleanups(Vec<DirectCleanupId>),
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::StartScan { scanner, root, .. } => f
                .debug_struct("StartScan")
                .field("scanner", &scanner.info().id)
                .field("root", root)
                .finish(),
            Effect::PullDiscovery => f.write_str("PullDiscovery"),
            Effect::ResolveSize { session, path, .. } => f
                .debug_struct("ResolveSize")
                .field("session", session)
                .field("path", path)
                .finish(),
            Effect::DeleteItem(target) => f.debug_tuple("DeleteItem").field(target).finish(),
            Effect::RunDirectCleanups(ids) => {
                f.debug_tuple("RunDirectCleanups").field(ids).finish()
            }
        }
    }
}
