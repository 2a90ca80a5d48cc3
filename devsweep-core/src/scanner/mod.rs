mod estimate;
mod item;
mod policy;
mod progress;
mod stream;
mod walker;

pub use estimate::{
    Precision, ProgressEstimator, ProgressSnapshot, Zone, classify_zone, estimate_total,
};
pub use item::{ArtifactKind, DeletionResult, DeletionState, Item};
pub use policy::{
    ArtifactScanner, NodeModulesScanner, PodsScanner, ScannerInfo, ScannerKind, UnifiedScanner,
};
pub use progress::{ScanCompletion, ScanEvent, ScanProgress};
pub use stream::ScanStream;
pub use walker::{
    CancellationToken, ScanConfig, WalkCounters, WalkSummary, resolve_home, walk_targets,
};
