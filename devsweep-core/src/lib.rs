pub mod deletion;
pub mod direct;
pub mod error;
pub mod scanner;
pub mod size;

pub use deletion::{DeletionRun, DeletionSummary, DeletionTarget, delete_target, remove_path};
pub use direct::{DirectCleanupId, DirectCleanupResult, run_direct_cleanup, run_direct_cleanups};
pub use error::{Result, SweepError};
pub use scanner::{
    ArtifactKind, ArtifactScanner, CancellationToken, DeletionResult, DeletionState, Item,
    Precision, ProgressEstimator, ProgressSnapshot, ScanCompletion, ScanConfig, ScanEvent,
    ScanProgress, ScanStream, ScannerInfo, ScannerKind, Zone, resolve_home, walk_targets,
};
pub use size::{
    DirSize, PartialSize, calculate_dir_size, format_count, format_duration, format_size,
    format_size_short,
};
