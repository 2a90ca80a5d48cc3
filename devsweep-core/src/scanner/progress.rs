use std::path::PathBuf;

use super::item::Item;
use crate::error::Result;

/// Live walk statistics, sampled by the consumer
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    /// Directories visited (pruned subtrees are not counted)
    pub dirs_scanned: u64,
    /// Targets emitted so far
    pub items_found: u64,
    /// Sum of resolved target sizes
    pub bytes_found: u64,
    /// Unreadable entries skipped
    pub errors: u64,
    /// Directory most recently visited
    pub current_path: Option<PathBuf>,
}

/// Terminal message of a walk
#[derive(Debug)]
pub struct ScanCompletion {
    pub scanner_id: &'static str,
    pub items_found: u64,
    pub total_size: u64,
    pub directories_scanned: u64,
    /// `Err(Cancelled)` when the walk was stopped early
    pub result: Result<()>,
}

impl ScanCompletion {
    pub fn was_cancelled(&self) -> bool {
        matches!(&self.result, Err(e) if e.is_cancelled())
    }
}

/// One step of stream consumption
#[derive(Debug)]
pub enum ScanEvent {
    /// A target was found
    Discovery(Item),
    /// The walk ended (completed, cancelled, or failed)
    Finished(ScanCompletion),
}
