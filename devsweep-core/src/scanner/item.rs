use std::path::PathBuf;
use std::time::SystemTime;

/// Which ecosystem an artifact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    NodeModules,
    Pods,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::NodeModules => "node_modules",
            ArtifactKind::Pods => "Pods",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ArtifactKind::NodeModules => "📦",
            ArtifactKind::Pods => "🍎",
        }
    }

    /// Directory name that identifies this artifact
    pub fn dir_name(&self) -> &'static str {
        match self {
            ArtifactKind::NodeModules => "node_modules",
            ArtifactKind::Pods => "Pods",
        }
    }
}

/// Deletion progress of a single item. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionState {
    #[default]
    Unset,
    Pending,
    InProgress,
    Deleted,
    Failed,
}

impl DeletionState {
    fn rank(self) -> u8 {
        match self {
            DeletionState::Unset => 0,
            DeletionState::Pending => 1,
            DeletionState::InProgress => 2,
            DeletionState::Deleted | DeletionState::Failed => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 3
    }
}

/// A discovered artifact directory
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub path: PathBuf,
    /// Bytes; 0 until resolved
    pub size: u64,
    pub last_modified: Option<SystemTime>,
    /// Number of files under the item
    pub item_count: u64,
    pub kind: ArtifactKind,
    /// Best-effort owning project directory, display only
    pub project_context: PathBuf,
    pub selected: bool,
    deletion_state: DeletionState,
}

impl Item {
    pub fn new(path: PathBuf, kind: ArtifactKind, project_context: PathBuf) -> Self {
        Self {
            path,
            size: 0,
            last_modified: None,
            item_count: 0,
            kind,
            project_context,
            selected: false,
            deletion_state: DeletionState::Unset,
        }
    }

    pub fn deletion_state(&self) -> DeletionState {
        self.deletion_state
    }

    /// Move to `next` if that is a forward transition. Returns whether the
    /// state changed.
    pub fn advance(&mut self, next: DeletionState) -> bool {
        if next.rank() > self.deletion_state.rank() {
            self.deletion_state = next;
            true
        } else {
            false
        }
    }

    pub fn is_size_known(&self) -> bool {
        self.size > 0
    }
}

/// Outcome of deleting one item. Immutable once recorded in a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionResult {
    pub path: PathBuf,
    pub size: u64,
    pub success: bool,
    pub error: Option<String>,
}

impl DeletionResult {
    pub fn succeeded(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            success: true,
            error: None,
        }
    }

    pub fn failed(path: PathBuf, size: u64, error: impl Into<String>) -> Self {
        Self {
            path,
            size,
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item::new(
            PathBuf::from("/p/node_modules"),
            ArtifactKind::NodeModules,
            PathBuf::from("/p"),
        )
    }

    #[test]
    fn test_deletion_state_only_moves_forward() {
        let mut item = item();
        assert!(item.advance(DeletionState::Pending));
        assert!(item.advance(DeletionState::InProgress));
        assert!(!item.advance(DeletionState::Pending));
        assert!(item.advance(DeletionState::Failed));
        assert!(!item.advance(DeletionState::Deleted));
        assert!(!item.advance(DeletionState::Unset));
        assert_eq!(item.deletion_state(), DeletionState::Failed);
    }

    #[test]
    fn test_can_skip_straight_to_terminal() {
        let mut item = item();
        assert!(item.advance(DeletionState::Deleted));
        assert!(item.deletion_state().is_terminal());
    }
}
