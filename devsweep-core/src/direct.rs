use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::deletion::remove_path;
use crate::scanner::CancellationToken;
use crate::size::calculate_dir_size;

/// One-shot cache cleanups that need no selection step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectCleanupId {
    NpmCache,
    YarnCache,
    BunCache,
    CocoaPodsCache,
    XcodeCaches,
}

impl DirectCleanupId {
    pub const ALL: [DirectCleanupId; 5] = [
        DirectCleanupId::NpmCache,
        DirectCleanupId::YarnCache,
        DirectCleanupId::BunCache,
        DirectCleanupId::CocoaPodsCache,
        DirectCleanupId::XcodeCaches,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            DirectCleanupId::NpmCache => "npm_cache",
            DirectCleanupId::YarnCache => "yarn_cache",
            DirectCleanupId::BunCache => "bun_cache",
            DirectCleanupId::CocoaPodsCache => "cocoapods_cache",
            DirectCleanupId::XcodeCaches => "xcode",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DirectCleanupId::NpmCache => "Clean npm cache",
            DirectCleanupId::YarnCache => "Clean Yarn cache",
            DirectCleanupId::BunCache => "Clean Bun cache",
            DirectCleanupId::CocoaPodsCache => "Clean CocoaPods cache",
            DirectCleanupId::XcodeCaches => "Clean Xcode caches",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DirectCleanupId::NpmCache => "npm cache cleanup",
            DirectCleanupId::YarnCache => "Yarn v1 and Berry cache cleanup",
            DirectCleanupId::BunCache => "Bun cache cleanup",
            DirectCleanupId::CocoaPodsCache => "CocoaPods cache cleanup",
            DirectCleanupId::XcodeCaches => "Xcode DerivedData and simulator caches cleanup",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DirectCleanupId::NpmCache => "📦",
            DirectCleanupId::YarnCache => "🧶",
            DirectCleanupId::BunCache => "⚡",
            DirectCleanupId::CocoaPodsCache => "🍎",
            DirectCleanupId::XcodeCaches => "🗄",
        }
    }

    /// Directories removed by this cleanup, relative to the home directory
    pub fn relative_targets(&self) -> &'static [&'static str] {
        match self {
            DirectCleanupId::NpmCache => &[".npm"],
            DirectCleanupId::YarnCache => {
                &[".yarn/cache", ".yarn/berry/cache", "Library/Caches/Yarn"]
            }
            DirectCleanupId::BunCache => &[".bun/cache", "Library/Caches/bun"],
            DirectCleanupId::CocoaPodsCache => &["Library/Caches/CocoaPods"],
            DirectCleanupId::XcodeCaches => &[
                "Library/Developer/Xcode/DerivedData",
                "Library/Developer/CoreSimulator/Caches",
            ],
        }
    }

    pub fn targets(&self, home: &Path) -> Vec<PathBuf> {
        self.relative_targets()
            .iter()
            .map(|rel| home.join(rel))
            .collect()
    }
}

/// Outcome of one direct cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectCleanupResult {
    pub id: DirectCleanupId,
    pub description: &'static str,
    pub success: bool,
    pub bytes_freed: u64,
    pub error: Option<String>,
}

/// Measure and remove every existing target of `id` under `home`.
///
/// Targets that do not exist are skipped. A failed removal marks the cleanup
/// failed but the remaining targets are still attempted.
pub fn run_direct_cleanup(id: DirectCleanupId, home: &Path) -> DirectCleanupResult {
    let mut bytes_freed = 0;
    let mut errors = Vec::new();

    for path in id.targets(home) {
        if std::fs::symlink_metadata(&path).is_err() {
            debug!(path = %path.display(), "cleanup target absent");
            continue;
        }

        let size = match calculate_dir_size(&path, &CancellationToken::new()) {
            Ok(size) => size.bytes,
            Err(partial) => partial.partial.bytes,
        };

        match remove_path(&path) {
            Ok(()) => {
                info!(path = %path.display(), size, "cache removed");
                bytes_freed += size;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache removal failed");
                errors.push(e.to_string());
            }
        }
    }

    DirectCleanupResult {
        id,
        description: id.description(),
        success: errors.is_empty(),
        bytes_freed,
        error: (!errors.is_empty()).then(|| errors.join("; ")),
    }
}

/// Run cleanups sequentially, in the given order
pub fn run_direct_cleanups(ids: &[DirectCleanupId], home: &Path) -> Vec<DirectCleanupResult> {
    ids.iter().map(|id| run_direct_cleanup(*id, home)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fake_home() -> tempfile::TempDir {
        tempfile::Builder::new()
            .prefix("devsweep-home")
            .tempdir()
            .unwrap()
    }

    #[test]
    fn test_cleanup_removes_and_measures() {
        let home = fake_home();
        let npm = home.path().join(".npm/_cacache");
        fs::create_dir_all(&npm).unwrap();
        fs::write(npm.join("blob"), vec![0u8; 512]).unwrap();

        let result = run_direct_cleanup(DirectCleanupId::NpmCache, home.path());
        assert!(result.success);
        assert_eq!(result.bytes_freed, 512);
        assert!(!home.path().join(".npm").exists());
    }

    #[test]
    fn test_cleanup_missing_targets_is_success() {
        let home = fake_home();
        let result = run_direct_cleanup(DirectCleanupId::XcodeCaches, home.path());
        assert!(result.success);
        assert_eq!(result.bytes_freed, 0);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_cleanup_sums_every_target() {
        let home = fake_home();
        for rel in [".yarn/cache", ".yarn/berry/cache"] {
            let dir = home.path().join(rel);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("pkg.zip"), vec![0u8; 100]).unwrap();
        }

        let result = run_direct_cleanup(DirectCleanupId::YarnCache, home.path());
        assert_eq!(result.bytes_freed, 200);
    }

    #[test]
    fn test_cleanups_run_in_order() {
        let home = fake_home();
        let ids = [DirectCleanupId::BunCache, DirectCleanupId::NpmCache];
        let results = run_direct_cleanups(&ids, home.path());
        let order: Vec<_> = results.iter().map(|r| r.id).collect();
        assert_eq!(order, ids);
    }
}
