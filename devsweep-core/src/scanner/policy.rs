use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::item::{ArtifactKind, Item};
use super::walker::CancellationToken;
use crate::size::{DirSize, PartialSize, calculate_dir_size};

/// Static description of a scanner, shown in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

const NODE_MODULES_INFO: ScannerInfo = ScannerInfo {
    id: "node_modules",
    name: "Node.js node_modules directories",
    icon: "📦",
    description: "Find and remove node_modules directories from JavaScript projects",
};

const PODS_INFO: ScannerInfo = ScannerInfo {
    id: "pods",
    name: "CocoaPods Pods directories",
    icon: "🍎",
    description: "Find and remove Pods directories from iOS/macOS projects",
};

const UNIFIED_INFO: ScannerInfo = ScannerInfo {
    id: "unified",
    name: "Node.js & CocoaPods directories (unified)",
    icon: "🧹",
    description: "Find and remove both node_modules and Pods directories in one scan",
};

/// Traversal policy for one kind of artifact
pub trait ArtifactScanner: Send + Sync {
    fn info(&self) -> ScannerInfo;

    /// Whether the walk should not descend into this directory
    fn should_skip_subtree(&self, path: &Path, name: &str) -> bool;

    /// Which artifact this directory is, if it is one
    fn classify(&self, path: &Path, name: &str) -> Option<ArtifactKind>;

    fn is_target(&self, path: &Path, name: &str) -> bool {
        self.classify(path, name).is_some()
    }

    /// Owning project directory of a matched artifact
    fn resolve_project_context(&self, path: &Path) -> PathBuf;

    /// Recompute size and file count. On failure the item keeps its old size.
    fn resolve_size(
        &self,
        item: &mut Item,
        cancel: &CancellationToken,
    ) -> std::result::Result<DirSize, PartialSize> {
        let size = calculate_dir_size(&item.path, cancel)?;
        item.size = size.bytes;
        item.item_count = size.files;
        Ok(size)
    }
}

/// Directories that never hold projects
const SYSTEM_DIRS: &[&str] = &[
    "Library",
    "Applications",
    "System",
    "usr",
    "var",
    "tmp",
    "opt",
    "bin",
    "sbin",
    "etc",
];

const VCS_DIRS: &[&str] = &[".git", ".svn", ".hg", ".bzr"];

const MACOS_METADATA_DIRS: &[&str] = &[
    ".DS_Store",
    ".localized",
    ".fseventsd",
    ".Spotlight-V100",
    ".Trashes",
    ".TemporaryItems",
];

const CACHE_DIRS: &[&str] = &[".npm", ".yarn", ".cache", ".temp", ".tmp", ".Trash", ".trash"];

/// Hidden directories that may lead to projects
const KEPT_HIDDEN_DIRS: &[&str] = &[".vscode", ".idea", ".config", ".local", ".ssh", ".docker"];

/// Substrings that mark a hidden directory as development related
const DEV_HINTS: &[&str] = &[
    "workspace",
    "projects",
    "code",
    "dev",
    "development",
    "repos",
    "repositories",
    "src",
    "source",
];

const NODE_BUILD_DIRS: &[&str] = &[
    "build",
    "dist",
    "coverage",
    "target",
    "__pycache__",
    ".pytest_cache",
];

const PODS_SYSTEM_DIRS: &[&str] = &[
    "Library",
    "Applications",
    "System",
    "usr",
    "var",
    "tmp",
    "private",
    "opt",
];

const PODS_BUILD_DIRS: &[&str] = &[
    "build",
    "DerivedData",
    ".build",
    "dist",
    "coverage",
    ".git",
    ".svn",
    "target",
    "node_modules",
];

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

/// True if any ancestor of `path` (not `path` itself) is named `dir_name`
fn is_nested_in(path: &Path, dir_name: &str) -> bool {
    path.parent()
        .map(|parent| {
            parent
                .components()
                .any(|c| c.as_os_str() == std::ffi::OsStr::new(dir_name))
        })
        .unwrap_or(false)
}

fn has_hidden_segment(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(part) => is_hidden(&part.to_string_lossy()),
        _ => false,
    })
}

fn is_system_private(path: &Path, name: &str) -> bool {
    name == "private" && path == Path::new("/private")
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

/// Finds `node_modules` directories of JavaScript projects
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeModulesScanner;

impl NodeModulesScanner {
    pub fn new() -> Self {
        Self
    }

    fn might_contain_projects(name: &str) -> bool {
        let lower = name.to_lowercase();
        DEV_HINTS.iter().any(|hint| lower.contains(hint))
    }
}

impl ArtifactScanner for NodeModulesScanner {
    fn info(&self) -> ScannerInfo {
        NODE_MODULES_INFO
    }

    fn should_skip_subtree(&self, path: &Path, name: &str) -> bool {
        if SYSTEM_DIRS.contains(&name) || is_system_private(path, name) {
            return true;
        }

        if is_nested_in(path, "node_modules") {
            return true;
        }

        if is_hidden(name) {
            if VCS_DIRS.contains(&name)
                || MACOS_METADATA_DIRS.contains(&name)
                || CACHE_DIRS.contains(&name)
            {
                return true;
            }
            if KEPT_HIDDEN_DIRS.contains(&name) {
                return false;
            }
            return !Self::might_contain_projects(name);
        }

        NODE_BUILD_DIRS.contains(&name)
    }

    fn classify(&self, path: &Path, name: &str) -> Option<ArtifactKind> {
        if name != "node_modules" || is_nested_in(path, "node_modules") || has_hidden_segment(path)
        {
            return None;
        }
        Some(ArtifactKind::NodeModules)
    }

    fn resolve_project_context(&self, path: &Path) -> PathBuf {
        // package.json is advisory; the parent is the answer either way
        parent_of(path)
    }
}

/// Finds CocoaPods `Pods` directories next to a Podfile
#[derive(Debug, Default, Clone, Copy)]
pub struct PodsScanner;

impl PodsScanner {
    pub fn new() -> Self {
        Self
    }

    fn has_manifest(pods_path: &Path) -> bool {
        let Some(project) = pods_path.parent() else {
            return false;
        };
        project.join("Podfile").exists() || project.join("Podfile.lock").exists()
    }
}

impl ArtifactScanner for PodsScanner {
    fn info(&self) -> ScannerInfo {
        PODS_INFO
    }

    fn should_skip_subtree(&self, path: &Path, name: &str) -> bool {
        is_hidden(name)
            || PODS_SYSTEM_DIRS.contains(&name)
            || is_nested_in(path, "Pods")
            || PODS_BUILD_DIRS.contains(&name)
    }

    fn classify(&self, path: &Path, name: &str) -> Option<ArtifactKind> {
        if name != "Pods"
            || is_nested_in(path, "Pods")
            || has_hidden_segment(path)
            || !Self::has_manifest(path)
        {
            return None;
        }
        Some(ArtifactKind::Pods)
    }

    fn resolve_project_context(&self, path: &Path) -> PathBuf {
        parent_of(path)
    }
}

/// Runs several scanners in a single pass.
///
/// A directory is a target if any member claims it and is pruned only when
/// every member would prune it.
pub struct UnifiedScanner {
    members: Vec<Arc<dyn ArtifactScanner>>,
    target_names: Vec<&'static str>,
}

impl UnifiedScanner {
    pub fn new(members: Vec<Arc<dyn ArtifactScanner>>, kinds: &[ArtifactKind]) -> Self {
        Self {
            members,
            target_names: kinds.iter().map(|k| k.dir_name()).collect(),
        }
    }

    /// node_modules and Pods together
    pub fn standard() -> Self {
        Self::new(
            vec![Arc::new(NodeModulesScanner), Arc::new(PodsScanner)],
            &[ArtifactKind::NodeModules, ArtifactKind::Pods],
        )
    }

    pub fn members(&self) -> &[Arc<dyn ArtifactScanner>] {
        &self.members
    }
}

impl ArtifactScanner for UnifiedScanner {
    fn info(&self) -> ScannerInfo {
        UNIFIED_INFO
    }

    fn should_skip_subtree(&self, path: &Path, name: &str) -> bool {
        if SYSTEM_DIRS.contains(&name) || is_system_private(path, name) {
            return true;
        }
        if self
            .target_names
            .iter()
            .any(|target| is_nested_in(path, target))
        {
            return true;
        }
        !self.members.is_empty()
            && self
                .members
                .iter()
                .all(|m| m.should_skip_subtree(path, name))
    }

    fn classify(&self, path: &Path, name: &str) -> Option<ArtifactKind> {
        self.members.iter().find_map(|m| m.classify(path, name))
    }

    fn resolve_project_context(&self, path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.members
            .iter()
            .find(|m| m.is_target(path, &name))
            .map(|m| m.resolve_project_context(path))
            .unwrap_or_else(|| parent_of(path))
    }
}

/// Scanner choices offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScannerKind {
    Unified,
    NodeModules,
    Pods,
}

impl ScannerKind {
    pub fn build(self) -> Arc<dyn ArtifactScanner> {
        match self {
            ScannerKind::Unified => Arc::new(UnifiedScanner::standard()),
            ScannerKind::NodeModules => Arc::new(NodeModulesScanner),
            ScannerKind::Pods => Arc::new(PodsScanner),
        }
    }

    pub fn info(self) -> ScannerInfo {
        match self {
            ScannerKind::Unified => UNIFIED_INFO,
            ScannerKind::NodeModules => NODE_MODULES_INFO,
            ScannerKind::Pods => PODS_INFO,
        }
    }

    fn artifact_kinds(self) -> &'static [ArtifactKind] {
        match self {
            ScannerKind::Unified => &[ArtifactKind::NodeModules, ArtifactKind::Pods],
            ScannerKind::NodeModules => &[ArtifactKind::NodeModules],
            ScannerKind::Pods => &[ArtifactKind::Pods],
        }
    }

    /// One scanner covering every requested kind. A single choice is used
    /// as-is; several are folded into one unified pass.
    pub fn combine(kinds: &[ScannerKind]) -> Option<Arc<dyn ArtifactScanner>> {
        match kinds {
            [] => None,
            [single] => Some(single.build()),
            many => {
                let mut artifacts: Vec<ArtifactKind> = Vec::new();
                for kind in many {
                    for artifact in kind.artifact_kinds() {
                        if !artifacts.contains(artifact) {
                            artifacts.push(*artifact);
                        }
                    }
                }
                let members = artifacts
                    .iter()
                    .map(|a| -> Arc<dyn ArtifactScanner> {
                        match a {
                            ArtifactKind::NodeModules => Arc::new(NodeModulesScanner),
                            ArtifactKind::Pods => Arc::new(PodsScanner),
                        }
                    })
                    .collect();
                Some(Arc::new(UnifiedScanner::new(members, &artifacts)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn test_kind_info_matches_built_scanner() {
        for kind in [ScannerKind::Unified, ScannerKind::NodeModules, ScannerKind::Pods] {
            assert_eq!(kind.info(), kind.build().info());
        }
        assert_eq!(ScannerKind::Pods.info().id, "pods");
    }

    #[test]
    fn test_node_skips_system_and_vcs_dirs() {
        let s = NodeModulesScanner;
        assert!(s.should_skip_subtree(&p("/Users/a/Library"), "Library"));
        assert!(s.should_skip_subtree(&p("/Users/a/proj/.git"), ".git"));
        assert!(s.should_skip_subtree(&p("/Users/a/.npm"), ".npm"));
        assert!(s.should_skip_subtree(&p("/Users/a/proj/dist"), "dist"));
        assert!(!s.should_skip_subtree(&p("/Users/a/proj"), "proj"));
    }

    #[test]
    fn test_node_hidden_dirs_selective() {
        let s = NodeModulesScanner;
        assert!(!s.should_skip_subtree(&p("/Users/a/.vscode"), ".vscode"));
        assert!(!s.should_skip_subtree(&p("/Users/a/.my-workspace"), ".my-workspace"));
        assert!(!s.should_skip_subtree(&p("/Users/a/.Dev"), ".Dev"));
        assert!(s.should_skip_subtree(&p("/Users/a/.rustup"), ".rustup"));
    }

    #[test]
    fn test_private_only_skipped_at_root() {
        let s = NodeModulesScanner;
        assert!(s.should_skip_subtree(&p("/private"), "private"));
        assert!(!s.should_skip_subtree(&p("/Users/a/private"), "private"));
    }

    #[test]
    fn test_node_target_rules() {
        let s = NodeModulesScanner;
        assert!(s.is_target(&p("/Users/a/proj/node_modules"), "node_modules"));
        assert!(!s.is_target(
            &p("/Users/a/proj/node_modules/x/node_modules"),
            "node_modules"
        ));
        assert!(!s.is_target(&p("/Users/a/.hidden/proj/node_modules"), "node_modules"));
        assert!(!s.is_target(&p("/Users/a/proj/modules"), "modules"));
    }

    #[test]
    fn test_node_prunes_inside_matched_target() {
        let s = NodeModulesScanner;
        assert!(s.should_skip_subtree(&p("/a/proj/node_modules/lodash"), "lodash"));
    }

    #[test]
    fn test_pods_requires_manifest() {
        let temp = tempfile::Builder::new()
            .prefix("devsweep-pods")
            .tempdir()
            .unwrap();
        let with = temp.path().join("app");
        let without = temp.path().join("other");
        fs::create_dir_all(with.join("Pods")).unwrap();
        fs::create_dir_all(without.join("Pods")).unwrap();
        fs::write(with.join("Podfile.lock"), "").unwrap();

        let s = PodsScanner;
        assert_eq!(
            s.classify(&with.join("Pods"), "Pods"),
            Some(ArtifactKind::Pods)
        );
        assert_eq!(s.classify(&without.join("Pods"), "Pods"), None);
    }

    #[test]
    fn test_pods_skips_every_hidden_dir() {
        let s = PodsScanner;
        assert!(s.should_skip_subtree(&p("/a/.workspace"), ".workspace"));
        assert!(s.should_skip_subtree(&p("/a/node_modules"), "node_modules"));
        assert!(!s.should_skip_subtree(&p("/a/ios"), "ios"));
    }

    #[test]
    fn test_unified_skip_is_permissive() {
        let s = UnifiedScanner::standard();
        // Pods would prune a hidden dev dir, node_modules keeps it
        assert!(!s.should_skip_subtree(&p("/a/.projects"), ".projects"));
        // only Pods prunes DerivedData
        assert!(!s.should_skip_subtree(&p("/a/DerivedData"), "DerivedData"));
        // both prune
        assert!(s.should_skip_subtree(&p("/a/.git"), ".git"));
        assert!(s.should_skip_subtree(&p("/a/Library"), "Library"));
        assert!(s.should_skip_subtree(&p("/a/ios/Pods/Sub"), "Sub"));
    }

    #[test]
    fn test_unified_classifies_by_member() {
        let s = UnifiedScanner::standard();
        assert_eq!(
            s.classify(&p("/a/web/node_modules"), "node_modules"),
            Some(ArtifactKind::NodeModules)
        );
        assert_eq!(s.resolve_project_context(&p("/a/web/node_modules")), p("/a/web"));
    }

    #[test]
    fn test_combine_single_and_many() {
        let single = ScannerKind::combine(&[ScannerKind::Pods]).unwrap();
        assert_eq!(single.info().id, "pods");

        let many = ScannerKind::combine(&[ScannerKind::NodeModules, ScannerKind::Pods]).unwrap();
        assert_eq!(many.info().id, "unified");
        assert!(ScannerKind::combine(&[]).is_none());
    }
}
