use std::path::Path;
use std::time::Duration;

use jwalk::WalkDir;
use thiserror::Error;

use crate::error::SweepError;
use crate::scanner::CancellationToken;

/// Accumulated size of a directory tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirSize {
    /// Sum of apparent file lengths in bytes
    pub bytes: u64,
    /// Number of regular files counted
    pub files: u64,
}

/// A size walk that stopped early, with what it had counted so far
#[derive(Error, Debug)]
#[error("{error} (counted {} files, {} bytes)", partial.files, partial.bytes)]
pub struct PartialSize {
    pub partial: DirSize,
    #[source]
    pub error: SweepError,
}

/// Recursively sum file sizes and count files under `path`.
///
/// Unreadable entries are skipped. Cancellation stops the walk at the next
/// entry and hands back the partial total.
pub fn calculate_dir_size(
    path: &Path,
    cancel: &CancellationToken,
) -> std::result::Result<DirSize, PartialSize> {
    let mut total = DirSize::default();

    if let Err(e) = std::fs::symlink_metadata(path) {
        return Err(PartialSize {
            partial: total,
            error: SweepError::from_io(e, path),
        });
    }

    let walker = WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial);

    for entry in walker {
        if cancel.is_cancelled() {
            return Err(PartialSize {
                partial: total,
                error: SweepError::Cancelled,
            });
        }

        let Ok(entry) = entry else {
            continue;
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(meta) = entry.metadata() {
            total.bytes += meta.len();
            total.files += 1;
        }
    }

    Ok(total)
}

/// Format bytes into human-readable string
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format bytes into short human-readable string (for tight spaces)
pub fn format_size_short(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.0}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Format a number with thousand separators (e.g., 1,234,567)
pub fn format_count(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }

    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format a remaining-time estimate ("42s", "3m 5s", "2h 10m")
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{}s", secs);
    }

    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes < 60 {
        return if seconds > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        };
    }

    let hours = minutes / 60;
    if hours < 24 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        "∞".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_tree() -> tempfile::TempDir {
        tempfile::Builder::new()
            .prefix("devsweep-size")
            .tempdir()
            .unwrap()
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
        assert_eq!(format_size(1024 * 1024 * 1024 * 1024), "1.0 TB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_secs(180)), "3m");
        assert_eq!(format_duration(Duration::from_secs(185)), "3m 5s");
        assert_eq!(format_duration(Duration::from_secs(2 * 3600 + 600)), "2h 10m");
        assert_eq!(format_duration(Duration::from_secs(30 * 3600)), "∞");
    }

    #[test]
    fn test_dir_size_counts_nested_files() {
        let temp = temp_tree();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/one.bin"), vec![0u8; 1000]).unwrap();
        fs::write(temp.path().join("a/b/two.bin"), vec![0u8; 24]).unwrap();

        let size = calculate_dir_size(temp.path(), &CancellationToken::new()).unwrap();
        assert_eq!(size, DirSize { bytes: 1024, files: 2 });
    }

    #[test]
    fn test_dir_size_missing_path() {
        let temp = temp_tree();
        let err = calculate_dir_size(&temp.path().join("gone"), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err.error, SweepError::PathNotFound(_)));
        assert_eq!(err.partial, DirSize::default());
    }

    #[test]
    fn test_dir_size_cancelled_returns_partial() {
        let temp = temp_tree();
        fs::write(temp.path().join("f"), "x").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = calculate_dir_size(temp.path(), &cancel).unwrap_err();
        assert!(err.error.is_cancelled());
    }
}
