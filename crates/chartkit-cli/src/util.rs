//! Shared utility functions for CLI commands

use std::path::Path;

/// Format a byte size as a human-readable string
#[must_use]
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// `count` followed by `noun`, with a plural `s` when needed
#[must_use]
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Show `path` relative to `base` when it lives under it
pub fn relative_to<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.00 MB");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "object"), "1 object");
        assert_eq!(plural(0, "object"), "0 objects");
        assert_eq!(plural(3, "file"), "3 files");
    }

    #[test]
    fn test_relative_to() {
        let base = Path::new("/out");
        assert_eq!(relative_to(Path::new("/out/a.yaml"), base), Path::new("a.yaml"));
        assert_eq!(relative_to(Path::new("/elsewhere/b.yaml"), base), Path::new("/elsewhere/b.yaml"));
    }
}
