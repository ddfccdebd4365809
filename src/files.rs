//! Filesystem access for the per-file tools.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};

/// Absolute paths are kept; relative paths are joined onto `base`.
pub fn resolve(path: &str, base: &Path) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

/// Lexically drop `.` and fold `..` into its parent. Nothing touches the disk.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let pops = matches!(last, Some(Component::Normal(_)));
                // `/..` is `/`
                let at_root = matches!(last, Some(Component::RootDir) | Some(Component::Prefix(_)));
                if pops {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` made absolute against the working directory, then normalized.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    Ok(normalize(&std::env::current_dir()?.join(path)))
}

/// The form paths take inside a report: relative to `base`, forward slashes,
/// no `.` or `..` segments.
///
/// Paths outside `base` keep their full (slash-normalized) form and will
/// simply not match anything in the report.
pub fn report_path(path: &Path, base: &Path) -> String {
    let path = normalize(path);
    let base = normalize(base);
    let relative = path.strip_prefix(&base).unwrap_or(&path);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let mut joined = parts.join("/");
    // Component::RootDir renders as "/" already
    if relative.has_root() && joined.starts_with("//") {
        joined.remove(0);
    }
    joined.replace('\\', "/")
}

fn decode_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Read up to `max_lines` lines of a file. Invalid UTF-8 is replaced, not
/// rejected.
pub async fn read_lines(path: &Path, max_lines: usize) -> io::Result<Vec<String>> {
    let file = tokio::fs::File::open(path).await?;
    let mut reader = BufReader::new(file);
    let mut out = Vec::new();
    let mut buf = Vec::new();
    while out.len() < max_lines {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        out.push(decode_line(&buf));
    }
    Ok(out)
}

pub async fn read_all(path: &Path) -> io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let base = Path::new("/work/project");
        assert_eq!(resolve("src/main.c", base), PathBuf::from("/work/project/src/main.c"));
        assert_eq!(resolve("/etc/hosts", base), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn test_report_path_relative_to_base() {
        let base = Path::new("/work/project");
        let path = Path::new("/work/project/src/lib/b.c");
        assert_eq!(report_path(path, base), "src/lib/b.c");
    }

    #[test]
    fn test_report_path_strips_dot_and_backslashes() {
        let base = Path::new("/work");
        assert_eq!(report_path(Path::new("./src/a.c"), base), "src/a.c");
        assert_eq!(report_path(Path::new("/work/./lib/../src/a.c"), base), "src/a.c");
        assert_eq!(report_path(Path::new("src\\win\\a.c"), base), "src/win/a.c");
    }

    #[test]
    fn test_report_path_outside_base() {
        let base = Path::new("/work/project");
        assert_eq!(report_path(Path::new("/etc/hosts"), base), "/etc/hosts");
    }

    #[tokio::test]
    async fn test_read_lines_limit() {
        let mut f = NamedTempFile::new().unwrap();
        for i in 0..10 {
            writeln!(f, "line {}", i).unwrap();
        }
        let lines = read_lines(f.path(), 3).await.unwrap();
        assert_eq!(lines, vec!["line 0", "line 1", "line 2"]);
        let all = read_lines(f.path(), 100).await.unwrap();
        assert_eq!(all.len(), 10);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        assert!(read_lines(Path::new("/no/such/file.txt"), 5).await.is_err());
        assert!(read_all(Path::new("/no/such/file.txt")).await.is_err());
    }

    #[test]
    fn test_normalize_folds_parent_segments() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../../a/..")), PathBuf::from("../.."));
    }

    #[test]
    fn test_relative_base_matches_absolute_file() {
        let cwd = std::env::current_dir().unwrap();
        let base = absolute(Path::new("./vendor/../project")).unwrap();
        assert_eq!(base, cwd.join("project"));

        let file = cwd.join("project").join("src").join("a.c");
        let resolved = resolve(&file.to_string_lossy(), &base);
        assert_eq!(report_path(&resolved, &base), "src/a.c");
        assert_eq!(report_path(&resolve("src/a.c", &base), &base), "src/a.c");
    }

    #[tokio::test]
    async fn test_non_utf8_content_is_decoded_lossily() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"/* Copyright J\xf6rg */\r\nint x;\n").unwrap();

        let lines = read_lines(f.path(), 10).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("/* Copyright J"));
        assert!(lines[0].contains('\u{FFFD}'));
        assert_eq!(lines[1], "int x;");

        let all = read_all(f.path()).await.unwrap();
        assert!(all.contains("int x;"));
    }
}
