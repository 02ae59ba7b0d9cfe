use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1 MiB

pub enum FileContent {
    Mapped(Mmap),
    Buffered(String),
}

impl FileContent {
    /// Borrow the content as UTF-8, rejecting invalid mapped bytes.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            FileContent::Mapped(mmap) => {
                std::str::from_utf8(mmap).context("file is not valid UTF-8")
            }
            FileContent::Buffered(s) => Ok(s.as_str()),
        }
    }
}

pub fn read_file_smart<P: AsRef<Path>>(path: P) -> Result<FileContent> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;

    if metadata.len() > MMAP_THRESHOLD {
        // Use memory mapping for large files
        let file =
            File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?;

        // Safety: We're only reading the file, not modifying it
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to memory-map {}", path.display()))?;

        Ok(FileContent::Mapped(mmap))
    } else {
        // Read small files into memory
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;

        Ok(FileContent::Buffered(content))
    }
}

/// One source file, read whole and split into lines. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl InputFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = read_file_smart(path)?;
        let text = content
            .as_str()
            .with_context(|| format!("Failed to decode {}", path.display()))?;

        Ok(Self::from_text(path, text))
    }

    /// Split `text` the way editors save it: LF or CRLF, optional BOM.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    /// Path relative to `root` for display, falling back to the full path
    pub fn display_path(&self, root: &Path) -> String {
        self.path
            .strip_prefix(root)
            .unwrap_or(&self.path)
            .display()
            .to_string()
    }
}

/// Replace `path` with `data` atomically: a same-dir temp file is written,
/// synced and persisted, so no truncated destination is left behind on
/// any failure path.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    tmp.write_all(data)
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    tmp.as_file().sync_all()?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_splits_lf_and_crlf() {
        let f = InputFile::from_text("a.cs", "\u{feff}using System;\r\nnamespace A {\n}\n");
        assert_eq!(f.lines, vec!["using System;", "namespace A {", "}"]);
    }

    #[test]
    fn test_read_small_file() -> Result<()> {
        let tmp = tempfile::TempDir::new()?;
        let path = tmp.path().join("x.cs");
        fs::write(&path, "line1\nline2")?;

        let f = InputFile::read(&path)?;
        assert_eq!(f.lines, vec!["line1", "line2"]);
        assert_eq!(f.display_path(tmp.path()), "x.cs");
        Ok(())
    }

    #[test]
    fn test_read_missing_file_fails() {
        assert!(InputFile::read(Path::new("/no/such/file.cs")).is_err());
    }

    #[test]
    fn test_write_atomic_overwrites() -> Result<()> {
        let tmp = tempfile::TempDir::new()?;
        let path = tmp.path().join("out.cs");
        fs::write(&path, "old content that is longer")?;

        write_atomic(&path, b"new")?;
        assert_eq!(fs::read_to_string(&path)?, "new");
        Ok(())
    }

    #[test]
    fn test_write_atomic_missing_dir_leaves_nothing() {
        let path = Path::new("/no/such/dir/out.cs");
        assert!(write_atomic(path, b"data").is_err());
        assert!(!path.exists());
    }
}
