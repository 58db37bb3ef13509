use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::core::error::{RouteError, RouteResult};

const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1 MiB

/// Hands out source files as lines for the handler locator.
pub trait SourceFiles: Send + Sync {
    fn read_lines(&self, path: &Path) -> RouteResult<Vec<String>>;
}

/// Reads straight from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceFiles;

impl SourceFiles for FsSourceFiles {
    fn read_lines(&self, path: &Path) -> RouteResult<Vec<String>> {
        let content = read_file_smart(path)?;
        Ok(split_lines(&content.text()))
    }
}

pub enum FileContent {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl FileContent {
    /// Contents as text; invalid UTF-8 is replaced rather than rejected
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            FileContent::Mapped(mmap) => String::from_utf8_lossy(mmap),
            FileContent::Buffered(bytes) => String::from_utf8_lossy(bytes),
        }
    }
}

pub fn read_file_smart<P: AsRef<Path>>(path: P) -> RouteResult<FileContent> {
    let path = path.as_ref();
    let wrap = |source| RouteError::SourceFile { path: path.to_path_buf(), source };

    let metadata = std::fs::metadata(path).map_err(wrap)?;

    if metadata.len() > MMAP_THRESHOLD {
        let file = File::open(path).map_err(wrap)?;

        // SAFETY: read-only map of an existing regular file
        let mmap = unsafe { Mmap::map(&file) }.map_err(wrap)?;

        Ok(FileContent::Mapped(mmap))
    } else {
        let bytes = std::fs::read(path).map_err(wrap)?;
        Ok(FileContent::Buffered(bytes))
    }
}

/// LF/CRLF-robust split; a trailing newline does not add an empty line.
pub fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn split_lines_handles_crlf() {
        assert_eq!(split_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn reads_lines_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users_controller.rb");
        std::fs::write(&path, "class UsersController\n  def index\n  end\nend\n").unwrap();

        let lines = FsSourceFiles.read_lines(&path).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "  def index");
    }

    #[test]
    fn large_files_are_mapped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big.rb");
        let body = "# filler\n".repeat((MMAP_THRESHOLD as usize / 9) + 16);
        std::fs::write(&path, format!("{body}def show\n")).unwrap();

        let content = read_file_smart(&path).unwrap();
        assert!(matches!(content, FileContent::Mapped(_)));
        let lines = split_lines(&content.text());
        assert_eq!(lines.last().map(String::as_str), Some("def show"));
    }

    #[test]
    fn missing_file_is_a_source_file_error() {
        let err = FsSourceFiles
            .read_lines(Path::new("/definitely/not/here.rb"))
            .unwrap_err();
        assert!(matches!(err, RouteError::SourceFile { .. }));
    }
}
