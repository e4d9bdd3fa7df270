use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::utils::error::BoxResult;

/// Create a directory and any parent directories if they don't exist
pub fn create_directory<P: AsRef<Path>>(path: P) -> BoxResult<()> {
    fs::create_dir_all(path.as_ref())?;
    Ok(())
}

/// Write a file so that readers only ever see the old or the complete new contents.
///
/// The data goes to a temporary file next to the target, which is then
/// renamed over it.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> BoxResult<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_directory(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Copy a file from source to destination
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> BoxResult<u64> {
    if let Some(parent) = to.as_ref().parent() {
        create_directory(parent)?;
    }

    let bytes_copied = fs::copy(from, to)?;
    Ok(bytes_copied)
}

/// Copy a file verbatim, replacing the destination atomically
pub fn copy_file_atomic<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> BoxResult<()> {
    let bytes = fs::read(from.as_ref())?;
    write_file_atomic(to, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_atomic_creates_parents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a/b/c.txt");

        write_file_atomic(&target, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");

        write_file_atomic(&target, b"replaced").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "replaced");
    }

    #[test]
    fn test_copy_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.bin");
        fs::write(&src, [0u8, 159, 146, 150]).unwrap();

        let copied = copy_file(&src, dir.path().join("out/dst.bin")).unwrap();
        assert_eq!(copied, 4);
    }
}
