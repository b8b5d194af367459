//! Write-then-rename for file outputs.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

pub fn assert_not_stdout(path: &Path) -> Result<()> {
    if path == Path::new("-") {
        bail!("stdout is not supported; provide a real file path.");
    }
    Ok(())
}

/// Output file that only appears at `target` once `finish` succeeds.
pub struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    /// Open a temp file next to `target`. Refuses to clobber an existing file unless `force`.
    pub fn open(target: &Path, force: bool) -> Result<Self> {
        assert_not_stdout(target)?;
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .with_context(|| format!("[io::write] create dir {}", parent.display()))?;
        if !force && target.exists() {
            bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
        }
        let tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("[io::write] create temp file in {}", parent.display()))?;

        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Flush, fsync and rename into place.
    pub fn finish(mut self) -> Result<()> {
        self.tmp.flush()
            .with_context(|| format!("[io::write] flush {}", self.target.display()))?;
        self.tmp.as_file().sync_all().ok(); // best-effort fsync file
        self.tmp.persist(&self.target)
            .with_context(|| format!("[io::write] rename to {}", self.target.display()))?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> { self.tmp.write(buf) }

    fn flush(&mut self) -> io::Result<()> { self.tmp.flush() }
}

/// Write `contents` to `target` through a `PendingWrite`.
pub fn write_atomic(target: &Path, force: bool, contents: impl FnOnce(&mut PendingWrite) -> Result<()>) -> Result<()> {
    let mut pending = PendingWrite::open(target, force)?;
    contents(&mut pending)?;
    pending.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_is_rejected() {
        assert!(assert_not_stdout(Path::new("-")).is_err());
        assert!(assert_not_stdout(Path::new("out.geojson")).is_ok());
    }

    #[test]
    fn file_appears_only_after_finish() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.txt");

        let mut pending = PendingWrite::open(&target, false).unwrap();
        writeln!(pending, "hello").unwrap();
        assert!(!target.exists());
        pending.finish().unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "hello\n");
    }

    #[test]
    fn existing_file_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        fs::write(&target, "old").unwrap();

        assert!(write_atomic(&target, false, |w| Ok(write!(w, "new")?)).is_err());
        write_atomic(&target, true, |w| Ok(write!(w, "new")?)).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }
}
