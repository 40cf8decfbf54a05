use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Container extensions the downloader is expected to produce.
pub const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "webm"];

/// Extension of transcoded files.
pub const AUDIO_EXTENSION: &str = "mp3";

/// The transient directory downloads and transcodes are written to.
#[derive(Debug, Clone)]
pub struct WorkingArea {
    dir: PathBuf,
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|e| ext.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

impl WorkingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every regular file currently in the working area, sorted by path.
    pub fn artifacts(&self) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn video_files(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .artifacts()?
            .into_iter()
            .filter(|p| has_extension(p, VIDEO_EXTENSIONS))
            .collect())
    }

    pub fn audio_files(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .artifacts()?
            .into_iter()
            .filter(|p| has_extension(p, &[AUDIO_EXTENSION]))
            .collect())
    }
}

/// Path of the audio file transcoded from `video`.
pub fn audio_target(video: &Path) -> PathBuf {
    video.with_extension(AUDIO_EXTENSION)
}

/// Move `file` into `dest_dir` under the same name.
///
/// An existing destination is never overwritten. When a plain rename fails
/// (e.g. across filesystems) the file is copied and the source removed.
pub fn relocate(file: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
    let name = file.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let target = dest_dir.join(name);

    if target.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", target.display()),
        ));
    }

    match fs::rename(file, &target) {
        Ok(()) => Ok(target),
        Err(rename_err) => {
            debug!("Rename failed ({}), falling back to copy", rename_err);
            copy_then_remove(file, target, |p| fs::remove_file(p))
        }
    }
}

/// Copy `file` to `target`, then delete the source with `remove`.
///
/// Once the copy exists the move has succeeded; a source that cannot be
/// removed is left for cleanup.
fn copy_then_remove<R>(file: &Path, target: PathBuf, remove: R) -> io::Result<PathBuf>
where
    R: Fn(&Path) -> io::Result<()>,
{
    if let Err(copy_err) = fs::copy(file, &target) {
        // Don't leave a partial copy behind.
        if let Err(e) = fs::remove_file(&target) {
            debug!("No partial copy to remove at {}: {}", target.display(), e);
        }
        return Err(copy_err);
    }

    if let Err(e) = remove(file) {
        warn!(
            "Copied to {} but could not remove {}: {}",
            target.display(),
            file.display(),
            e
        );
    }

    Ok(target)
}

pub fn purge(file: &Path) -> io::Result<()> {
    fs::remove_file(file)
}
