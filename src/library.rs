use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only view of the output directory used for deduplication.
#[derive(Debug, Clone)]
pub struct OutputLibrary {
    dir: PathBuf,
}

impl OutputLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True when any output filename contains `video_id`.
    ///
    /// This is a substring test, so an identifier that happens to appear
    /// inside another file's name is reported as present.
    pub fn contains_id(&self, video_id: &str) -> io::Result<bool> {
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().contains(video_id) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True when a file with exactly this basename exists in the output area.
    pub fn contains_file(&self, file_name: &str) -> bool {
        self.dir.join(file_name).exists()
    }
}
