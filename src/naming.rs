//! Filename normalization for downloads with non-ASCII titles.
//!
//! Only the presence of non-ASCII characters is checked; a title in a
//! Latin-script language without accents is never translated.

use crate::error::TunefetchError;
use crate::translate::Translator;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, warn};

/// Characters that cannot appear in a filename on common filesystems.
static RESERVED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:"*?<>|]+"#).expect("Invalid regex"));

/// Result of normalizing one working file.
#[derive(Debug)]
pub enum NormalizeOutcome {
    /// Name is plain ASCII, nothing to do.
    Unchanged,
    Renamed { from: PathBuf, to: PathBuf },
    /// The file keeps its original name.
    TranslationFailed(TunefetchError),
    /// The file keeps its original name.
    RenameFailed { target: PathBuf, error: io::Error },
}

pub fn needs_translation(file_name: &str) -> bool {
    !file_name.is_ascii()
}

/// Strip `\ / : " * ? < > |` and leave every other character untouched.
pub fn sanitize_filename(text: &str) -> String {
    RESERVED_CHARS.replace_all(text, "").into_owned()
}

/// Rename `path` to `new_name` within its own directory, refusing to clobber.
pub fn rename_in_place(path: &Path, new_name: &str) -> io::Result<PathBuf> {
    if new_name.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "translated name is empty",
        ));
    }

    let target = path
        .parent()
        .map(|dir| dir.join(new_name))
        .unwrap_or_else(|| PathBuf::from(new_name));

    if target == path {
        return Ok(target);
    }
    if target.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", target.display()),
        ));
    }

    std::fs::rename(path, &target)?;
    Ok(target)
}

/// Translate a non-ASCII filename and rename the file to the sanitized result.
///
/// The whole filename is translated, extension and trailing video identifier
/// included, so the translator may alter either.
pub async fn normalize_filename(
    path: &Path,
    translator: &dyn Translator,
    target_lang: &str,
) -> NormalizeOutcome {
    let file_name = match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => return NormalizeOutcome::Unchanged,
    };

    info!("Checking {} for non-ASCII characters", file_name);
    if !needs_translation(&file_name) {
        return NormalizeOutcome::Unchanged;
    }

    info!("Translating {} with {}", file_name, translator.name());
    let translated = match translator.translate(&file_name, target_lang).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Translation failed, keeping original name: {}", e);
            return NormalizeOutcome::TranslationFailed(e);
        }
    };

    let sanitized = sanitize_filename(&translated);
    info!("Renaming {} to {}", file_name, sanitized);

    match rename_in_place(path, &sanitized) {
        Ok(to) => NormalizeOutcome::Renamed {
            from: path.to_path_buf(),
            to,
        },
        Err(error) => NormalizeOutcome::RenameFailed {
            target: path.with_file_name(&sanitized),
            error,
        },
    }
}
