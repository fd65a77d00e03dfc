use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use unzipper_core::AppError;
use zip::ZipArchive;

/// Bounds applied while extracting a single archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    pub max_entries: usize,
    /// Total bytes written across all entries
    pub max_total_bytes: u64,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_total_bytes: 1024 * 1024 * 1024,
        }
    }
}

/// What an extraction produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
    pub bytes_written: u64,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Corrupted archive: {0}")]
    Corrupted(String),

    #[error("Unsafe entry path: {0}")]
    UnsafeEntry(String),

    #[error("Archive has {count} entries, limit is {limit}")]
    TooManyEntries { count: usize, limit: usize },

    #[error("Archive expands beyond {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsafeEntry(name) => AppError::UnsafeArchiveEntry(format!(
                "Archive entry '{}' would be written outside the extraction directory",
                name
            )),
            ExtractError::TooManyEntries { count, limit } => AppError::ArchiveTooLarge(format!(
                "Archive has {} entries; the limit is {}",
                count, limit
            )),
            ExtractError::TooLarge { limit } => AppError::ArchiveTooLarge(format!(
                "Archive expands beyond the limit of {} bytes",
                limit
            )),
            other @ (ExtractError::Corrupted(_) | ExtractError::Io { .. }) => {
                AppError::ExtractionFailed(other.to_string())
            }
        }
    }
}

/// Archivers on Windows write `\` as the path separator.
fn normalize_entry_name(name: &str) -> String {
    name.replace('\\', "/")
}

/// Resolve an entry name to a path that stays inside the destination.
///
/// Returns `None` for names with NUL bytes, absolute names and names whose `..` segments
/// climb above the destination.
fn enclosed_path(name: &str) -> Option<PathBuf> {
    if name.contains('\0') {
        return None;
    }

    let path = Path::new(name);
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return None,
            Component::ParentDir => depth = depth.checked_sub(1)?,
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
        }
    }

    Some(path.to_path_buf())
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ExtractError + '_ {
    move |source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Unpack every entry of the ZIP archive at `archive_path` into `dest`.
///
/// `dest` must already exist. `\` separators in entry names are read as `/`. Absolute
/// names and names whose `..` segments escape `dest` fail the whole extraction instead of
/// being written. Later entries with the same name overwrite earlier ones. Nothing is rolled
/// back on failure; the caller owns cleanup of `dest`.
pub fn extract_zip(
    archive_path: &Path,
    dest: &Path,
    limits: &ExtractLimits,
) -> Result<ExtractSummary, ExtractError> {
    let file = fs::File::open(archive_path).map_err(io_err(archive_path))?;
    let mut archive = ZipArchive::new(io::BufReader::new(file))
        .map_err(|e| ExtractError::Corrupted(e.to_string()))?;

    if archive.len() > limits.max_entries {
        return Err(ExtractError::TooManyEntries {
            count: archive.len(),
            limit: limits.max_entries,
        });
    }

    let mut summary = ExtractSummary::default();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ExtractError::Corrupted(e.to_string()))?;

        let name = normalize_entry_name(entry.name());
        let relative = enclosed_path(&name)
            .ok_or_else(|| ExtractError::UnsafeEntry(entry.name().to_string()))?;

        // "./" and similar resolve to the destination itself
        if relative.components().next().is_none() {
            continue;
        }

        let target = dest.join(&relative);

        if entry.is_dir() || name.ends_with('/') {
            fs::create_dir_all(&target).map_err(io_err(&target))?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        let remaining = limits.max_total_bytes.saturating_sub(summary.bytes_written);
        let mut out = fs::File::create(&target).map_err(io_err(&target))?;
        // Count what is actually inflated; header sizes are attacker-controlled.
        let mut limited = (&mut entry).take(remaining.saturating_add(1));
        let written = io::copy(&mut limited, &mut out).map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                ExtractError::Corrupted(format!("{}: {}", relative.display(), e))
            } else {
                ExtractError::Io {
                    path: target.clone(),
                    source: e,
                }
            }
        })?;

        if written > remaining {
            return Err(ExtractError::TooLarge {
                limit: limits.max_total_bytes,
            });
        }

        summary.bytes_written += written;
        summary.files += 1;
    }

    tracing::debug!(
        archive = %archive_path.display(),
        dest = %dest.display(),
        files = summary.files,
        directories = summary.directories,
        bytes_written = summary.bytes_written,
        "Archive extracted"
    );

    Ok(summary)
}
