/// Reading the municipality table from disk.
///
/// `fiscode-core` never touches the filesystem; this module is the only
/// place the binary reads input files. The size limit is checked against
/// file metadata before any bytes are read, and the read itself is capped so
/// a file that grows in the meantime cannot exceed the limit either.
use std::fs::File;
use std::io::{ErrorKind, Read as _};
use std::path::Path;

use crate::error::CliError;

/// Reads `path` into a `String`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) when the file is missing, unreadable,
/// larger than `max_size` bytes, or not valid UTF-8.
pub fn read_text(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file = File::open(path).map_err(|e| io_error(&e, path))?;
    let size = file.metadata().map_err(|e| io_error(&e, path))?.len();
    if size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: size,
        });
    }

    let mut bytes = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
    let read = file
        .take(max_size.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| io_error(&e, path))?;
    if read as u64 > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: read as u64,
        });
    }

    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        source: path.display().to_string(),
        byte_offset: e.utf8_error().valid_up_to(),
    })
}

fn io_error(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}
