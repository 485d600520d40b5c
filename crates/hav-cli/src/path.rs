//! Input path validation.

use std::path::{Path, PathBuf};

/// Checks that `path` names an existing regular file.
pub fn validate_input_path(path: &str) -> Result<PathBuf, String> {
    if path.is_empty() {
        return Err("path is empty".to_string());
    }
    let path = PathBuf::from(path);
    let metadata = std::fs::metadata(&path)
        .map_err(|e| format!("{}: {}", sanitize_path_for_error(&path), e))?;
    if !metadata.is_file() {
        return Err(format!("{}: not a regular file", sanitize_path_for_error(&path)));
    }
    Ok(path)
}

/// Returns the file name only, so errors don't echo full local paths.
pub fn sanitize_path_for_error(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<path>".to_string())
}

/// Interprets an artifact's log location as a local file, if it is one.
///
/// `file://` URLs and plain paths resolve relative to `base`; other schemes
/// return `None`.
pub fn local_log_location(location: &str, base: &Path) -> Option<PathBuf> {
    let raw = location.strip_prefix("file://").unwrap_or(location);
    if raw.contains("://") {
        return None;
    }
    let candidate = Path::new(raw);
    let resolved = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    };
    resolved.is_file().then_some(resolved)
}
