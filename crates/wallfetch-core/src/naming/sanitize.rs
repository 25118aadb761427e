//! Filesystem-safe file names.

use crate::store::{TEMP_PREFIX, TEMP_SUFFIX};

/// Linux NAME_MAX in bytes.
const NAME_MAX: usize = 255;

/// Longest canonical name whose temp file still fits in `NAME_MAX`.
pub const MAX_FILE_NAME_LEN: usize = NAME_MAX - TEMP_PREFIX.len() - TEMP_SUFFIX.len();

/// Makes a remote file name safe to join onto the destination directory.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Trims leading/trailing dots, spaces and underscores (no hidden files, no `..`)
/// - Limits length to `MAX_FILE_NAME_LEN` bytes on a char boundary
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim_matches(|c| c == '.' || c == '_');

    let mut take = trimmed.len().min(MAX_FILE_NAME_LEN);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
