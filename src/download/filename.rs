//! File name derivation for downloaded links.

use tracing::debug;
use url::Url;

/// Derives the local file name from the last non-empty segment of `url`'s path.
///
/// The segment is percent-decoded and sanitized so it always names a file
/// directly inside the output folder. The query string and fragment are
/// ignored. Returns `None` when the path has no non-empty segment.
#[must_use]
pub fn file_name_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.rev().find(|segment| !segment.is_empty())?;

    let decoded = urlencoding::decode(last).map_or_else(
        |e| {
            debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
            last.to_string()
        },
        std::borrow::Cow::into_owned,
    );

    Some(sanitize_filename(&decoded))
}

/// Replaces characters that are invalid in file names and neutralizes dot segments.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}
