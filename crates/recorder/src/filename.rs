//! Output filename construction.
//!
//! One file per attempt, named `<timestamp>_<station>[_<name>].<ext>` inside
//! the target directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Second precision, filesystem-safe on every platform (no `:`).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

const DEFAULT_COMPONENT: &str = "recording";

/// Sanitize a user-supplied string for use as a filename component.
pub(crate) fn sanitize_component(input: &str) -> String {
    let invalid = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
    let mut result = String::with_capacity(input.len());

    for c in input.chars() {
        if invalid.contains(&c) || c < ' ' {
            result.push('_');
        } else {
            result.push(c);
        }
    }

    let result = result
        .trim_matches(|c| c == '.' || c == ' ')
        .chars()
        .take(100)
        .collect::<String>();

    if result.is_empty() {
        DEFAULT_COMPONENT.to_owned()
    } else {
        result
    }
}

/// Build the output path for one attempt.
pub(crate) fn output_path(
    target_dir: &Path,
    started_at: DateTime<Local>,
    station: &str,
    name: Option<&str>,
    extension: &str,
) -> PathBuf {
    let mut stem = format!(
        "{}_{}",
        started_at.format(TIMESTAMP_FORMAT),
        sanitize_component(station)
    );
    if let Some(name) = name {
        stem.push('_');
        stem.push_str(&sanitize_component(name));
    }
    target_dir.join(format!("{stem}.{extension}"))
}

/// Variant of `path` with a numeric suffix, used when reconnect attempts
/// land within the same second and the timestamped name already exists.
pub(crate) fn numbered(path: &Path, n: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_COMPONENT);
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{n}.{ext}"),
        None => format!("{stem}_{n}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap()
    }

    #[test]
    fn path_has_timestamp_station_and_extension() {
        let path = output_path(Path::new("/tmp/rec"), at(), "dlf", None, "mp3");
        assert_eq!(
            path,
            PathBuf::from("/tmp/rec/2024-03-01T14-30-05_dlf.mp3")
        );
    }

    #[test]
    fn optional_name_is_appended() {
        let path = output_path(Path::new("/tmp/rec"), at(), "dlf", Some("morning-show"), "ogg");
        assert_eq!(
            path,
            PathBuf::from("/tmp/rec/2024-03-01T14-30-05_dlf_morning-show.ogg")
        );
    }

    #[test]
    fn components_are_sanitized() {
        assert_eq!(sanitize_component("a/b:c"), "a_b_c");
        assert_eq!(sanitize_component("..hidden.."), "hidden");
        assert_eq!(sanitize_component(""), "recording");
        assert_eq!(sanitize_component("///"), "___");
    }

    #[test]
    fn long_components_are_truncated() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_component(&long).len(), 100);
    }

    #[test]
    fn numbered_inserts_suffix_before_extension() {
        let path = PathBuf::from("/tmp/rec/2024-03-01T14-30-05_dlf.mp3");
        assert_eq!(
            numbered(&path, 2),
            PathBuf::from("/tmp/rec/2024-03-01T14-30-05_dlf_2.mp3")
        );
    }
}
