//! Store-path normalization, joining, and reserved-name classification.
//!
//! Internal and display paths are store-relative with no leading slash (`""` is the root). Wire
//! paths used in requests carry exactly one leading slash.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Placeholder file written to materialize an otherwise empty directory.
pub const FOLDER_PLACEHOLDER_NAME: &str = ".keep";
/// Entry-point document expected inside every mini-app directory.
pub const FEATURE_ENTRY_NAME: &str = "index.html";

const DISPLAY_PATH_MAX_CHARS: usize = 20;
const DISPLAY_PATH_TAIL_CHARS: usize = 17;

const WIRE_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Control files at the store root that hold client-side secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedFile {
    /// Secret consulted by the web-access login gate.
    WebAccessSecret,
    /// Secret consulted by the gated-directory prompt.
    AreaGateSecret,
}

impl ReservedFile {
    /// Every reserved control file.
    pub const ALL: [Self; 2] = [Self::WebAccessSecret, Self::AreaGateSecret];

    /// Returns the file name stored at the store root.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::WebAccessSecret => "webpass.txt",
            Self::AreaGateSecret => "hidepass.txt",
        }
    }

    /// Classifies a name or path by its last segment.
    pub fn classify(name_or_path: &str) -> Option<Self> {
        let name = file_name(name_or_path);
        Self::ALL
            .into_iter()
            .find(|reserved| name.eq_ignore_ascii_case(reserved.file_name()))
    }
}

/// Normalizes a store path into its internal form.
///
/// Whitespace is trimmed, backslashes become `/`, empty and `.` segments are dropped, `..` pops
/// the previous segment, and the result has no leading or trailing slash. The root is `""`.
pub fn normalize_store_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let unified = path.trim().replace('\\', "/");
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Returns the request form of `path`: exactly one leading `/`.
pub fn wire_path(path: &str) -> String {
    format!("/{}", normalize_store_path(path))
}

/// Returns [`wire_path`] with every segment percent-encoded for use inside a URL.
pub fn encode_wire_path(path: &str) -> String {
    let normalized = normalize_store_path(path);
    let mut out = String::with_capacity(normalized.len() + 1);
    out.push('/');
    let encoded: Vec<String> = normalized
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| utf8_percent_encode(segment, WIRE_SEGMENT_ENCODE_SET).to_string())
        .collect();
    out.push_str(&encoded.join("/"));
    out
}

/// Joins `segment` onto `base` without producing doubled separators.
pub fn join_store_path(base: &str, segment: &str) -> String {
    let base = normalize_store_path(base);
    let segment = normalize_store_path(segment);
    if base.is_empty() {
        segment
    } else if segment.is_empty() {
        base
    } else {
        format!("{base}/{segment}")
    }
}

/// Returns the parent of `path`, or `None` at the root.
pub fn parent_of(path: &str) -> Option<String> {
    let normalized = normalize_store_path(path);
    if normalized.is_empty() {
        return None;
    }
    Some(match normalized.rfind('/') {
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    })
}

/// Returns the last segment of `path` (empty at the root).
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim().trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Returns `true` when `path` is a top-level entry (its parent is the root).
pub fn is_direct_child_of_root(path: &str) -> bool {
    parent_of(path).is_some_and(|parent| parent.is_empty())
}

/// Returns `true` when `name_or_path` names one of the reserved control files.
pub fn is_reserved_control_file(name_or_path: &str) -> bool {
    ReservedFile::classify(name_or_path).is_some()
}

/// Shortens a location for the path bar: `/` at the root, `...` plus the tail when long.
pub fn display_path(path: &str) -> String {
    let normalized = normalize_store_path(path);
    if normalized.is_empty() {
        return "/".to_string();
    }
    let char_count = normalized.chars().count();
    if char_count <= DISPLAY_PATH_MAX_CHARS {
        return normalized;
    }
    let tail: String = normalized
        .chars()
        .skip(char_count - DISPLAY_PATH_TAIL_CHARS)
        .collect();
    format!("...{tail}")
}

/// Path of the placeholder file that materializes folder `name` under `base`.
pub fn folder_placeholder_path(base: &str, name: &str) -> String {
    join_store_path(&join_store_path(base, name), FOLDER_PLACEHOLDER_NAME)
}

/// Path of the entry-point document for mini-app `name`.
pub fn feature_entry_path(features_dir: &str, name: &str) -> String {
    join_store_path(&join_store_path(features_dir, name), FEATURE_ENTRY_NAME)
}

/// Returns `true` when `name` is usable as a single new path segment.
pub fn is_single_segment(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty()
        && trimmed != "."
        && trimmed != ".."
        && !trimmed.contains(['/', '\\'])
}
