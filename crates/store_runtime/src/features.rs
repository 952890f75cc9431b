//! Installed mini-apps: one directory per app under the features root, each with an
//! `index.html` entry point.

use store_host::{is_single_segment, ListResult};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A mini-app document ready for the isolated viewer.
pub struct FeatureDocument {
    /// Mini-app name (its directory name).
    pub name: String,
    /// Decoded entry-point document.
    pub html: String,
}

/// Extracts mini-app names from a listing of the features root.
///
/// Anything but a directory listing means no mini-apps are installed.
pub fn feature_names(listing: &ListResult) -> Vec<String> {
    match listing {
        ListResult::Entries(entries) => entries
            .iter()
            .filter(|entry| entry.kind.is_directory())
            .map(|entry| entry.name.clone())
            .collect(),
        ListResult::SingleFile(_) | ListResult::Error(_) => Vec::new(),
    }
}

/// Trims `name` and returns it when usable as a mini-app directory name.
pub fn validate_feature_name(name: &str) -> Option<String> {
    is_single_segment(name).then(|| name.trim().to_string())
}

/// Starter document for a new mini-app.
pub fn starter_document(name: &str) -> String {
    format!("<h1>{}</h1>", escape_html(name))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use store_host::{EntryKind, FileContent, StoreEntry};

    use super::*;

    #[test]
    fn only_directories_are_mini_apps() {
        let listing = ListResult::Entries(vec![
            StoreEntry {
                name: "clock".to_string(),
                path: "features/clock".to_string(),
                kind: EntryKind::Directory,
                fingerprint: None,
            },
            StoreEntry {
                name: "README.md".to_string(),
                path: "features/README.md".to_string(),
                kind: EntryKind::File,
                fingerprint: None,
            },
        ]);
        assert_eq!(feature_names(&listing), vec!["clock".to_string()]);
        assert!(feature_names(&ListResult::Error("Not Found".to_string())).is_empty());
        assert!(feature_names(&ListResult::SingleFile(FileContent {
            name: "features".to_string(),
            path: "features".to_string(),
            content: String::new(),
            fingerprint: None,
        }))
        .is_empty());
    }

    #[test]
    fn starter_document_escapes_the_name() {
        assert_eq!(starter_document("Clock"), "<h1>Clock</h1>");
        assert_eq!(
            starter_document("<b>&co</b>"),
            "<h1>&lt;b&gt;&amp;co&lt;/b&gt;</h1>"
        );
    }

    #[test]
    fn names_must_be_single_segments() {
        assert_eq!(validate_feature_name("  clock "), Some("clock".to_string()));
        assert_eq!(validate_feature_name("a/b"), None);
        assert_eq!(validate_feature_name(".."), None);
        assert_eq!(validate_feature_name(""), None);
    }
}
