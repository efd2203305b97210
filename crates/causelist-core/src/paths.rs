//! Output path construction from untrusted jurisdiction and date strings.
//!
//! Segments are taken verbatim (spaces and punctuation are legal in court
//! names) and the joined path is normalized lexically. Nothing here touches
//! the filesystem.

use crate::error::{Error, Result};
use crate::selection::Jurisdiction;
use std::path::{Component, Path, PathBuf};

/// Extension of stored cause list files.
const PDF_EXT: &str = "pdf";

/// Suffix of the per-date manifest file name.
const MANIFEST_SUFFIX: &str = "_manifest.json";

/// Suffix of the per-date merged PDF.
const MERGED_SUFFIX: &str = "_merged.pdf";

/// Collapses `.`, `..` and redundant separators without consulting the disk.
///
/// `..` after a normal component cancels it; `..` directly under the root
/// is dropped; leading `..` of a relative path is kept. An empty result
/// becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Joins `segments` under `root` and normalizes the result.
///
/// Segments are not validated: a `..` segment or an absolute segment can
/// take the result outside `root`. Use [`resolve_within`] when the segments
/// come from user input.
pub fn resolve<S: AsRef<str>>(root: &Path, segments: &[S]) -> PathBuf {
    let mut joined = root.to_path_buf();
    for seg in segments {
        joined.push(seg.as_ref());
    }
    normalize(&joined)
}

/// Like [`resolve`], but fails with [`Error::PathEscape`] when the result is
/// not inside the normalized `root`.
pub fn resolve_within<S: AsRef<str>>(root: &Path, segments: &[S]) -> Result<PathBuf> {
    let root = normalize(root);
    let resolved = resolve(&root, segments);
    if is_within(&root, &resolved) {
        Ok(resolved)
    } else {
        Err(Error::PathEscape {
            root,
            path: resolved,
        })
    }
}

fn is_within(root: &Path, candidate: &Path) -> bool {
    if root == Path::new(".") {
        return candidate.is_relative()
            && !matches!(candidate.components().next(), Some(Component::ParentDir));
    }
    candidate.starts_with(root)
}

/// `<root>/<state>/<district>/<court_complex>/<date>/<court>.pdf`
pub fn artifact_path(
    root: &Path,
    jurisdiction: &Jurisdiction,
    date: &str,
    court: &str,
) -> Result<PathBuf> {
    let file_name = format!("{court}.{PDF_EXT}");
    resolve_within(
        root,
        &[
            jurisdiction.state.as_str(),
            jurisdiction.district.as_str(),
            jurisdiction.court_complex.as_str(),
            date,
            file_name.as_str(),
        ],
    )
}

/// `<root>/<date>_manifest.json`
pub fn manifest_path(root: &Path, date: &str) -> Result<PathBuf> {
    resolve_within(root, &[format!("{date}{MANIFEST_SUFFIX}")])
}

/// `<root>/<date>_merged.pdf`.
pub fn merged_path(root: &Path, date: &str) -> Result<PathBuf> {
    resolve_within(root, &[format!("{date}{MERGED_SUFFIX}")])
}

/// Path rendered with forward slashes, as recorded in manifests.
pub fn portable(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
