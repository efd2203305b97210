//! Joins the cause lists stored for one date into a single PDF.
//!
//! Each input keeps its own page tree; the merged catalog points at a new
//! root whose kids are those trees, so inherited page attributes survive.

use crate::error::{Error, Result};
use crate::manifest::ManifestStore;
use crate::paths;
use crate::storage;
use lopdf::{dictionary, Document, Object, ObjectId};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub path: PathBuf,
    /// Inputs merged, counting repeated manifest entries.
    pub files: usize,
    pub pages: usize,
}

/// Merges every file listed in the manifest for `date`, in manifest order,
/// into `<root>/<date>_merged.pdf`. `None` when there is nothing to merge.
pub fn merge_date(store: &ManifestStore, date: &str) -> Result<Option<MergeReport>> {
    let Some(record) = store.load(date)? else {
        return Ok(None);
    };
    if record.downloads.is_empty() {
        return Ok(None);
    }
    let inputs: Vec<PathBuf> = record
        .downloads
        .iter()
        .map(|entry| PathBuf::from(&entry.file))
        .collect();
    let output = paths::merged_path(store.root(), date)?;
    let pages = merge_pdfs(&inputs, &output)?;
    tracing::info!(path = %output.display(), files = inputs.len(), pages, "merged cause lists");
    Ok(Some(MergeReport {
        path: output,
        files: inputs.len(),
        pages,
    }))
}

/// Writes the pages of `inputs`, in order, to a new PDF at `output` and
/// returns the page count. The parent directory is created as needed.
pub fn merge_pdfs(inputs: &[PathBuf], output: &Path) -> Result<usize> {
    let pdf_error = |reason: String| Error::Pdf {
        path: output.to_path_buf(),
        reason,
    };
    if inputs.is_empty() {
        return Err(pdf_error("no input files".to_string()));
    }

    let mut merged = Document::with_version("1.5");
    let mut trees = Vec::with_capacity(inputs.len());
    let mut pages = 0;
    for input in inputs {
        let source = load_renumbered(input, merged.max_id + 1)?;
        merged.max_id = source.doc.max_id;
        merged.objects.extend(source.doc.objects);
        trees.push(source.tree);
        pages += source.pages;
    }

    let root_id = merged.new_object_id();
    for &tree in &trees {
        merged
            .get_object_mut(tree)
            .and_then(Object::as_dict_mut)
            .map_err(|e| pdf_error(e.to_string()))?
            .set("Parent", root_id);
    }
    let kids: Vec<Object> = trees.into_iter().map(Object::Reference).collect();
    merged.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => root_id
    });
    merged.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    merged
        .save_to(&mut bytes)
        .map_err(|e| pdf_error(e.to_string()))?;
    storage::ensure_parent(output).map_err(|e| Error::io(output, e))?;
    storage::write_atomic(output, &bytes).map_err(|e| Error::io(output, e))?;
    Ok(pages)
}

struct Source {
    doc: Document,
    /// Root of the input's page tree.
    tree: ObjectId,
    pages: usize,
}

/// Loads `path` with object ids starting at `first_id` and drops its catalog.
fn load_renumbered(path: &Path, first_id: u32) -> Result<Source> {
    let err = |e: lopdf::Error| Error::Pdf {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let mut doc = Document::load(path).map_err(err)?;
    doc.renumber_objects_with(first_id);
    let pages = doc.get_pages().len();
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(err)?;
    let tree = doc
        .get_dictionary(catalog_id)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(err)?;
    doc.objects.remove(&catalog_id);
    Ok(Source { doc, tree, pages })
}
