//! Resolve → download → record, for one located cause list.

use crate::downloader::Downloader;
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::locator::{LocatedPdf, PdfLocator};
use crate::manifest::{ManifestRecord, ManifestStore};
use crate::paths;
use crate::selection::{Jurisdiction, Selection};
use std::path::PathBuf;

/// What happened to one located PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Stored at `path` and recorded; `record` is the manifest as written.
    Saved {
        path: PathBuf,
        record: ManifestRecord,
    },
    /// Every download attempt failed. The manifest was not touched.
    Failed { court: String, url: String },
}

pub struct FetchOrchestrator<'a> {
    root: PathBuf,
    downloader: Downloader,
    manifest: ManifestStore,
    sink: &'a dyn EventSink,
}

impl<'a> FetchOrchestrator<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        downloader: Downloader,
        manifest: ManifestStore,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            root: root.into(),
            downloader,
            manifest,
            sink,
        }
    }

    /// Downloads `pdf` into the artifact layout and records it for `date`.
    pub fn fetch(
        &self,
        jurisdiction: &Jurisdiction,
        date: &str,
        pdf: &LocatedPdf,
    ) -> Result<FetchOutcome> {
        let dest = paths::artifact_path(&self.root, jurisdiction, date, &pdf.court)?;

        if !self.downloader.download(&pdf.url, &dest, self.sink) {
            return Ok(FetchOutcome::Failed {
                court: pdf.court.clone(),
                url: pdf.url.clone(),
            });
        }

        let record = self.manifest.append(
            date,
            jurisdiction,
            &pdf.court,
            pdf.judge.as_deref(),
            &dest,
            self.sink,
        )?;
        Ok(FetchOutcome::Saved { path: dest, record })
    }

    /// Asks `locator` for the PDF of `selection`, then [`fetch`](Self::fetch)es it.
    pub fn run(
        &self,
        locator: &mut dyn PdfLocator,
        selection: &Selection,
    ) -> Result<FetchOutcome> {
        let pdf = locator
            .locate(selection)?
            .ok_or_else(|| Error::MissingElement("cause list PDF link".to_string()))?;
        self.fetch(&selection.jurisdiction, &selection.date, &pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::locator::DirectLink;
    use crate::retry::RetryPolicy;
    use crate::selection::CaseType;
    use std::time::Duration;

    struct NothingOnPortal;

    impl PdfLocator for NothingOnPortal {
        fn locate(&mut self, _selection: &Selection) -> Result<Option<LocatedPdf>> {
            Ok(None)
        }
    }

    fn selection() -> Selection {
        Selection {
            jurisdiction: Jurisdiction::new("Delhi", "New Delhi", "District Court Complex"),
            date: "16-10-2025".to_string(),
            case_type: CaseType::Criminal,
        }
    }

    fn quick_downloader() -> Downloader {
        Downloader {
            policy: RetryPolicy::new(1, Duration::ZERO),
            ..Downloader::default()
        }
    }

    #[test]
    fn missing_link_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let orch = FetchOrchestrator::new(
            dir.path(),
            quick_downloader(),
            ManifestStore::new(dir.path()),
            &sink,
        );
        let err = orch.run(&mut NothingOnPortal, &selection()).unwrap_err();
        assert!(matches!(err, Error::MissingElement(ref what) if what.contains("PDF link")));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn traversal_in_court_name_is_rejected_before_download() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let orch = FetchOrchestrator::new(
            dir.path().join("output"),
            quick_downloader(),
            ManifestStore::new(dir.path().join("output")),
            &sink,
        );
        let pdf = LocatedPdf::new("http://127.0.0.1:9/x.pdf", "../../../../../evil", None).unwrap();
        let err = orch.run(&mut DirectLink::new(pdf), &selection()).unwrap_err();
        assert!(matches!(err, Error::PathEscape { .. }));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn failed_download_leaves_manifest_absent() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let store = ManifestStore::new(dir.path());
        let orch = FetchOrchestrator::new(dir.path(), quick_downloader(), store.clone(), &sink);
        let pdf = LocatedPdf::new("http://127.0.0.1:9/x.pdf", "Court No.1", None).unwrap();

        let outcome = orch.fetch(&selection().jurisdiction, "16-10-2025", &pdf).unwrap();

        assert_eq!(
            outcome,
            FetchOutcome::Failed {
                court: "Court No.1".to_string(),
                url: "http://127.0.0.1:9/x.pdf".to_string(),
            }
        );
        assert!(store.load("16-10-2025").unwrap().is_none());
    }
}
