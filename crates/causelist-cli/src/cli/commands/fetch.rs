//! `causelist fetch` – download one located cause list and record it.

use anyhow::Result;
use causelist_core::config::CauselistConfig;
use causelist_core::events::TracingSink;
use causelist_core::locator::{DirectLink, LocatedPdf};
use causelist_core::manifest::ManifestStore;
use causelist_core::orchestrator::{FetchOrchestrator, FetchOutcome};
use causelist_core::selection::{Jurisdiction, Selection};

use crate::cli::FetchArgs;

pub fn run_fetch(cfg: &CauselistConfig, args: &FetchArgs) -> Result<()> {
    let root = args
        .output_root
        .clone()
        .unwrap_or_else(|| cfg.output_root.clone());
    let selection = Selection {
        jurisdiction: Jurisdiction::new(&args.state, &args.district, &args.court_complex),
        date: args.date.clone(),
        case_type: args.case_type,
    };
    let pdf = LocatedPdf::new(&args.url, &args.court, args.judge.as_deref())?;

    tracing::info!(
        state = %selection.jurisdiction.state,
        district = %selection.jurisdiction.district,
        court_complex = %selection.jurisdiction.court_complex,
        date = %selection.date,
        "fetching {} cause list for {}",
        selection.case_type,
        pdf.court
    );

    let sink = TracingSink;
    let store = ManifestStore::new(&root).with_locking(cfg.lock_manifest);
    let orchestrator = FetchOrchestrator::new(&root, cfg.downloader(), store, &sink);

    // A failed download is reported, not raised: the run itself succeeded.
    match orchestrator.run(&mut DirectLink::new(pdf), &selection)? {
        FetchOutcome::Saved { path, .. } => println!("Saved PDF: {}", path.display()),
        FetchOutcome::Failed { court, .. } => println!("Failed to download PDF for {court}"),
    }
    Ok(())
}
