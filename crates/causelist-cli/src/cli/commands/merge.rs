//! `causelist merge <date>` – join the PDFs recorded for a date into one file.

use anyhow::{Context, Result};
use causelist_core::manifest::ManifestStore;
use causelist_core::merge::merge_date;
use std::path::Path;

pub fn run_merge(root: &Path, date: &str) -> Result<()> {
    let store = ManifestStore::new(root);
    let report = merge_date(&store, date)
        .with_context(|| format!("merge cause lists for {date}"))?;
    match report {
        Some(report) => println!(
            "Merged {} PDFs ({} pages) into {}",
            report.files,
            report.pages,
            report.path.display()
        ),
        None => println!("Nothing to merge for {date} under {}.", root.display()),
    }
    Ok(())
}
