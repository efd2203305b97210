//! `causelist show <date>` – print a manifest and the PDFs it lists.

use anyhow::Result;
use causelist_core::manifest::{ManifestRecord, ManifestStore};
use std::io::{self, Write};
use std::path::Path;

pub fn run_show(root: &Path, date: &str) -> Result<()> {
    let store = ManifestStore::new(root);
    match store.load(date)? {
        Some(record) => render_manifest(&mut io::stdout().lock(), &record)?,
        None => println!(
            "No manifest found for {date} under {}. Did the fetch run correctly?",
            store.root().display()
        ),
    }
    Ok(())
}

pub fn render_manifest(out: &mut impl Write, record: &ManifestRecord) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(record)?)?;
    writeln!(out)?;
    if record.downloads.is_empty() {
        writeln!(out, "No PDFs recorded.")?;
        return Ok(());
    }
    writeln!(out, "Downloaded PDFs:")?;
    for item in &record.downloads {
        writeln!(out, "- {}: {}", item.court, item.file)?;
    }
    Ok(())
}
