//! CLI command handlers. Each command is in its own file.

mod checksum;
mod completions;
mod fetch;
mod merge;
mod show;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use fetch::run_fetch;
pub use merge::run_merge;
pub use show::run_show;
#[cfg(test)]
pub use show::render_manifest;
