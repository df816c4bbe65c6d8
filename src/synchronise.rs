//! High-level pipeline: orchestrates discovery → conversion → emission for one
//! full export of the remote page tree.
//!
//! This module provides the top-level orchestration logic for "synchronising"
//! the configured root page into the local content directory. It implements a
//! coordinated pipeline that:
//!   - Ensures the content and image directories exist
//!   - Deletes every document from the previous run (full replace, no diffing)
//!   - Walks the remote tree into an ordered list of page records
//!   - Emits each record as a frontmatter-headed markdown file, strictly
//!     sequentially (the slug registry and asset layout are not safe under
//!     concurrent access; serialisation is the chosen discipline)
//!   - Reports whether the working tree changed versus the last committed state
//!
//! # Error Handling
//! A discovery failure is fatal and aborts before any file is written. An
//! individual page's failure is caught at the page boundary and skipped; the
//! run continues and still counts as a success.
//!
//! # Callable From
//! - Used by both the CLI entrypoint and integration tests, with either the
//!   real backend client or mocks behind the capability traits.

use std::fs;
use std::process::Command;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::contract::{AssetFetcher, ContentSource};
use crate::emit::{emit, EmittedDocument};
use crate::slug::SlugRegistry;
use crate::walker::discover;

/// Outcome of one sync run.
#[derive(Debug)]
pub struct SyncReport {
    /// Total pages discovered in the remote tree.
    pub total_pages: usize,
    /// Documents successfully written, in emission order.
    pub written: Vec<EmittedDocument>,
    /// Pages skipped due to per-page failures.
    pub skipped: usize,
    /// Whether the output differs from the last committed state.
    pub changed: bool,
}

/// Run one full synchronisation. See the module docs for the sequence.
pub async fn synchronise(
    config: &Config,
    source: &dyn ContentSource,
    fetcher: &dyn AssetFetcher,
) -> Result<SyncReport, String> {
    info!("Starting sync run");

    fs::create_dir_all(&config.content_dir)
        .map_err(|e| format!("Failed to create content dir {:?}: {e}", config.content_dir))?;
    fs::create_dir_all(&config.images_dir)
        .map_err(|e| format!("Failed to create images dir {:?}: {e}", config.images_dir))?;

    clear_documents(config)?;
    info!(dir = %config.content_dir.display(), "Cleared existing content");

    let records = match discover(source, &config.root_page_id).await {
        Ok(records) => records,
        Err(e) => {
            error!(root = %config.root_page_id, error = ?e, "Tree discovery failed");
            return Err(format!("Tree discovery failed: {e}"));
        }
    };
    info!(pages = records.len(), "Found pages");

    for record in &records {
        let indent = "  ".repeat(record.level as usize);
        let category = record
            .parent_title
            .as_deref()
            .map(|p| format!(" [{}]", p))
            .unwrap_or_default();
        info!(
            "{}- {}{} (level {})",
            indent, record.title, category, record.level
        );
    }

    let mut slugs = SlugRegistry::new();
    let mut written: Vec<EmittedDocument> = Vec::new();

    for record in &records {
        if let Some(doc) = emit(record, source, fetcher, &mut slugs, &config.content_dir).await {
            written.push(doc);
        }
    }

    let skipped = records.len() - written.len();
    info!(written = written.len(), skipped, "Emission complete");

    let changed = has_changes(config);
    if changed {
        info!("Changes detected");
    } else {
        info!("No changes detected");
    }

    Ok(SyncReport {
        total_pages: records.len(),
        written,
        skipped,
        changed,
    })
}

/// Delete every markdown document from the previous run. Full replace: no
/// merging with or diffing against prior content.
fn clear_documents(config: &Config) -> Result<(), String> {
    let entries = fs::read_dir(&config.content_dir)
        .map_err(|e| format!("Failed to read content dir {:?}: {e}", config.content_dir))?;
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read content dir entry: {e}"))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("md") {
            fs::remove_file(&path).map_err(|e| format!("Failed to remove {:?}: {e}", path))?;
        }
    }
    Ok(())
}

/// Compare the working tree to the last committed state. Runs git from inside
/// the content directory so the check works regardless of the process cwd. A
/// failing git invocation is treated as "changed" so callers never miss a
/// publish.
fn has_changes(config: &Config) -> bool {
    let output = Command::new("git")
        .arg("-C")
        .arg(&config.content_dir)
        .arg("status")
        .arg("--porcelain")
        .output();

    match output {
        Ok(out) if out.status.success() => !String::from_utf8_lossy(&out.stdout).trim().is_empty(),
        Ok(out) => {
            warn!(status = ?out.status, "git status exited non-zero, assuming changes");
            true
        }
        Err(e) => {
            warn!(error = ?e, "Failed to run git status, assuming changes");
            true
        }
    }
}
