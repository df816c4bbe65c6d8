//! Document emission: turn one discovered page into a frontmatter-headed
//! markdown file in the content directory.
//!
//! Emission failures are non-fatal by design: a page that fails conversion or
//! writing is logged and skipped, and the run continues with the next page.
//! Partial success is the normal outcome of a sync, not a failure mode.

use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::contract::{AssetFetcher, ContentSource};
use crate::convert::{extract_description, localise_images, DESCRIPTION_MAX_LEN};
use crate::slug::SlugRegistry;
use crate::walker::PageRecord;

/// Name and slug of a successfully written document.
#[derive(Debug, Clone)]
pub struct EmittedDocument {
    pub slug: String,
    pub file_name: String,
}

/// Emit one page record as `<slug>.md` under `content_dir`.
///
/// The slug is assigned from the title before conversion starts, so a page
/// that later fails still consumes its slug; identically-titled pages under
/// different parents deliberately collide and receive suffixed slugs.
///
/// Returns `None` when the page was skipped due to a conversion or write
/// failure.
pub async fn emit(
    record: &PageRecord,
    source: &dyn ContentSource,
    fetcher: &dyn AssetFetcher,
    slugs: &mut SlugRegistry,
    content_dir: &Path,
) -> Option<EmittedDocument> {
    let owner_id = record.id.replace('-', "");
    let slug = slugs.assign_unique(&record.title);

    info!(
        title = %record.title,
        category = record.parent_title.as_deref().unwrap_or(""),
        level = record.level,
        "Processing page"
    );

    let markdown = match source.page_markdown(&record.id).await {
        Ok(markdown) => markdown,
        Err(e) => {
            error!(title = %record.title, error = ?e, "Failed to convert page, skipping");
            return None;
        }
    };

    let body = localise_images(&markdown, &owner_id, fetcher).await;
    let description = extract_description(&body, DESCRIPTION_MAX_LEN);
    let frontmatter = render_frontmatter(record, &owner_id, &description);

    let file_name = format!("{}.md", slug);
    let file_path = content_dir.join(&file_name);
    let full_content = format!("{}{}", frontmatter, body);

    if let Err(e) = fs::write(&file_path, full_content) {
        error!(title = %record.title, path = %file_path.display(), error = ?e, "Failed to write document, skipping");
        return None;
    }

    info!(file = %file_name, "Saved document");
    Some(EmittedDocument { slug, file_name })
}

/// Render the delimited header block, fields in fixed order. Optional fields
/// are omitted when not applicable: root-level pages have no category or
/// parent, and empty tag lists are not written at all.
fn render_frontmatter(record: &PageRecord, owner_id: &str, description: &str) -> String {
    let mut header = String::from("---\n");
    header.push_str(&format!("title: \"{}\"\n", escape_quotes(&record.title)));
    header.push_str(&format!("description: \"{}\"\n", escape_quotes(description)));
    header.push_str(&format!(
        "date: \"{}\"\n",
        escape_quotes(&record.last_edited_time)
    ));
    header.push_str(&format!("notionId: \"{}\"\n", owner_id));

    if let Some(parent_title) = &record.parent_title {
        header.push_str(&format!("category: \"{}\"\n", escape_quotes(parent_title)));
    }

    if !record.tags.is_empty() {
        header.push_str("tags:\n");
        for tag in &record.tags {
            header.push_str(&format!("  - \"{}\"\n", escape_quotes(tag)));
        }
    }

    if !record.hierarchy.is_empty() {
        header.push_str("hierarchy:\n");
        for item in &record.hierarchy {
            header.push_str(&format!("  - \"{}\"\n", escape_quotes(item)));
        }
    }

    if let Some(parent_id) = &record.parent_id {
        header.push_str(&format!("parent: \"{}\"\n", parent_id.replace('-', "")));
    }

    header.push_str(&format!("level: {}\n", record.level));
    header.push_str("---\n\n");
    header
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}
