//! Content conversion: rewrite remote image references in a page's markdown to
//! local paths, and derive a plain-text description for the frontmatter.

use regex::Regex;
use tracing::{debug, warn};

use crate::contract::AssetFetcher;

/// Default maximum description length in characters.
pub const DESCRIPTION_MAX_LEN: usize = 150;

fn image_pattern() -> Regex {
    Regex::new(r"!\[([^\]]*)\]\((https?://[^)]+)\)").unwrap()
}

/// Rewrite every remote image reference in `markdown` to a local path.
///
/// Matches are scanned in textual order and numbered from 1; each match is
/// handed to the fetcher, and all substitutions are staged and applied only
/// after the scan completes, so replacement never perturbs the indices of
/// later matches. A failed download leaves that reference byte-identical and
/// logs a warning; the remaining images are still processed.
pub async fn localise_images(
    markdown: &str,
    owner_id: &str,
    fetcher: &dyn AssetFetcher,
) -> String {
    let pattern = image_pattern();
    let mut replacements: Vec<(std::ops::Range<usize>, String)> = Vec::new();

    for (index, captures) in pattern.captures_iter(markdown).enumerate() {
        // Capture 0 is the whole match; it always exists.
        let full_match = captures.get(0).unwrap();
        let alt_text = &captures[1];
        let image_url = &captures[2];
        let asset_index = index + 1;

        match fetcher.fetch(image_url, owner_id, asset_index).await {
            Ok(local_path) => {
                debug!(url = image_url, local = %local_path, "Staged image replacement");
                replacements.push((
                    full_match.range(),
                    format!("![{}]({})", alt_text, local_path),
                ));
            }
            Err(e) => {
                warn!(url = image_url, error = ?e, "Failed to download image, leaving remote reference");
            }
        }
    }

    // Splice by match position, back to front, so earlier offsets stay valid
    // and byte-identical references elsewhere in the text are never touched.
    let mut result = markdown.to_string();
    for (range, replacement) in replacements.into_iter().rev() {
        result.replace_range(range, &replacement);
    }
    result
}

/// Strip markdown syntax from `text` and truncate to `max_len` characters,
/// appending `...` when truncated.
pub fn extract_description(text: &str, max_len: usize) -> String {
    let headings = Regex::new(r"#{1,6}\s+").unwrap();
    let images = Regex::new(r"!\[[^\]]*\]\([^)]+\)").unwrap();
    let links = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    let code = Regex::new(r"`{1,3}[^`]*`{1,3}").unwrap();
    let emphasis = Regex::new(r"[*_~]").unwrap();
    let newlines = Regex::new(r"\n+").unwrap();

    let plain = headings.replace_all(text, "");
    let plain = images.replace_all(&plain, "");
    let plain = links.replace_all(&plain, "$1");
    let plain = code.replace_all(&plain, "");
    let plain = emphasis.replace_all(&plain, "");
    let plain = newlines.replace_all(&plain, " ");
    let plain = plain.trim();

    if plain.chars().count() <= max_len {
        return plain.to_string();
    }

    let truncated: String = plain.chars().take(max_len).collect();
    format!("{}...", truncated.trim_end())
}
