use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fully resolved settings for one sync run.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Notion integration token (secret, sourced from the environment).
    pub token: String,
    /// Identifier of the page whose descendants are exported.
    pub root_page_id: String,
    /// Directory receiving the `<slug>.md` documents.
    pub content_dir: PathBuf,
    /// Directory receiving downloaded images, one subdirectory per page.
    pub images_dir: PathBuf,
    /// Base path under which the published site serves the images directory.
    pub published_image_base: String,
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            root_page_id = %self.root_page_id,
            content_dir = %self.content_dir.display(),
            images_dir = %self.images_dir.display(),
            published_image_base = %self.published_image_base,
            "Loaded Config"
        );
        debug!("Config loaded (token present, not logged)");
    }
}
