//! Environment-based configuration loading.
//!
//! Two settings are required: the integration token and the root page id.
//! Directory locations and the published image base have defaults matching the
//! site layout and may be overridden through the environment. Secrets are
//! never read from a config file; an optional `.env` file is loaded into the
//! process environment by the CLI before this runs.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info};

use crate::config::Config;

/// Default location of the exported documents, relative to the site root.
const DEFAULT_CONTENT_DIR: &str = "src/content/posts";
/// Default location of downloaded images, relative to the site root.
const DEFAULT_IMAGES_DIR: &str = "public/images/notion";
/// Default base path under which the published site serves images.
const DEFAULT_PUBLISHED_IMAGE_BASE: &str = "/notion-blog/images/notion";

/// Build a [`Config`] from the process environment.
///
/// Fails when `NOTION_TOKEN` or `NOTION_ROOT_PAGE_ID` is absent; optional
/// overrides are `SYNC_CONTENT_DIR`, `SYNC_IMAGES_DIR` and
/// `SYNC_PUBLISHED_IMAGE_BASE`.
pub fn load_config() -> Result<Config> {
    let token = match std::env::var("NOTION_TOKEN") {
        Ok(token) if !token.is_empty() => {
            info!("NOTION_TOKEN found in env");
            token
        }
        _ => {
            error!("NOTION_TOKEN environment variable not set");
            return Err(anyhow::anyhow!("NOTION_TOKEN environment variable not set"));
        }
    };

    let root_page_id = match std::env::var("NOTION_ROOT_PAGE_ID") {
        Ok(id) if !id.is_empty() => id,
        _ => {
            error!("NOTION_ROOT_PAGE_ID environment variable not set");
            return Err(anyhow::anyhow!(
                "NOTION_ROOT_PAGE_ID environment variable not set"
            ));
        }
    };

    let content_dir = std::env::var("SYNC_CONTENT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONTENT_DIR));
    let images_dir = std::env::var("SYNC_IMAGES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_IMAGES_DIR));
    let published_image_base = std::env::var("SYNC_PUBLISHED_IMAGE_BASE")
        .unwrap_or_else(|_| DEFAULT_PUBLISHED_IMAGE_BASE.to_string());

    let config = Config {
        token,
        root_page_id,
        content_dir,
        images_dir,
        published_image_base,
    };
    config.trace_loaded();
    Ok(config)
}
