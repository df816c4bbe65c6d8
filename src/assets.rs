//! Asset materialisation: download remote images into a per-page local
//! directory and hand back the site-relative path documents should reference.
//!
//! Downloads always happen, every run; there is no existence check or checksum
//! cache. Re-fetching overwrites the previous file, so the effect is
//! idempotent even though the cost is not. Redirects are followed manually
//! with a fixed hop limit so a redirect cycle fails closed instead of looping.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info, warn};

use crate::contract::{AssetFetcher, FetchError};

/// Maximum number of 301/302 hops followed before failing closed.
const MAX_REDIRECT_HOPS: usize = 5;

/// Fallback extension when the URL path carries none.
const DEFAULT_EXTENSION: &str = ".png";

/// HTTP-backed implementation of [`AssetFetcher`].
///
/// Files land under `<images_dir>/<owner_id>/image-<n><ext>`; the returned
/// reference path is rooted at `published_base` rather than the filesystem.
pub struct AssetStore {
    client: Client,
    images_dir: PathBuf,
    published_base: String,
}

impl AssetStore {
    /// Build a store writing under `images_dir` and referencing files via
    /// `published_base`. Redirects are disabled at the client level so the
    /// hop limit here is authoritative.
    pub fn new(images_dir: PathBuf, published_base: String) -> Result<Self, FetchError> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        Ok(Self {
            client,
            images_dir,
            published_base: published_base.trim_end_matches('/').to_string(),
        })
    }

    /// Derive the file extension (including the dot) from a URL path.
    fn extension_of(url: &Url) -> String {
        let path = url.path();
        let file_name = path.rsplit('/').next().unwrap_or("");
        match file_name.rfind('.') {
            Some(idx) if idx + 1 < file_name.len() => file_name[idx..].to_string(),
            _ => DEFAULT_EXTENSION.to_string(),
        }
    }

    /// GET `url`, following up to [`MAX_REDIRECT_HOPS`] 301/302 responses.
    async fn get_following_redirects(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let mut current = Url::parse(url)?;
        for hop in 0..=MAX_REDIRECT_HOPS {
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();
            if status != StatusCode::MOVED_PERMANENTLY && status != StatusCode::FOUND {
                if !status.is_success() {
                    return Err(format!("asset request to {current} returned {status}").into());
                }
                return Ok(response);
            }
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| format!("redirect from {current} carried no Location header"))?;
            // Location may be relative; resolve against the redirecting URL.
            let next = current.join(location)?;
            debug!(hop, from = %current, to = %next, "Following asset redirect");
            current = next;
        }
        Err(format!(
            "asset download exceeded {MAX_REDIRECT_HOPS} redirects for {url}, last hop: {current}"
        )
        .into())
    }
}

#[async_trait]
impl AssetFetcher for AssetStore {
    async fn fetch(
        &self,
        url: &str,
        owner_id: &str,
        asset_index: usize,
    ) -> Result<String, FetchError> {
        let parsed = Url::parse(url)?;
        let ext = Self::extension_of(&parsed);
        let file_name = format!("image-{}{}", asset_index, ext);

        let page_dir = self.images_dir.join(owner_id);
        fs::create_dir_all(&page_dir)?;

        let response = self.get_following_redirects(url).await?;
        let bytes = response.bytes().await?;

        let file_path = page_dir.join(&file_name);
        if let Err(e) = fs::write(&file_path, &bytes) {
            warn!(error = ?e, path = %file_path.display(), "Failed to persist asset, removing partial file");
            let _ = fs::remove_file(&file_path);
            return Err(e.into());
        }

        info!(
            url,
            path = %file_path.display(),
            size = bytes.len(),
            "Downloaded asset"
        );
        Ok(format!("{}/{}/{}", self.published_base, owner_id, file_name))
    }
}
