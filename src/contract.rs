//! # contract: capability interfaces for the external collaborators
//!
//! This module defines the traits the sync pipeline consumes and the plain data
//! types they exchange. The remote content backend and the asset downloader are
//! both external collaborators; everything the pipeline knows about them lives
//! behind these traits.
//!
//! ## Interface & Extensibility
//! - Implement [`ContentSource`] to plug in a real backend client (see the
//!   `notion` module) or a deterministic test double.
//! - Implement [`AssetFetcher`] for image materialisation (see the `assets`
//!   module for the real HTTP-backed store).
//! - All methods are async, returning results with boxed error types so that
//!   transport details never leak into the pipeline.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`, so consumers can generate
//!   deterministic mocks for unit/integration tests. The mocks are exported
//!   under the `test-export-mocks` feature (enabled by default).

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Error type for the content source capability (simple boxed error).
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for the asset fetch capability (simple boxed error).
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Kind of an immediate child entry of a node, as reported by the backend.
///
/// Only page-type entries are traversed; everything else (paragraphs, images,
/// any other block) is opaque to the walker and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildKind {
    Page,
    Other,
}

/// One immediate child entry of a node.
#[derive(Debug, Clone)]
pub struct ChildEntry {
    /// Backend identifier of the entry.
    pub id: String,
    pub kind: ChildKind,
}

/// Immutable snapshot of a remote page's metadata, fetched once per sync run.
#[derive(Debug, Clone)]
pub struct PageNode {
    /// Backend identifier (hyphenated form, as returned by the API).
    pub id: String,
    /// Resolved title; the implementor handles property aliases and supplies a
    /// placeholder when the page carries no title.
    pub title: String,
    /// Last-modified timestamp as an ISO-8601 string.
    pub last_edited_time: String,
}

/// Capability trait for the remote content backend.
///
/// Implemented by the real API client and by test mocks. Methods may suspend
/// indefinitely on network I/O; no retry or timeout layer is imposed here.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// List the immediate child entries of a node, in backend order.
    async fn list_children(&self, node_id: &str) -> Result<Vec<ChildEntry>, SourceError>;

    /// Retrieve the full metadata snapshot for a page.
    async fn get_page(&self, page_id: &str) -> Result<PageNode, SourceError>;

    /// Retrieve a page's body rendered as a flat markdown string.
    ///
    /// Block-to-markdown mapping is the backend client's concern; the pipeline
    /// only ever sees the rendered string.
    async fn page_markdown(&self, page_id: &str) -> Result<String, SourceError>;
}

/// Capability trait for materialising one remote image to local disk.
///
/// `asset_index` is the 1-based position of the image within its owning page,
/// in textual order; together with `owner_id` it determines the destination
/// file name, so repeated runs land on the same paths.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Download `url` for page `owner_id`, returning the site-relative path the
    /// document should reference.
    async fn fetch(
        &self,
        url: &str,
        owner_id: &str,
        asset_index: usize,
    ) -> Result<String, FetchError>;
}
