//! Notion REST API client implementing the [`ContentSource`] capability.
//!
//! Covers exactly what the pipeline consumes: child-entry listing (with cursor
//! pagination), page metadata retrieval with title-alias resolution, and
//! block-to-markdown rendering for the common block types. Anything the
//! renderer does not recognise falls back to its rich text, or is skipped.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::contract::{ChildEntry, ChildKind, ContentSource, PageNode, SourceError};

const API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

/// Property names checked, in order, when resolving a page title.
const TITLE_ALIASES: [&str; 3] = ["title", "Title", "Name"];
/// Title used when a page carries no resolvable title property.
const UNTITLED: &str = "Untitled";

pub struct NotionClient {
    client: Client,
}

impl NotionClient {
    /// Build a client authenticated with the given integration token.
    pub fn new(token: &str) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }

    /// GET `url` and decode the JSON body, surfacing non-success statuses as
    /// errors carrying the response body.
    async fn get_json(&self, url: &str) -> Result<Value, SourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            return Err(format!("Notion API returned {status} for {url}: {body}").into());
        }
        Ok(response.json().await?)
    }

    /// Fetch all child blocks of a node as raw JSON, following pagination
    /// cursors until the backend reports no more results.
    async fn list_child_blocks(&self, node_id: &str) -> Result<Vec<Value>, SourceError> {
        let mut blocks: Vec<Value> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = format!(
                "{API_BASE}/blocks/{node_id}/children?page_size={PAGE_SIZE}"
            );
            if let Some(c) = &cursor {
                url.push_str(&format!("&start_cursor={c}"));
            }
            let body = self.get_json(&url).await?;

            if let Some(results) = body.get("results").and_then(Value::as_array) {
                blocks.extend(results.iter().cloned());
            }

            let has_more = body.get("has_more").and_then(Value::as_bool).unwrap_or(false);
            if !has_more {
                break;
            }
            cursor = body
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(str::to_string);
            if cursor.is_none() {
                break;
            }
        }
        debug!(node_id, blocks = blocks.len(), "Listed child blocks");
        Ok(blocks)
    }
}

#[async_trait]
impl ContentSource for NotionClient {
    async fn list_children(&self, node_id: &str) -> Result<Vec<ChildEntry>, SourceError> {
        let blocks = self.list_child_blocks(node_id).await?;
        Ok(blocks
            .iter()
            .filter_map(|block| {
                let id = block.get("id").and_then(Value::as_str)?;
                let kind = match block.get("type").and_then(Value::as_str) {
                    Some("child_page") => ChildKind::Page,
                    _ => ChildKind::Other,
                };
                Some(ChildEntry {
                    id: id.to_string(),
                    kind,
                })
            })
            .collect())
    }

    async fn get_page(&self, page_id: &str) -> Result<PageNode, SourceError> {
        let url = format!("{API_BASE}/pages/{page_id}");
        let page = self.get_json(&url).await?;

        let id = page
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("page {page_id} response carried no id"))?
            .to_string();
        let last_edited_time = page
            .get("last_edited_time")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let title = page_title(&page);

        Ok(PageNode {
            id,
            title,
            last_edited_time,
        })
    }

    async fn page_markdown(&self, page_id: &str) -> Result<String, SourceError> {
        let blocks = self.list_child_blocks(page_id).await?;
        let mut markdown = String::new();
        for block in &blocks {
            markdown.push_str(&render_block(block));
        }
        Ok(markdown)
    }
}

/// Resolve a page's title from its properties, trying each alias in order.
/// Absence of a usable title property yields a literal placeholder.
fn page_title(page: &Value) -> String {
    let properties = match page.get("properties") {
        Some(props) => props,
        None => return UNTITLED.to_string(),
    };

    for alias in TITLE_ALIASES {
        let Some(property) = properties.get(alias) else {
            continue;
        };
        if property.get("type").and_then(Value::as_str) != Some("title") {
            continue;
        }
        if let Some(first) = property
            .get("title")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
        {
            if let Some(text) = first.get("plain_text").and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }
    UNTITLED.to_string()
}

/// Render one block to markdown, trailing newlines included.
fn render_block(block: &Value) -> String {
    let block_type = block.get("type").and_then(Value::as_str).unwrap_or("");
    let Some(payload) = block.get(block_type) else {
        return String::new();
    };
    let text = || rich_text_inline(payload.get("rich_text"));

    match block_type {
        "paragraph" => format!("{}\n\n", text()),
        "heading_1" => format!("# {}\n\n", text()),
        "heading_2" => format!("## {}\n\n", text()),
        "heading_3" => format!("### {}\n\n", text()),
        "bulleted_list_item" => format!("- {}\n", text()),
        "numbered_list_item" => format!("1. {}\n", text()),
        "to_do" => {
            let checked = payload
                .get("checked")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let marker = if checked { "x" } else { " " };
            format!("- [{}] {}\n", marker, text())
        }
        "quote" | "callout" => format!("> {}\n\n", text()),
        "code" => {
            let language = payload
                .get("language")
                .and_then(Value::as_str)
                .unwrap_or("");
            let code = rich_text_plain(payload.get("rich_text"));
            format!("```{}\n{}\n```\n\n", language, code)
        }
        "divider" => "---\n\n".to_string(),
        "image" => {
            let url = payload
                .get("file")
                .and_then(|f| f.get("url"))
                .or_else(|| payload.get("external").and_then(|e| e.get("url")))
                .and_then(Value::as_str)
                .unwrap_or("");
            let caption = rich_text_plain(payload.get("caption"));
            if url.is_empty() {
                warn!("Image block carried no url, skipping");
                String::new()
            } else {
                format!("![{}]({})\n\n", caption, url)
            }
        }
        // Pages are traversed by the walker, not rendered inline.
        "child_page" => String::new(),
        _ => {
            let inline = text();
            if inline.is_empty() {
                String::new()
            } else {
                format!("{}\n\n", inline)
            }
        }
    }
}

/// Render a rich-text array with markdown annotations and links.
fn rich_text_inline(rich_text: Option<&Value>) -> String {
    let Some(items) = rich_text.and_then(Value::as_array) else {
        return String::new();
    };

    let mut out = String::new();
    for item in items {
        let mut text = item
            .get("plain_text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let annotations = item.get("annotations");
        let flag = |name: &str| {
            annotations
                .and_then(|a| a.get(name))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };

        if flag("code") {
            text = format!("`{}`", text);
        }
        if flag("bold") {
            text = format!("**{}**", text);
        }
        if flag("italic") {
            text = format!("*{}*", text);
        }
        if flag("strikethrough") {
            text = format!("~~{}~~", text);
        }
        if let Some(href) = item.get("href").and_then(Value::as_str) {
            text = format!("[{}]({})", text, href);
        }
        out.push_str(&text);
    }
    out
}

/// Concatenate a rich-text array's plain text, ignoring annotations.
fn rich_text_plain(rich_text: Option<&Value>) -> String {
    let Some(items) = rich_text.and_then(Value::as_array) else {
        return String::new();
    };
    items
        .iter()
        .filter_map(|item| item.get("plain_text").and_then(Value::as_str))
        .collect()
}
