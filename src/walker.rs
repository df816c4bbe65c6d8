//! Page-tree discovery: depth-first pre-order walk over the remote tree,
//! deriving one [`PageRecord`] per discovered page.
//!
//! The walk uses an explicit work stack instead of recursion. Each stack frame
//! carries an immutable [`Ancestry`] value describing the parent context;
//! child frames get a fresh copy derived from their own record, so sibling
//! subtrees can never alias each other's hierarchy or tags.
//!
//! Any listing or retrieval failure aborts the entire discovery: a partial
//! tree is never returned.

use tracing::{error, info};

use crate::contract::{ChildKind, ContentSource, SourceError};

/// One discovered page plus its traversal context. Never mutated after
/// creation.
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// Backend identifier (hyphenated form).
    pub id: String,
    pub title: String,
    /// Last-modified timestamp, ISO-8601.
    pub last_edited_time: String,
    /// Parent page id; `None` for direct children of the configured root.
    pub parent_id: Option<String>,
    pub parent_title: Option<String>,
    /// Ancestor titles from just-below-root down to and including self.
    pub hierarchy: Vec<String>,
    /// Hierarchy minus self, i.e. the titles of all ancestors below the root.
    pub tags: Vec<String>,
    /// Depth: 0 for direct children of the configured root.
    pub level: u32,
}

/// Immutable parent context carried down the walk.
#[derive(Debug, Clone)]
struct Ancestry {
    parent_id: Option<String>,
    parent_title: Option<String>,
    /// Hierarchy of the parent (empty at the root).
    hierarchy: Vec<String>,
    /// Level assigned to children of this node.
    child_level: u32,
}

impl Ancestry {
    fn root() -> Self {
        Self {
            parent_id: None,
            parent_title: None,
            hierarchy: Vec::new(),
            child_level: 0,
        }
    }

    fn of(record: &PageRecord) -> Self {
        Self {
            parent_id: Some(record.id.clone()),
            parent_title: Some(record.title.clone()),
            hierarchy: record.hierarchy.clone(),
            child_level: record.level + 1,
        }
    }
}

/// A page waiting to be visited, together with its parent's context.
struct Pending {
    id: String,
    ancestry: Ancestry,
}

/// Discover every descendant page of `root_id`, in pre-order.
pub async fn discover(
    source: &dyn ContentSource,
    root_id: &str,
) -> Result<Vec<PageRecord>, SourceError> {
    let mut records: Vec<PageRecord> = Vec::new();
    let mut stack: Vec<Pending> = Vec::new();

    push_page_children(source, root_id, &Ancestry::root(), &mut stack).await?;

    while let Some(pending) = stack.pop() {
        let page = match source.get_page(&pending.id).await {
            Ok(page) => page,
            Err(e) => {
                error!(page_id = %pending.id, error = ?e, "Failed to retrieve page during discovery");
                return Err(e);
            }
        };

        let ancestry = &pending.ancestry;
        let mut hierarchy = ancestry.hierarchy.clone();
        hierarchy.push(page.title.clone());

        let record = PageRecord {
            id: page.id,
            title: page.title,
            last_edited_time: page.last_edited_time,
            parent_id: ancestry.parent_id.clone(),
            parent_title: ancestry.parent_title.clone(),
            tags: ancestry.hierarchy.clone(),
            hierarchy,
            level: ancestry.child_level,
        };

        let child_ancestry = Ancestry::of(&record);
        push_page_children(source, &record.id, &child_ancestry, &mut stack).await?;
        records.push(record);
    }

    info!(pages = records.len(), "Discovery complete");
    Ok(records)
}

/// List the children of `node_id` and push its page-type entries onto the
/// stack, reversed so the leftmost child's subtree is visited first.
async fn push_page_children(
    source: &dyn ContentSource,
    node_id: &str,
    ancestry: &Ancestry,
    stack: &mut Vec<Pending>,
) -> Result<(), SourceError> {
    let children = match source.list_children(node_id).await {
        Ok(children) => children,
        Err(e) => {
            error!(node_id, error = ?e, "Failed to list child entries during discovery");
            return Err(e);
        }
    };

    for child in children
        .into_iter()
        .filter(|c| c.kind == ChildKind::Page)
        .rev()
    {
        stack.push(Pending {
            id: child.id,
            ancestry: ancestry.clone(),
        });
    }
    Ok(())
}
