//! Materialized content elements.

use std::sync::Arc;
use std::time::SystemTime;
use uuid::Uuid;

/// An immutable, identity-bearing unit of content read from a snapshot.
///
/// Several instances may represent the same logical node across reads;
/// `key` is what identifies the node.
#[derive(Debug, Clone)]
pub struct ContentElement {
    /// Numeric node id.
    pub id: i32,
    /// Globally unique key.
    pub key: Uuid,
    /// Alias of the content type describing this element.
    pub content_type: Arc<str>,
    /// Depth in the content tree (roots are level 1).
    pub level: u32,
    /// Comma-separated id path from the tree root, e.g. `-1,1046,1173`.
    pub path: String,
    /// Position among siblings.
    pub sort_order: i32,
    /// Id of the user who created the node.
    pub creator_id: i32,
    pub created_at: SystemTime,
}

impl ContentElement {
    /// Create a root-level element of the given type.
    pub fn new(id: i32, key: Uuid, content_type: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            key,
            content_type: content_type.into(),
            level: 1,
            path: format!("-1,{}", id),
            sort_order: 0,
            creator_id: 0,
            created_at: SystemTime::now(),
        }
    }

    /// Place the element below `parent`.
    pub fn with_parent(mut self, parent: &ContentElement) -> Self {
        self.level = parent.level + 1;
        self.path = format!("{},{}", parent.path, self.id);
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_creator(mut self, creator_id: i32) -> Self {
        self.creator_id = creator_id;
        self
    }

    /// Ids from the root down to this element.
    pub fn path_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.path
            .split(',')
            .filter_map(|part| part.parse::<i32>().ok())
            .filter(|id| *id > 0)
    }

    /// Whether both instances represent the same logical node.
    pub fn same_node(&self, other: &ContentElement) -> bool {
        self.key == other.key
    }
}
