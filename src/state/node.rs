//! Page node definitions for the site graph
//!
//! A node records one page's identity and its position in the harvested
//! tree. Nodes live in the [`SiteGraph`](crate::state::SiteGraph) arena and
//! refer to each other by [`NodeId`].

use crate::url::canonical_url;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Content type assumed until a response says otherwise
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Index of a node inside its owning site graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single page in the site tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Full URL of the page, as discovered
    pub url: Url,

    /// Page title (empty until the page has been fetched)
    pub title: String,

    /// Content type reported for the page
    pub content_type: String,

    /// Additional information such as `<meta>` tag values
    pub metadata: BTreeMap<String, String>,

    depth: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(url: Url, depth: u32, parent: Option<NodeId>) -> Self {
        Self {
            url,
            title: String::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            metadata: BTreeMap::new(),
            depth,
            parent,
            children: Vec::new(),
        }
    }

    /// Distance from the root; the root is at depth 0
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The node this one was discovered from, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in discovery order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The canonical form of this node's URL (the deduplication key)
    pub fn canonical_url(&self) -> String {
        canonical_url(&self.url)
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }
}
