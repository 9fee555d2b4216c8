//! Site graph: the tree of harvested pages
//!
//! The graph owns every [`Node`] in an arena and keeps a registry keyed by
//! canonical URL. The registry doubles as the visited set: a canonical URL
//! is visited exactly when it maps to a node, so each visited URL has at
//! most one node.

use crate::state::node::{Node, NodeId};
use crate::url::{canonical_url, parse_url};
use crate::UrlError;
use std::collections::HashMap;

/// Tree of pages discovered from a single root
#[derive(Debug, Clone)]
pub struct SiteGraph {
    nodes: Vec<Node>,
    max_depth: i32,
    index: HashMap<String, NodeId>,
}

impl SiteGraph {
    /// Creates a graph holding only the root node
    ///
    /// The root's canonical URL is marked visited immediately.
    ///
    /// # Arguments
    ///
    /// * `root_url` - Absolute URL of the root page
    /// * `max_depth` - Depth ceiling for new nodes; zero or negative means unlimited
    ///
    /// # Returns
    ///
    /// * `Ok(SiteGraph)` - Graph with a single root node
    /// * `Err(UrlError)` - The root URL could not be parsed
    pub fn new(root_url: &str, max_depth: i32) -> Result<Self, UrlError> {
        let url = parse_url(root_url)?;
        let key = canonical_url(&url);

        let mut index = HashMap::new();
        index.insert(key, NodeId(0));

        Ok(Self {
            nodes: vec![Node::new(url, 0, None)],
            max_depth,
            index,
        })
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Returns the node with the given id
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutable access to a node's title, content type and metadata
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn max_depth(&self) -> i32 {
        self.max_depth
    }

    /// Number of nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a URL as a child of `parent`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(id))` - A new node was created one level below `parent`
    /// * `Ok(None)` - The canonical URL was already visited; nothing changed
    /// * `Err(UrlError)` - The URL could not be parsed
    pub fn add_url(&mut self, url_str: &str, parent: NodeId) -> Result<Option<NodeId>, UrlError> {
        let url = parse_url(url_str)?;
        let key = canonical_url(&url);

        if self.index.contains_key(&key) {
            return Ok(None);
        }

        let depth = self.nodes[parent.0].depth() + 1;
        let id = NodeId(self.nodes.len());

        self.nodes.push(Node::new(url, depth, Some(parent)));
        self.nodes[parent.0].push_child(id);
        self.index.insert(key, id);

        Ok(Some(id))
    }

    /// Returns true if the canonical form of `url_str` is already in the graph
    ///
    /// Unparsable URLs are never visited.
    pub fn is_visited(&self, url_str: &str) -> bool {
        self.find_node(url_str).is_some()
    }

    /// Returns true if a node may exist at `depth`
    pub fn is_allowed_depth(&self, depth: u32) -> bool {
        self.max_depth <= 0 || i64::from(depth) <= i64::from(self.max_depth)
    }

    /// Looks up a node by canonical URL
    pub fn find_node(&self, url_str: &str) -> Option<NodeId> {
        let url = parse_url(url_str).ok()?;
        self.index.get(&canonical_url(&url)).copied()
    }

    /// Canonical URLs of a node's direct children, in discovery order
    pub fn children_urls(&self, id: NodeId) -> Vec<String> {
        self.node(id)
            .children()
            .iter()
            .map(|child| self.node(*child).canonical_url())
            .collect()
    }

    /// Iterates over every visited canonical URL (unordered)
    pub fn visited_urls(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Iterates over all nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Renders the tree as an indented list, one `- url` line per node
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root_id(), &mut out);
        out
    }

    fn render_node(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        let indent = "  ".repeat(node.depth() as usize);
        out.push_str(&format!("{}- {}\n", indent, node.url));

        for child in node.children() {
            self.render_node(*child, out);
        }
    }
}
