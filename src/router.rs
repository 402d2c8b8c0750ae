//! Route tree and the recursive walker that flattens it.
//!
//! The walker is written against the [`RouteNode`] capability rather than one
//! concrete tree, so a host framework can expose its own router through an
//! adapter. [`Router`] is the in-crate implementation used by
//! [`crate::app::App`]: a segment tree where `{name}` segments act as
//! templates during lookup.

use std::sync::Arc;

use crate::metadata::Handler;

/// Capability a route tree node must expose to be walkable.
pub trait RouteNode {
    fn segment(&self) -> &str;
    fn bound_handler(&self) -> Option<&Handler>;
    fn children(&self) -> &[Self]
    where
        Self: Sized;
}

/// One segment of the route tree.
#[derive(Clone)]
pub struct Node {
    segment: String,
    handler: Option<Arc<Handler>>,
    children: Vec<Node>,
}

impl RouteNode for Node {
    fn segment(&self) -> &str {
        &self.segment
    }

    fn bound_handler(&self) -> Option<&Handler> {
        self.handler.as_deref()
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Segment tree mapping URL paths to handler bindings.
#[derive(Clone, Default)]
pub struct Router {
    roots: Vec<Node>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a handler at the given path, creating intermediate nodes as
    /// needed. Binding the same path again replaces the earlier handler.
    pub fn add_route(&mut self, path: &str, handler: Handler) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut nodes = &mut self.roots;
        for segment in parents {
            let pos = Self::child_position(nodes, segment);
            nodes = &mut nodes[pos].children;
        }
        let pos = Self::child_position(nodes, last);
        nodes[pos].handler = Some(Arc::new(handler));
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Looks up the handler bound at a concrete request path. A `{name}`
    /// segment in the tree matches any single request segment.
    pub fn find(&self, path: &str) -> Option<&Handler> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        Self::descend(&self.roots, &segments)
    }

    fn descend<'a>(nodes: &'a [Node], segments: &[&str]) -> Option<&'a Handler> {
        let (first, rest) = segments.split_first()?;
        for node in nodes {
            let is_template = node.segment.starts_with('{') && node.segment.ends_with('}');
            if node.segment != *first && !is_template {
                continue;
            }
            if rest.is_empty() {
                if let Some(handler) = &node.handler {
                    return Some(handler);
                }
            } else if let Some(handler) = Self::descend(&node.children, rest) {
                return Some(handler);
            }
        }
        None
    }

    fn child_position(nodes: &mut Vec<Node>, segment: &str) -> usize {
        match nodes.iter().position(|n| n.segment == segment) {
            Some(pos) => pos,
            None => {
                nodes.push(Node {
                    segment: segment.to_string(),
                    handler: None,
                    children: Vec::new(),
                });
                nodes.len() - 1
            }
        }
    }
}

/// Flattens a route tree into `(full_path, handler)` pairs.
///
/// Depth-first, pre-order: a node's own binding is recorded before its
/// children are visited, and children before siblings. No de-duplication is
/// performed; a well-formed tree has at most one binding per path.
pub fn walk<'a, N: RouteNode>(nodes: &'a [N], prefix: &str) -> Vec<(String, &'a Handler)> {
    let mut pairs = Vec::new();
    for node in nodes {
        let path = format!("{}/{}", prefix, node.segment());
        if let Some(handler) = node.bound_handler() {
            pairs.push((path.clone(), handler));
        }
        pairs.extend(walk(node.children(), &path));
    }
    pairs
}
