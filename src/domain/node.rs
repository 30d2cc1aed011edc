//! Tree data model: a labeled node owning an ordered list of children.

use std::collections::VecDeque;
use std::fmt;

use tracing::instrument;

use crate::domain::render::{render, TreeItem};

/// A node in a labeled tree.
///
/// Children keep the order in which they were appended. Labels are stored
/// verbatim: empty strings, embedded line breaks and any Unicode are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    label: String,
    children: Vec<Tree>,
}

impl Tree {
    /// Creates a node with the given label and no children.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Appends a fresh child labeled `label` and returns it.
    ///
    /// Returning the child allows deep paths to be built in one expression:
    ///
    /// ```
    /// use boxtree::Tree;
    ///
    /// let mut root = Tree::new("First Level");
    /// root.add_child("Second level").add_child("Third Level");
    /// assert_eq!(root.depth(), 3);
    /// ```
    #[instrument(level = "trace", skip(self, label))]
    pub fn add_child(&mut self, label: impl Into<String>) -> &mut Tree {
        let idx = self.children.len();
        self.children.push(Tree::new(label));
        &mut self.children[idx]
    }

    /// Appends an already built subtree as the next child.
    ///
    /// `None` is accepted and ignored, the child list stays untouched.
    #[instrument(level = "trace", skip_all)]
    pub fn attach(&mut self, subtree: Option<Tree>) {
        let Some(subtree) = subtree else {
            return;
        };
        self.children.push(subtree);
    }

    /// By-value variant of [`Tree::attach`] for builder-style construction.
    pub fn with_child(mut self, child: Tree) -> Self {
        self.children.push(child);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replaces the label. Rendering always uses the current label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn children(&self) -> &[Tree] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Number of levels in this subtree; a lone node has depth 1.
    ///
    /// Breadth-first, so very deep chains do not grow the call stack.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut queue = VecDeque::new();
        queue.push_back((self, 1));

        while let Some((node, depth)) = queue.pop_front() {
            max_depth = max_depth.max(depth);
            for child in &node.children {
                queue.push_back((child, depth + 1));
            }
        }

        max_depth
    }

    /// Renders this tree with box-drawing glyphs, see [`render`].
    pub fn render(&self) -> String {
        render(self)
    }
}

impl TreeItem for Tree {
    fn label(&self) -> &str {
        &self.label
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Tree {
    fn from(label: &str) -> Self {
        Tree::new(label)
    }
}

impl From<String> for Tree {
    fn from(label: String) -> Self {
        Tree::new(label)
    }
}

// Nodes are owned all the way down, so the default drop would recurse once
// per level. Flatten the children first to keep very deep chains safe.
impl Drop for Tree {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_label_when_new_then_has_no_children() {
        let tree = Tree::new("new tree");
        assert_eq!(tree.label(), "new tree");
        assert!(tree.children().is_empty());
        assert!(tree.is_leaf());
    }

    #[test]
    fn given_empty_tree_when_add_child_then_returns_new_child() {
        let mut tree = Tree::new("");
        let child = tree.add_child("child item");
        assert_eq!(child, &Tree::new("child item"));
        assert_eq!(tree.children().len(), 1);
    }

    #[test]
    fn given_full_tree_when_add_child_then_appends_last() {
        let mut tree = Tree::new("")
            .with_child(Tree::new("test"))
            .with_child(Tree::new("test2"))
            .with_child(Tree::new("test3"));

        tree.add_child("fourth item");

        let labels: Vec<_> = tree.children().iter().map(Tree::label).collect();
        assert_eq!(labels, ["test", "test2", "test3", "fourth item"]);
    }

    #[test]
    fn given_none_when_attach_then_child_count_unchanged() {
        let mut tree = Tree::new("root");
        tree.add_child("a");
        tree.attach(None);
        assert_eq!(tree.children().len(), 1);
    }

    #[test]
    fn given_subtree_when_attach_then_descendants_come_along() {
        let mut album = Tree::new("album");
        album.add_child("track 1");
        album.add_child("track 2");

        let mut artist = Tree::new("artist");
        artist.attach(Some(album));

        assert_eq!(artist.children().len(), 1);
        assert_eq!(artist.children()[0].children().len(), 2);
        assert_eq!(artist.node_count(), 4);
    }

    #[test]
    fn given_attached_node_when_relabel_then_render_uses_new_label() {
        let mut root = Tree::new("root");
        root.add_child("old").set_label("new");
        assert_eq!(root.render(), "root\n└── new\n");
    }

    #[test]
    fn given_chain_when_depth_then_counts_levels() {
        let mut root = Tree::new("a");
        root.add_child("b").add_child("c").add_child("d");
        root.add_child("e");
        assert_eq!(root.depth(), 4);
        assert_eq!(Tree::new("solo").depth(), 1);
    }

    #[test]
    fn given_tree_when_display_then_matches_render() {
        let mut root = Tree::new("root");
        root.add_child("child");
        assert_eq!(root.to_string(), root.render());
    }

    #[test]
    fn given_very_deep_chain_when_dropped_then_does_not_overflow() {
        let mut root = Tree::new("0");
        let mut cursor = &mut root;
        for i in 1..100_000 {
            cursor = cursor.add_child(i.to_string());
        }
        drop(root);
    }
}
