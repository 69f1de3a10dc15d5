//! In-memory index of the source files of a project
//!
//! The index mirrors the part of the file system that contains recognized
//! source files. Its main job is to turn a partial path, as reported by the
//! analyzer (`com/acme/App.java`), back into the full path relative to the
//! project root (`module/src/main/java/com/acme/App.java`).
//!
//! Nodes live in an arena owned by [`DirectoryTree`]; parents are referenced
//! by [`NodeId`] so the tree can never form ownership cycles.

use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Couldn't find the relative path of file {path}")]
    NotFound { path: String },

    #[error("Directory {node} is not a descendant of {ancestor}")]
    NotAncestor { node: String, ancestor: String },

    #[error("Cannot insert an empty path")]
    EmptyPath,
}

/// Handle to a directory node inside a [`DirectoryTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    files: BTreeSet<String>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            files: BTreeSet::new(),
            children: Vec::new(),
        }
    }
}

/// Directory tree holding every source file of a project
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    nodes: Vec<Node>,
}

impl DirectoryTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("", None)],
        }
    }

    /// The root node. It has an empty name and no parent.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn files(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.nodes[id.0].files.iter().map(String::as_str)
    }

    pub fn contains_file(&self, id: NodeId, file_name: &str) -> bool {
        self.nodes[id.0].files.contains(file_name)
    }

    /// Number of directory nodes, root included
    pub fn directory_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn file_count(&self) -> usize {
        self.nodes.iter().map(|n| n.files.len()).sum()
    }

    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c.0].name == name)
    }

    fn child_or_insert(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let Some(existing) = self.child(parent, name) {
            return existing;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Inserts a file given its path components relative to the root.
    ///
    /// Every component but the last is a directory; the last one is the file
    /// name. Inserting the same components twice is a no-op. Returns the node
    /// the file was recorded in.
    pub fn insert<S: AsRef<str>>(&mut self, components: &[S]) -> Result<NodeId, DirectoryError> {
        let (file_name, directories) = components.split_last().ok_or(DirectoryError::EmptyPath)?;

        let mut current = self.root();
        for directory in directories {
            current = self.child_or_insert(current, directory.as_ref());
        }

        self.nodes[current.0]
            .files
            .insert(file_name.as_ref().to_string());

        Ok(current)
    }

    /// Finds the directory holding the file designated by a partial path.
    ///
    /// Every directory containing the file name is a candidate; a candidate
    /// matches when its ancestors, read from the innermost one outward, equal
    /// the directory segments of `partial_path`. The partial path does not
    /// have to go all the way up to the root. When several directories match
    /// the first one in depth-first insertion order wins.
    pub fn resolve(&self, partial_path: &str) -> Result<(NodeId, String), DirectoryError> {
        let components: Vec<&str> = partial_path.split('/').collect();
        let (file_name, directories) = components.split_last().ok_or_else(|| DirectoryError::NotFound {
            path: partial_path.to_string(),
        })?;

        self.directories_containing(file_name)
            .into_iter()
            .find(|&candidate| self.ancestors_match(candidate, directories))
            .map(|node| (node, file_name.to_string()))
            .ok_or_else(|| DirectoryError::NotFound {
                path: partial_path.to_string(),
            })
    }

    /// Path of `node` relative to `ancestor`, names joined with `/`.
    ///
    /// Returns an empty string when both are the same node.
    pub fn path_relative_to(&self, node: NodeId, ancestor: NodeId) -> Result<String, DirectoryError> {
        let mut names = Vec::new();
        let mut current = node;

        while current != ancestor {
            names.push(self.name(current));
            current = self.parent(current).ok_or_else(|| DirectoryError::NotAncestor {
                node: self.display_path(node),
                ancestor: self.display_path(ancestor),
            })?;
        }

        names.reverse();
        Ok(names.join("/"))
    }

    /// True when a file in the subtree rooted at `node` satisfies `predicate`
    pub fn has_descendant_matching<P>(&self, node: NodeId, predicate: P) -> bool
    where
        P: Fn(&str) -> bool,
    {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let entry = &self.nodes[current.0];
            if entry.files.iter().any(|f| predicate(f)) {
                return true;
            }
            stack.extend(entry.children.iter().copied());
        }
        false
    }

    /// Every indexed file as a `/`-separated path relative to the root,
    /// in depth-first insertion order.
    pub fn file_paths(&self) -> Vec<String> {
        let mut paths = Vec::with_capacity(self.file_count());
        for node in self.preorder() {
            let dir = self.display_path(node);
            for file in &self.nodes[node.0].files {
                if dir.is_empty() {
                    paths.push(file.clone());
                } else {
                    paths.push(format!("{}/{}", dir, file));
                }
            }
        }
        paths
    }

    fn display_path(&self, node: NodeId) -> String {
        self.path_relative_to(node, self.root()).unwrap_or_default()
    }

    fn directories_containing(&self, file_name: &str) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&n| self.contains_file(n, file_name))
            .collect()
    }

    fn ancestors_match(&self, candidate: NodeId, directories: &[&str]) -> bool {
        let mut current = Some(candidate);

        for segment in directories.iter().rev() {
            match current {
                Some(node) if self.name(node) == *segment => current = self.parent(node),
                _ => return false,
            }
        }

        true
    }

    fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];

        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }

        order
    }
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self::new()
    }
}
