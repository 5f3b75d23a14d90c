//! Foldable display tree shared by the renderer and the terminal front end.

use logweave_types::StyledText;

/// Handle to a node in a [`DisplayTree`]. Only meaningful for the tree
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct DisplayNode {
    pub label: StyledText,
    /// Whether the user may toggle this node open
    pub allow_expand: bool,
    pub expanded: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl DisplayNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed tree. Nodes are only ever appended, so a [`NodeId`] stays
/// valid for the tree's lifetime.
#[derive(Debug, Clone)]
pub struct DisplayTree {
    nodes: Vec<DisplayNode>,
}

impl DisplayTree {
    /// Create a tree whose root carries `label`. The root starts expanded.
    pub fn new(label: impl Into<StyledText>) -> Self {
        Self {
            nodes: vec![DisplayNode {
                label: label.into(),
                allow_expand: true,
                expanded: true,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a collapsed, non-expandable child under `parent`.
    pub fn add(&mut self, parent: NodeId, label: StyledText) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DisplayNode {
            label,
            allow_expand: false,
            expanded: false,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&DisplayNode> {
        self.nodes.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> &DisplayNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always has its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn set_allow_expand(&mut self, id: NodeId, allow: bool) {
        self.nodes[id.0].allow_expand = allow;
    }

    pub fn expand(&mut self, id: NodeId) {
        self.nodes[id.0].expanded = true;
    }

    pub fn collapse(&mut self, id: NodeId) {
        self.nodes[id.0].expanded = false;
    }

    /// Flip an expandable node. Returns the new state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        let node = &mut self.nodes[id.0];
        if node.allow_expand {
            node.expanded = !node.expanded;
        }
        node.expanded
    }

    /// Expand `id` and every ancestor up to the root.
    pub fn expand_path(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node) = current {
            self.nodes[node.0].expanded = true;
            current = self.nodes[node.0].parent;
        }
    }

    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            if node.allow_expand {
                node.expanded = true;
            }
        }
    }

    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }

    /// True when every ancestor of `id` is expanded.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            if !self.nodes[parent.0].expanded {
                return false;
            }
            current = self.nodes[parent.0].parent;
        }
        true
    }

    /// Rows a viewer would draw, in pre-order, as `(depth, node)`.
    pub fn visible_rows(&self) -> Vec<(usize, NodeId)> {
        let mut rows = Vec::new();
        let mut stack = vec![(0, self.root())];

        while let Some((depth, id)) = stack.pop() {
            rows.push((depth, id));
            let node = &self.nodes[id.0];
            if node.expanded {
                for child in node.children.iter().rev() {
                    stack.push((depth + 1, *child));
                }
            }
        }
        rows
    }
}
