//! Scene graph arena
//!
//! The graph owns every node. Edges are plain [`NodeId`] references, so the
//! same sub-graph can be reached along several paths (through a
//! [`super::SharedNode`] or by listing a child twice) without ever being
//! owned twice. Edits that would close a cycle are rejected at attach time.

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::SlotMap;
use thiserror::Error;

use crate::render::Viewport;
use super::node::{Node, NodeId, NodeKind};

/// Scene graph structure errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The id does not resolve to a live node
    #[error("Node {0:?} is not part of this scene graph")]
    NodeNotFound(NodeId),

    /// The edit needs a different kind of node
    #[error("Node {node:?} is not a {expected} node")]
    InvalidNodeType {
        /// Offending node
        node: NodeId,
        /// Kind the edit requires
        expected: &'static str,
    },

    /// Attaching the child would make it its own ancestor
    #[error("Attaching {child:?} under {parent:?} would create a cyclic scene graph structure")]
    Cyclic {
        /// Node being attached to
        parent: NodeId,
        /// Node being attached
        child: NodeId,
    },
}

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`SceneGraph`]
///
/// [`NodeId`]s are only unique within one graph, so anything remembering
/// nodes across graphs pairs them with this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

/// Arena holding all nodes of one scene
#[derive(Debug)]
pub struct SceneGraph {
    id: GraphId,
    nodes: SlotMap<NodeId, Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create an empty scene graph
    pub fn new() -> Self {
        Self {
            id: GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed)),
            nodes: SlotMap::with_key(),
        }
    }

    /// Identity of this graph
    pub const fn id(&self) -> GraphId {
        self.id
    }

    /// Add a node and return its id
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        log::trace!("Inserted {} node {:?}", self.nodes[id].kind().name(), id);
        id
    }

    /// Remove a node from the arena
    ///
    /// References other nodes hold to it are left in place; they no longer
    /// resolve and traversal skips them.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Whether the id resolves to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all live nodes in arena order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Append a child to a group
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.check_attach(parent, child)?;

        match self.kind_mut(parent)? {
            NodeKind::Group(group) => {
                group.children.push(child);
                Ok(())
            }
            _ => Err(GraphError::InvalidNodeType { node: parent, expected: "Group" }),
        }
    }

    /// Remove the first occurrence of `child` from a group
    ///
    /// Returns whether the child was found.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool, GraphError> {
        match self.kind_mut(parent)? {
            NodeKind::Group(group) => {
                let position = group.children.iter().position(|&c| c == child);
                if let Some(index) = position {
                    group.children.remove(index);
                }
                Ok(position.is_some())
            }
            _ => Err(GraphError::InvalidNodeType { node: parent, expected: "Group" }),
        }
    }

    /// Set or clear the sub-graph a shared node instances
    pub fn set_shared_child(&mut self, shared: NodeId, child: Option<NodeId>) -> Result<(), GraphError> {
        if let Some(child) = child {
            self.check_attach(shared, child)?;
        }

        match self.kind_mut(shared)? {
            NodeKind::Shared(node) => {
                node.child = child;
                Ok(())
            }
            _ => Err(GraphError::InvalidNodeType { node: shared, expected: "SharedNode" }),
        }
    }

    /// Set or clear the rendered geometry root of a scene
    pub fn set_scene_root(&mut self, scene: NodeId, root: Option<NodeId>) -> Result<(), GraphError> {
        if let Some(root) = root {
            self.check_attach(scene, root)?;
        }

        match self.kind_mut(scene)? {
            NodeKind::SimpleScene(data) => {
                data.root = root;
                Ok(())
            }
            _ => Err(GraphError::InvalidNodeType { node: scene, expected: "SimpleScene" }),
        }
    }

    /// Set or clear the scene a layer renders
    ///
    /// The layer's viewport is pushed down into the scene's view environment.
    pub fn set_layer_scene(&mut self, layer: NodeId, scene: Option<NodeId>) -> Result<(), GraphError> {
        if let Some(scene) = scene {
            self.check_attach(layer, scene)?;
            let node = self.nodes.get(scene).ok_or(GraphError::NodeNotFound(scene))?;
            if node.as_simple_scene().is_none() {
                return Err(GraphError::InvalidNodeType { node: scene, expected: "SimpleScene" });
            }
        }

        let viewport = match self.kind_mut(layer)? {
            NodeKind::Layer(data) => {
                data.scene = scene;
                data.viewport
            }
            _ => return Err(GraphError::InvalidNodeType { node: layer, expected: "Layer" }),
        };

        if let Some(scene) = scene {
            self.push_viewport(scene, viewport);
        }
        Ok(())
    }

    /// Resize a layer's viewport and propagate it to the layer's scene
    pub fn set_layer_viewport(&mut self, layer: NodeId, viewport: Viewport) -> Result<(), GraphError> {
        let scene = match self.kind_mut(layer)? {
            NodeKind::Layer(data) => {
                data.viewport = viewport;
                data.scene
            }
            _ => return Err(GraphError::InvalidNodeType { node: layer, expected: "Layer" }),
        };

        if let Some(scene) = scene {
            self.push_viewport(scene, viewport);
        }
        Ok(())
    }

    /// Every structural edge out of a node, including a layer's scene
    ///
    /// Stale ids are included as stored.
    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };

        match node.kind() {
            NodeKind::Group(group) => group.children.clone(),
            NodeKind::Layer(layer) => layer.scene.into_iter().collect(),
            NodeKind::SimpleScene(scene) => scene.root.into_iter().collect(),
            NodeKind::Shared(shared) => shared.child.into_iter().collect(),
            NodeKind::Custom(_) | NodeKind::Leaf => Vec::new(),
        }
    }

    /// Whether `to` can be reached from `from` along structural edges
    pub fn is_reachable(&self, from: NodeId, to: NodeId) -> bool {
        let mut stack = vec![from];
        let mut seen = std::collections::HashSet::new();

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if seen.insert(current) {
                stack.extend(self.children_of(current));
            }
        }

        false
    }

    fn kind_mut(&mut self, id: NodeId) -> Result<&mut NodeKind, GraphError> {
        self.nodes
            .get_mut(id)
            .map(Node::kind_mut)
            .ok_or(GraphError::NodeNotFound(id))
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        if !self.contains(parent) {
            return Err(GraphError::NodeNotFound(parent));
        }
        if !self.contains(child) {
            return Err(GraphError::NodeNotFound(child));
        }
        if self.is_reachable(child, parent) {
            return Err(GraphError::Cyclic { parent, child });
        }
        Ok(())
    }

    fn push_viewport(&mut self, scene: NodeId, viewport: Viewport) {
        if let Some(data) = self.nodes.get_mut(scene).and_then(Node::as_simple_scene_mut) {
            data.view.set_viewport_dimensions(viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ViewEnvironmentCullable;

    #[test]
    fn test_graphs_have_distinct_ids() {
        let first = SceneGraph::new();
        let second = SceneGraph::default();

        assert_ne!(first.id(), second.id());
        assert_eq!(first.id(), first.id());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut graph = SceneGraph::new();
        assert!(graph.is_empty());

        let leaf = graph.insert(Node::leaf().with_name("leaf"));
        assert_eq!(graph.len(), 1);
        assert!(graph.contains(leaf));

        let removed = graph.remove(leaf).unwrap();
        assert_eq!(removed.name(), Some("leaf"));
        assert!(!graph.contains(leaf));
        assert!(graph.node(leaf).is_none());
    }

    #[test]
    fn test_group_children_keep_order_and_duplicates() {
        let mut graph = SceneGraph::new();
        let group = graph.insert(Node::group());
        let a = graph.insert(Node::leaf());
        let b = graph.insert(Node::leaf());

        graph.add_child(group, a).unwrap();
        graph.add_child(group, b).unwrap();
        graph.add_child(group, a).unwrap();

        assert_eq!(graph.children_of(group), vec![a, b, a]);

        assert!(graph.remove_child(group, a).unwrap());
        assert_eq!(graph.children_of(group), vec![b, a]);
        let stranger = graph.insert(Node::leaf());
        assert!(!graph.remove_child(group, stranger).unwrap());
    }

    #[test]
    fn test_add_child_requires_group_parent() {
        let mut graph = SceneGraph::new();
        let leaf = graph.insert(Node::leaf());
        let other = graph.insert(Node::leaf());

        assert_eq!(
            graph.add_child(leaf, other),
            Err(GraphError::InvalidNodeType { node: leaf, expected: "Group" })
        );
    }

    #[test]
    fn test_add_child_rejects_missing_nodes() {
        let mut graph = SceneGraph::new();
        let group = graph.insert(Node::group());
        let gone = graph.insert(Node::leaf());
        graph.remove(gone);

        assert_eq!(graph.add_child(group, gone), Err(GraphError::NodeNotFound(gone)));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut graph = SceneGraph::new();
        let outer = graph.insert(Node::group());
        let shared = graph.insert(Node::shared());
        let inner = graph.insert(Node::group());

        graph.add_child(outer, shared).unwrap();
        graph.set_shared_child(shared, Some(inner)).unwrap();

        assert_eq!(
            graph.add_child(inner, outer),
            Err(GraphError::Cyclic { parent: inner, child: outer })
        );
        assert_eq!(
            graph.add_child(outer, outer),
            Err(GraphError::Cyclic { parent: outer, child: outer })
        );
    }

    #[test]
    fn test_shared_child_can_be_cleared() {
        let mut graph = SceneGraph::new();
        let shared = graph.insert(Node::shared());
        let target = graph.insert(Node::leaf());

        graph.set_shared_child(shared, Some(target)).unwrap();
        assert_eq!(graph.children_of(shared), vec![target]);

        graph.set_shared_child(shared, None).unwrap();
        assert!(graph.children_of(shared).is_empty());
    }

    #[test]
    fn test_layer_viewport_propagates_to_scene() {
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Node::layer());
        let scene = graph.insert(Node::simple_scene());

        graph.set_layer_viewport(layer, Viewport::new(0, 0, 640, 480)).unwrap();
        graph.set_layer_scene(layer, Some(scene)).unwrap();

        let view = graph.node(scene).and_then(Node::as_simple_scene).unwrap().view();
        assert_eq!(view.viewport_dimensions(), Viewport::new(0, 0, 640, 480));

        graph.set_layer_viewport(layer, Viewport::new(10, 20, 320, 240)).unwrap();
        let view = graph.node(scene).and_then(Node::as_simple_scene).unwrap().view();
        assert_eq!(view.viewport_dimensions().as_array(), [10, 20, 320, 240]);
    }

    #[test]
    fn test_layer_scene_must_be_simple_scene() {
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Node::layer());
        let group = graph.insert(Node::group());

        assert_eq!(
            graph.set_layer_scene(layer, Some(group)),
            Err(GraphError::InvalidNodeType { node: group, expected: "SimpleScene" })
        );
    }

    #[test]
    fn test_scene_root_requires_scene() {
        let mut graph = SceneGraph::new();
        let group = graph.insert(Node::group());
        let leaf = graph.insert(Node::leaf());

        assert_eq!(
            graph.set_scene_root(group, Some(leaf)),
            Err(GraphError::InvalidNodeType { node: group, expected: "SimpleScene" })
        );
    }

    #[test]
    fn test_reachability_follows_all_edge_kinds() {
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Node::layer());
        let scene = graph.insert(Node::simple_scene());
        let root = graph.insert(Node::group());
        let leaf = graph.insert(Node::leaf());

        graph.set_layer_scene(layer, Some(scene)).unwrap();
        graph.set_scene_root(scene, Some(root)).unwrap();
        graph.add_child(root, leaf).unwrap();

        assert!(graph.is_reachable(layer, leaf));
        assert!(!graph.is_reachable(leaf, layer));
    }
}
