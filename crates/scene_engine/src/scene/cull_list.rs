//! Cull list collection
//!
//! Collects the visits of a traversal into a flat, pre-ordered list that a
//! draw stage can consume. Layers met during the walk are listed separately
//! since each one schedules a pass of its own.

use super::node::{NodeId, NodeKind};
use super::scene_graph::SceneGraph;
use super::traverser::{ObserverError, SceneGraphObserver};

/// One visit recorded by [`CullListCollector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CulledNode {
    /// Node the visit came from
    pub parent: Option<NodeId>,
    /// Visited node
    pub node: NodeId,
    /// Whether the node had been seen before
    pub shared: bool,
    /// Depth below the traversal root
    pub depth: usize,
}

/// Observer building a cull list from a traversal
#[derive(Debug, Default)]
pub struct CullListCollector {
    entries: Vec<CulledNode>,
    layers: Vec<NodeId>,
}

impl CullListCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Every visit, in traversal order
    pub fn entries(&self) -> &[CulledNode] {
        &self.entries
    }

    /// Layer nodes met during the walk, in traversal order, without repeats
    pub fn layers(&self) -> &[NodeId] {
        &self.layers
    }

    /// Visits of nodes not seen before
    pub fn unique_entries(&self) -> impl Iterator<Item = &CulledNode> {
        self.entries.iter().filter(|entry| !entry.shared)
    }

    /// Number of recorded visits
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything collected, ready for the next frame
    pub fn clear(&mut self) {
        self.entries.clear();
        self.layers.clear();
    }
}

impl SceneGraphObserver for CullListCollector {
    fn observed_node(
        &mut self,
        graph: &SceneGraph,
        parent: Option<NodeId>,
        node: NodeId,
        shared: bool,
        depth: usize,
    ) -> Result<(), ObserverError> {
        self.entries.push(CulledNode { parent, node, shared, depth });

        let is_layer = graph
            .node(node)
            .is_some_and(|n| matches!(n.kind(), NodeKind::Layer(_)));
        if is_layer && !self.layers.contains(&node) {
            self.layers.push(node);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;

    #[test]
    fn test_collects_entries_and_layers() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Node::group());
        let layer = graph.insert(Node::layer());
        let leaf = graph.insert(Node::leaf());
        let mut collector = CullListCollector::new();

        collector.observed_node(&graph, None, root, false, 0).unwrap();
        collector.observed_node(&graph, Some(root), layer, false, 1).unwrap();
        collector.observed_node(&graph, Some(root), leaf, false, 1).unwrap();
        collector.observed_node(&graph, Some(root), layer, true, 1).unwrap();

        assert_eq!(collector.len(), 4);
        assert_eq!(collector.layers(), &[layer]);
        assert_eq!(collector.unique_entries().count(), 3);
        assert_eq!(
            collector.entries()[1],
            CulledNode { parent: Some(root), node: layer, shared: false, depth: 1 }
        );

        collector.clear();
        assert!(collector.is_empty());
        assert!(collector.layers().is_empty());
    }
}
