//! Scene graph model and traversal
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (arena, owns nodes)
//!      ↓
//! SceneGraphTraverser (depth-first walk, shared-node detection)
//!      ↓
//! SceneGraphObserver (cull list, bounds collection, ...)
//! ```
//!
//! The traverser's contract is purely structural: it decides which nodes are
//! visited and in what order. Everything a renderer does with a visit lives
//! in the observer.

mod node;
mod scene_graph;
mod traverser;
mod cull_list;

#[cfg(test)]
mod tests;

pub use node::{CustomRenderable, Group, Layer, Node, NodeId, NodeKind, SharedNode, SimpleScene};
pub use scene_graph::{GraphError, GraphId, SceneGraph};
pub use traverser::{
    ObserverError, ObserverHandle, SceneGraphObserver, SceneGraphTraverser, TraversalError,
};
pub use cull_list::{CulledNode, CullListCollector};
