//! # Scene Engine
//!
//! Scene graph traversal and cull-stage contracts for a multi-pass renderer.
//!
//! ## Features
//!
//! - **Arena Scene Graph**: Groups, layers, scenes and shared sub-graphs with
//!   attach-time cycle rejection
//! - **Traversal**: Depth-first pre-order walk with shared-node detection and
//!   a pluggable observer callback
//! - **Cull Contracts**: Offscreen targets, view environments and texture
//!   sources consumed by a cull stage
//! - **Configuration**: TOML/RON backed view settings
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use scene_engine::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.insert(Node::group());
//! let leaf = graph.insert(Node::leaf());
//! graph.add_child(root, leaf).unwrap();
//!
//! let collector = Rc::new(RefCell::new(CullListCollector::new()));
//! let observer: ObserverHandle = collector.clone();
//!
//! let traverser = SceneGraphTraverser::new();
//! traverser.set_observer(Some(observer));
//! traverser.traverse_graph(&graph, Some(root)).unwrap();
//!
//! assert_eq!(collector.borrow().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ViewConfig},
        foundation::error_reporter::{ErrorReporter, LogErrorReporter, ReporterHandle},
        render::{
            Cullable, OffscreenCullable, ViewEnvironmentCullable,
            ComponentRenderable, TextureRenderable,
            ProjectionType, ViewEnvironment, ViewError, ViewFrustum, Viewport,
            OffscreenTexture, TextureSource, TextureUnit,
        },
        scene::{
            CulledNode, CullListCollector, CustomRenderable, GraphError, GraphId,
            Node, NodeId, NodeKind, ObserverError, ObserverHandle,
            SceneGraph, SceneGraphObserver, SceneGraphTraverser, TraversalError,
        },
    };
}
