//! Scene graph node types

use std::fmt::Debug;

use slotmap::new_key_type;

use crate::render::{Cullable, ViewEnvironment, Viewport};

new_key_type! {
    /// Identity of a node inside a [`super::SceneGraph`]
    ///
    /// Ids are generational: once a node is removed its id never resolves
    /// again, even if the slot is reused.
    pub struct NodeId;
}

/// Externally defined geometry or behaviour whose children are private to
/// the renderer that supplied it
pub trait CustomRenderable: Debug {
    /// Short type name used in logs
    fn type_name(&self) -> &str;
}

/// Ordered child list. Render order follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub(super) children: Vec<NodeId>,
}

impl Group {
    /// Children in render order. May contain duplicates and stale ids.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// One compositing pass: a scene rendered into a viewport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    pub(super) scene: Option<NodeId>,
    pub(super) viewport: Viewport,
}

impl Layer {
    /// Scene rendered by this layer
    pub const fn scene(&self) -> Option<NodeId> {
        self.scene
    }

    /// Viewport the layer renders into
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Root of a render graph together with the view used to draw it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleScene {
    pub(super) root: Option<NodeId>,
    pub(super) view: ViewEnvironment,
}

impl SimpleScene {
    /// Root of the rendered geometry
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// View environment of this scene
    pub const fn view(&self) -> &ViewEnvironment {
        &self.view
    }

    /// Mutable view environment. The viewport is owned by the layer.
    pub fn view_mut(&mut self) -> &mut ViewEnvironment {
        &mut self.view
    }
}

/// Reference to a sub-graph that is instanced at several places
///
/// The wrapped child is not owned by the shared node; it lives in the arena
/// like every other node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SharedNode {
    pub(super) child: Option<NodeId>,
}

impl SharedNode {
    /// The shared sub-graph root
    pub const fn child(&self) -> Option<NodeId> {
        self.child
    }
}

/// Closed set of node kinds the traversal distinguishes
#[derive(Debug)]
pub enum NodeKind {
    /// Ordered children
    Group(Group),
    /// Compositing boundary, never descended into
    Layer(Layer),
    /// Scene root with a single rendered geometry root
    SimpleScene(SimpleScene),
    /// Instance of a shared sub-graph
    Shared(SharedNode),
    /// Renderer-defined content, never descended into
    Custom(Box<dyn CustomRenderable>),
    /// Any other node (geometry, lights, sensors, ...)
    Leaf,
}

impl NodeKind {
    /// Kind name used in logs and errors
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Group(_) => "Group",
            Self::Layer(_) => "Layer",
            Self::SimpleScene(_) => "SimpleScene",
            Self::Shared(_) => "SharedNode",
            Self::Custom(_) => "CustomRenderable",
            Self::Leaf => "Leaf",
        }
    }
}

/// A node stored in the scene graph arena
#[derive(Debug)]
pub struct Node {
    name: Option<String>,
    kind: NodeKind,
}

impl Node {
    /// Create a node of the given kind
    pub const fn new(kind: NodeKind) -> Self {
        Self { name: None, kind }
    }

    /// Empty group
    pub fn group() -> Self {
        Self::new(NodeKind::Group(Group::default()))
    }

    /// Layer with no scene and an empty viewport
    pub fn layer() -> Self {
        Self::new(NodeKind::Layer(Layer::default()))
    }

    /// Scene with no geometry and a default view
    pub fn simple_scene() -> Self {
        Self::new(NodeKind::SimpleScene(SimpleScene::default()))
    }

    /// Shared node with nothing wrapped yet
    pub fn shared() -> Self {
        Self::new(NodeKind::Shared(SharedNode::default()))
    }

    /// Renderer-defined node
    pub fn custom(renderable: Box<dyn CustomRenderable>) -> Self {
        Self::new(NodeKind::Custom(renderable))
    }

    /// Node with no children the traversal knows about
    pub const fn leaf() -> Self {
        Self::new(NodeKind::Leaf)
    }

    /// Attach a debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Debug name, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Kind and kind-specific data
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(super) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Scene data if this is a [`NodeKind::SimpleScene`]
    pub const fn as_simple_scene(&self) -> Option<&SimpleScene> {
        match &self.kind {
            NodeKind::SimpleScene(scene) => Some(scene),
            _ => None,
        }
    }

    /// Mutable scene data if this is a [`NodeKind::SimpleScene`]
    pub fn as_simple_scene_mut(&mut self) -> Option<&mut SimpleScene> {
        match &mut self.kind {
            NodeKind::SimpleScene(scene) => Some(scene),
            _ => None,
        }
    }

    /// Layer data if this is a [`NodeKind::Layer`]
    pub const fn as_layer(&self) -> Option<&Layer> {
        match &self.kind {
            NodeKind::Layer(layer) => Some(layer),
            _ => None,
        }
    }
}

impl Cullable for Node {}
