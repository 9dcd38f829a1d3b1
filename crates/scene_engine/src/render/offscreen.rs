//! Offscreen render targets and the texture stages that sample them

use crate::scene::{GraphError, NodeId, NodeKind, SceneGraph};
use super::cullable::{ComponentRenderable, Cullable, OffscreenCullable, TextureRenderable};

/// A texture whose image is produced by rendering a set of layers offscreen
#[derive(Debug, Clone, PartialEq)]
pub struct OffscreenTexture {
    width: u32,
    height: u32,
    clear_color: [f32; 4],
    layers: Vec<NodeId>,
    repaint_required: bool,
}

impl OffscreenTexture {
    /// Create an empty target of the given size
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear_color: [0.0; 4],
            layers: Vec::new(),
            repaint_required: false,
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Replace the ordered list of layers rendered into this target
    ///
    /// Every id must name a layer node in `graph`. On error the current list
    /// is left untouched.
    pub fn set_layers(&mut self, graph: &SceneGraph, layers: Vec<NodeId>) -> Result<(), GraphError> {
        for &layer in &layers {
            let node = graph.node(layer).ok_or(GraphError::NodeNotFound(layer))?;
            if !matches!(node.kind(), NodeKind::Layer(_)) {
                return Err(GraphError::InvalidNodeType { node: layer, expected: "Layer" });
            }
        }

        log::debug!("Offscreen target {}x{} now renders {} layers", self.width, self.height, layers.len());
        self.layers = layers;
        Ok(())
    }

    /// Layers rendered into this target, in order
    pub fn layers(&self) -> &[NodeId] {
        &self.layers
    }

    /// Flag the target for repainting on the next frame, or clear the flag
    pub fn set_repaint_required(&mut self, enable: bool) {
        self.repaint_required = enable;
    }

    /// Colour the target is cleared to before its layers are drawn
    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.clear_color = [r, g, b, a];
    }

    /// Current clear colour as RGBA
    pub const fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }
}

impl Cullable for OffscreenTexture {}

impl OffscreenCullable for OffscreenTexture {
    fn is_repaint_required(&self) -> bool {
        self.repaint_required
    }

    fn cullable_layer(&self, index: usize) -> Option<NodeId> {
        self.layers.get(index).copied()
    }

    fn num_cullable_children(&self) -> usize {
        self.layers.len()
    }
}

/// Where a texture stage gets its image from
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    /// Static image data already resident
    Image {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Image rendered each frame by an offscreen target
    Offscreen(OffscreenTexture),
}

/// One texture stage of an appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureUnit {
    source: Option<TextureSource>,
}

impl TextureUnit {
    /// Create a texture stage with no texture
    pub const fn new() -> Self {
        Self { source: None }
    }

    /// Create a texture stage sampling the given source
    pub const fn with_source(source: TextureSource) -> Self {
        Self { source: Some(source) }
    }

    /// Replace the texture source
    pub fn set_source(&mut self, source: Option<TextureSource>) {
        self.source = source;
    }

    /// Current texture source
    pub const fn source(&self) -> Option<&TextureSource> {
        self.source.as_ref()
    }

    /// Mutable access to the offscreen target, if that is the source
    pub fn offscreen_source_mut(&mut self) -> Option<&mut OffscreenTexture> {
        match &mut self.source {
            Some(TextureSource::Offscreen(target)) => Some(target),
            _ => None,
        }
    }
}

impl ComponentRenderable for TextureUnit {}

impl TextureRenderable for TextureUnit {
    fn is_offscreen_source(&self) -> bool {
        matches!(self.source, Some(TextureSource::Offscreen(_)))
    }

    fn offscreen_source(&self) -> Option<&dyn OffscreenCullable> {
        match &self.source {
            Some(TextureSource::Offscreen(target)) => Some(target as &dyn OffscreenCullable),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;

    #[test]
    fn test_empty_target_reports_zero_children() {
        let target = OffscreenTexture::new(256, 256);

        assert_eq!(target.num_cullable_children(), 0);
        assert_eq!(target.cullable_layer(0), None);
        assert!(!target.is_repaint_required());
    }

    #[test]
    fn test_set_layers_only_accepts_layer_nodes() {
        let mut graph = SceneGraph::new();
        let layer_a = graph.insert(Node::layer());
        let layer_b = graph.insert(Node::layer());
        let group = graph.insert(Node::group());
        let mut target = OffscreenTexture::new(128, 64);

        let err = target.set_layers(&graph, vec![layer_a, group]).unwrap_err();
        assert_eq!(err, GraphError::InvalidNodeType { node: group, expected: "Layer" });
        assert_eq!(target.num_cullable_children(), 0);

        target.set_layers(&graph, vec![layer_a, layer_b]).unwrap();
        assert_eq!(target.num_cullable_children(), 2);
        assert_eq!(target.cullable_layer(1), Some(layer_b));
        assert_eq!(target.cullable_layer(2), None);
    }

    #[test]
    fn test_clearing_layers_returns_to_zero() {
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Node::layer());
        let mut target = OffscreenTexture::new(32, 32);

        target.set_layers(&graph, vec![layer]).unwrap();
        target.set_layers(&graph, Vec::new()).unwrap();

        assert_eq!(target.num_cullable_children(), 0);
    }

    #[test]
    fn test_texture_unit_offscreen_source() {
        let image = TextureUnit::with_source(TextureSource::Image { width: 4, height: 4 });
        assert!(!image.is_offscreen_source());
        assert!(image.offscreen_source().is_none());

        let mut target = OffscreenTexture::new(64, 64);
        target.set_repaint_required(true);
        let unit = TextureUnit::with_source(TextureSource::Offscreen(target));

        assert!(unit.is_offscreen_source());
        let source = unit.offscreen_source().unwrap();
        assert!(source.is_repaint_required());
        assert_eq!(source.num_cullable_children(), 0);

        assert!(!TextureUnit::new().is_offscreen_source());
    }
}
