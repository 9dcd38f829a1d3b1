//! Demo scene: a main layer plus a mirror layer rendered offscreen
//!
//! ```text
//! main layer ── scene ── root ─┬─ floor
//!                              ├─ shared(ship)
//!                              ├─ shared(ship)
//!                              ├─ mirror quad (custom)
//!                              └─ hud layer (opaque)
//! mirror layer ── scene ── shared(ship)
//! ```

use scene_engine::prelude::*;

/// Quad drawn with the offscreen mirror texture
#[derive(Debug)]
pub struct MirrorQuad;

impl CustomRenderable for MirrorQuad {
    fn type_name(&self) -> &str {
        "MirrorQuad"
    }
}

/// Everything the walker needs to cull a frame
pub struct DemoScene {
    /// Node arena
    pub graph: SceneGraph,
    /// Layer rendered to the window
    pub main_layer: NodeId,
    /// Texture stage of the mirror quad, fed by the mirror layer
    pub mirror_texture: TextureUnit,
}

/// Build the demo scene using `view` for the main scene
pub fn build(view: ViewEnvironment, window_size: [i32; 2]) -> Result<DemoScene, GraphError> {
    let mut graph = SceneGraph::new();

    let ship = graph.insert(Node::leaf().with_name("ship"));
    let floor = graph.insert(Node::leaf().with_name("floor"));

    let root = graph.insert(Node::group().with_name("root"));
    graph.add_child(root, floor)?;
    for _ in 0..2 {
        let instance = graph.insert(Node::shared().with_name("ship instance"));
        graph.set_shared_child(instance, Some(ship))?;
        graph.add_child(root, instance)?;
    }

    // Mirror pass renders the ship again from a second camera
    let mirror_layer = graph.insert(Node::layer().with_name("mirror layer"));
    let mirror_scene = graph.insert(Node::simple_scene().with_name("mirror scene"));
    let mirror_instance = graph.insert(Node::shared().with_name("mirrored ship"));
    graph.set_shared_child(mirror_instance, Some(ship))?;
    graph.set_scene_root(mirror_scene, Some(mirror_instance))?;
    graph.set_layer_scene(mirror_layer, Some(mirror_scene))?;
    graph.set_layer_viewport(mirror_layer, Viewport::new(0, 0, 256, 256))?;

    let mut mirror = OffscreenTexture::new(256, 256);
    mirror.set_layers(&graph, vec![mirror_layer])?;
    mirror.set_clear_color(0.1, 0.1, 0.2, 1.0);
    mirror.set_repaint_required(true);

    let mirror_texture = TextureUnit::with_source(TextureSource::Offscreen(mirror));
    let quad = graph.insert(Node::custom(Box::new(MirrorQuad)).with_name("mirror quad"));
    graph.add_child(root, quad)?;

    let hud = graph.insert(Node::layer().with_name("hud layer"));
    graph.add_child(root, hud)?;

    let main_scene = graph.insert(Node::simple_scene().with_name("main scene"));
    graph.set_scene_root(main_scene, Some(root))?;
    if let Some(scene) = graph.node_mut(main_scene).and_then(Node::as_simple_scene_mut) {
        *scene.view_mut() = view;
    }

    let main_layer = graph.insert(Node::layer().with_name("main layer"));
    graph.set_layer_scene(main_layer, Some(main_scene))?;
    graph.set_layer_viewport(main_layer, Viewport::new(0, 0, window_size[0], window_size[1]))?;

    Ok(DemoScene { graph, main_layer, mirror_texture })
}
