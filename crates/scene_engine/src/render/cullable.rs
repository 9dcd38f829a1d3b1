//! Capability contracts consumed by a cull stage
//!
//! These traits carry no algorithm of their own. A renderer combines them
//! with a [`crate::scene::SceneGraphObserver`] to build its per-frame cull
//! list: offscreen targets that need repainting schedule extra passes over
//! their layers, and view environments supply the frustum and viewport for
//! each pass.

use crate::scene::NodeId;
use super::view_environment::{ProjectionType, ViewFrustum, Viewport};

/// Marker for anything that takes part in visibility culling
pub trait Cullable {}

/// A render target that is drawn offscreen and then used as an input to a
/// later pass
pub trait OffscreenCullable: Cullable {
    /// Whether the target is stale and must be re-rendered this frame
    fn is_repaint_required(&self) -> bool;

    /// Layer to render at `index`, or `None` when out of range
    fn cullable_layer(&self, index: usize) -> Option<NodeId>;

    /// Number of valid layers. A target with no content returns `0`.
    fn num_cullable_children(&self) -> usize;
}

/// Projection and viewport state for one rendering pass
pub trait ViewEnvironmentCullable: Cullable {
    /// Projection in use
    fn projection_type(&self) -> ProjectionType;

    /// Whether this view renders in stereo
    fn is_stereo_enabled(&self) -> bool;

    /// Current view volume
    fn view_frustum(&self) -> ViewFrustum;

    /// Vertical field of view in degrees, `0 < fov <= 180`
    fn field_of_view(&self) -> f64;

    /// Viewport as pushed down from the owning layer
    fn viewport_dimensions(&self) -> Viewport;
}

/// A state component rendered as part of an object's appearance
pub trait ComponentRenderable {}

/// A texture stage that may source its image from an offscreen target
pub trait TextureRenderable: ComponentRenderable {
    /// Whether the texture content comes from an offscreen target
    fn is_offscreen_source(&self) -> bool;

    /// The offscreen target feeding this texture, `None` when
    /// [`TextureRenderable::is_offscreen_source`] is false
    fn offscreen_source(&self) -> Option<&dyn OffscreenCullable>;
}
