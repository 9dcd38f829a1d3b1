//! Rendering contracts and the cull-stage state built on them
//!
//! ## Organization
//!
//! - **Cullable**: capability traits a cull stage consumes
//! - **View Environment**: projection, frustum and viewport per pass
//! - **Offscreen**: render-to-texture targets and the texture stages using them

mod cullable;
mod view_environment;
mod offscreen;

pub use cullable::{
    Cullable, OffscreenCullable, ViewEnvironmentCullable,
    ComponentRenderable, TextureRenderable,
};
pub use view_environment::{ProjectionType, ViewEnvironment, ViewError, ViewFrustum, Viewport};
pub use offscreen::{OffscreenTexture, TextureSource, TextureUnit};
