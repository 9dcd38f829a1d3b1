//! View environment: projection, frustum and viewport state for one scene
//!
//! The viewport is normally pushed down from the owning layer (see
//! [`crate::scene::SceneGraph::set_layer_viewport`]). The frustum is derived
//! on demand from the projection settings and the current viewport.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::config::ViewConfig;
use crate::foundation::math::{self, Mat4, Point3, Vec3};
use super::cullable::{Cullable, ViewEnvironmentCullable};

/// Projection used when rendering a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectionType {
    /// Perspective projection driven by the field of view
    #[default]
    Perspective,
    /// Parallel projection driven by explicit plane coordinates
    Orthographic,
}

/// The six clip planes of a view volume
///
/// Both variants flatten to the same positional layout through
/// [`ViewFrustum::as_array`], which is what a `glFrustum`/`glOrtho` style
/// call expects. Keep using the named fields everywhere else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewFrustum {
    /// Perspective volume
    Perspective {
        /// Left extent at the near plane
        x_min: f64,
        /// Right extent at the near plane
        x_max: f64,
        /// Bottom extent at the near plane
        y_min: f64,
        /// Top extent at the near plane
        y_max: f64,
        /// Near clip distance
        z_near: f64,
        /// Far clip distance
        z_far: f64,
    },
    /// Orthographic volume
    Orthographic {
        /// Left plane coordinate
        left: f64,
        /// Right plane coordinate
        right: f64,
        /// Bottom plane coordinate
        bottom: f64,
        /// Top plane coordinate
        top: f64,
        /// Near clip distance
        near: f64,
        /// Far clip distance
        far: f64,
    },
}

impl ViewFrustum {
    /// Projection type this volume was built for
    pub const fn projection_type(&self) -> ProjectionType {
        match self {
            Self::Perspective { .. } => ProjectionType::Perspective,
            Self::Orthographic { .. } => ProjectionType::Orthographic,
        }
    }

    /// Flatten to `[x_min, x_max, y_min, y_max, near, far]` (perspective) or
    /// `[left, right, bottom, top, near, far]` (orthographic)
    pub const fn as_array(&self) -> [f64; 6] {
        match *self {
            Self::Perspective { x_min, x_max, y_min, y_max, z_near, z_far } =>
                [x_min, x_max, y_min, y_max, z_near, z_far],
            Self::Orthographic { left, right, bottom, top, near, far } =>
                [left, right, bottom, top, near, far],
        }
    }

    /// Projection matrix for this volume
    pub fn to_projection_matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective { x_min, x_max, y_min, y_max, z_near, z_far } =>
                math::frustum_matrix(x_min, x_max, y_min, y_max, z_near, z_far),
            Self::Orthographic { left, right, bottom, top, near, far } =>
                math::ortho_matrix(left, right, bottom, top, near, far),
        }
    }
}

/// Pixel rectangle a view renders into, lower-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Lower left x coordinate
    pub x: i32,
    /// Lower left y coordinate
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Viewport {
    /// Create a new viewport
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Flatten to `[x, y, width, height]`
    pub const fn as_array(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// View environment errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ViewError {
    /// Field of view outside `(0, 180]`
    #[error("The field of view angle {0} is invalid. Must be between 0 and 180")]
    InvalidFieldOfView(f64),

    /// Negative clip distance under perspective projection
    #[error("Clip distance {0} is negative, which is not allowed for perspective projection")]
    NegativeClipDistance(f64),

    /// Near plane at or beyond the far plane
    #[error("The near clip plane {near} is not closer than the far clip plane {far}")]
    InvertedClipDistances {
        /// Requested near distance
        near: f64,
        /// Requested far distance
        far: f64,
    },
}

/// Projection, stereo and viewport state used to render one scene
#[derive(Debug, Clone, PartialEq)]
pub struct ViewEnvironment {
    stereo: bool,
    projection: ProjectionType,
    field_of_view: f64,
    near_clip: f64,
    far_clip: f64,
    aspect_ratio: f64,
    viewport: Viewport,
    ortho_left: f64,
    ortho_right: f64,
    ortho_bottom: f64,
    ortho_top: f64,
}

impl Default for ViewEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewEnvironment {
    /// Create a view with perspective projection, a 45 degree field of view
    /// and stereo disabled
    pub const fn new() -> Self {
        Self {
            stereo: false,
            projection: ProjectionType::Perspective,
            field_of_view: 45.0,
            near_clip: 0.01,
            far_clip: 1000.0,
            aspect_ratio: 0.0,
            viewport: Viewport::new(0, 0, 0, 0),
            ortho_left: -1.0,
            ortho_right: 1.0,
            ortho_bottom: -1.0,
            ortho_top: 1.0,
        }
    }

    /// Build a view from configuration, validating every value
    pub fn from_config(config: &ViewConfig) -> Result<Self, ViewError> {
        let mut view = Self::new();
        view.set_projection_type(config.projection);
        view.set_field_of_view(config.field_of_view)?;
        view.set_clip_distance(config.near_clip, config.far_clip)?;
        view.set_aspect_ratio(config.aspect_ratio);
        view.set_stereo_enabled(config.stereo);
        let [left, right, bottom, top] = config.ortho_params;
        view.set_ortho_params(left, right, bottom, top);
        Ok(view)
    }

    /// Enable or disable stereo rendering
    pub fn set_stereo_enabled(&mut self, stereo: bool) {
        self.stereo = stereo;
    }

    /// Switch between perspective and orthographic projection
    pub fn set_projection_type(&mut self, projection: ProjectionType) {
        self.projection = projection;
    }

    /// Set the vertical field of view in degrees
    pub fn set_field_of_view(&mut self, angle: f64) -> Result<(), ViewError> {
        if angle <= 0.0 || angle > 180.0 || angle.is_nan() {
            return Err(ViewError::InvalidFieldOfView(angle));
        }

        self.field_of_view = angle;
        Ok(())
    }

    /// Set width / height. A ratio `<= 0` is derived from the viewport.
    pub fn set_aspect_ratio(&mut self, aspect: f64) {
        self.aspect_ratio = aspect;
    }

    /// Currently set aspect ratio
    pub const fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Set the near clip distance
    pub fn set_near_clip_distance(&mut self, distance: f64) -> Result<(), ViewError> {
        self.check_clip(distance)?;

        if distance >= self.far_clip {
            return Err(ViewError::InvertedClipDistances { near: distance, far: self.far_clip });
        }

        self.near_clip = distance;
        Ok(())
    }

    /// Set the far clip distance
    pub fn set_far_clip_distance(&mut self, distance: f64) -> Result<(), ViewError> {
        self.check_clip(distance)?;

        if distance <= self.near_clip {
            return Err(ViewError::InvertedClipDistances { near: self.near_clip, far: distance });
        }

        self.far_clip = distance;
        Ok(())
    }

    /// Set both clip distances at once
    pub fn set_clip_distance(&mut self, near: f64, far: f64) -> Result<(), ViewError> {
        self.check_clip(near)?;
        self.check_clip(far)?;

        if near >= far {
            return Err(ViewError::InvertedClipDistances { near, far });
        }

        self.near_clip = near;
        self.far_clip = far;
        Ok(())
    }

    /// Near clip distance
    pub const fn near_clip_distance(&self) -> f64 {
        self.near_clip
    }

    /// Far clip distance
    pub const fn far_clip_distance(&self) -> f64 {
        self.far_clip
    }

    /// Set the orthographic plane coordinates
    pub fn set_ortho_params(&mut self, left: f64, right: f64, bottom: f64, top: f64) {
        self.ortho_left = left;
        self.ortho_right = right;
        self.ortho_bottom = bottom;
        self.ortho_top = top;
    }

    /// Set the viewport this view renders into. Called by the owning layer.
    pub(crate) fn set_viewport_dimensions(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Convert a pixel location to a point on the near plane of the view
    ///
    /// `eye_offset` shifts the frustum, which stereo rendering uses to offset
    /// each eye. Returns `None` while the viewport has a zero width or height.
    pub fn pixel_location_in_surface(&self, x: f32, y: f32, eye_offset: Option<Vec3>) -> Option<Point3> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return None;
        }

        let [x_min, x_max, y_min, y_max, near, _] = self.view_frustum().as_array();
        let offset = eye_offset.unwrap_or_else(Vec3::zeros);

        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        let (x, y) = (f64::from(x), f64::from(y));

        let surface_x = ((x_max - offset.x) - (x_min - offset.x)) * (x / width - 0.5);
        let surface_y = ((y_max - offset.y) - (y_min - offset.y)) * ((height - y) / height - 0.5);
        let surface_z = -(near - offset.z);

        Some(Point3::new(surface_x, surface_y, surface_z))
    }

    fn check_clip(&self, distance: f64) -> Result<(), ViewError> {
        if self.projection == ProjectionType::Perspective && distance < 0.0 {
            return Err(ViewError::NegativeClipDistance(distance));
        }
        Ok(())
    }

    fn effective_aspect_ratio(&self) -> f64 {
        if self.aspect_ratio > 0.0 {
            self.aspect_ratio
        } else if self.viewport.height == 0 {
            1.0
        } else {
            f64::from(self.viewport.width) / f64::from(self.viewport.height)
        }
    }
}

impl Cullable for ViewEnvironment {}

impl ViewEnvironmentCullable for ViewEnvironment {
    fn projection_type(&self) -> ProjectionType {
        self.projection
    }

    fn is_stereo_enabled(&self) -> bool {
        self.stereo
    }

    fn view_frustum(&self) -> ViewFrustum {
        match self.projection {
            ProjectionType::Perspective => {
                let y_max = self.near_clip * (self.field_of_view.to_radians() / 2.0).tan();
                let y_min = -y_max;
                let aspect = self.effective_aspect_ratio();

                ViewFrustum::Perspective {
                    x_min: y_min * aspect,
                    x_max: y_max * aspect,
                    y_min,
                    y_max,
                    z_near: self.near_clip,
                    z_far: self.far_clip,
                }
            }
            ProjectionType::Orthographic => ViewFrustum::Orthographic {
                left: self.ortho_left,
                right: self.ortho_right,
                bottom: self.ortho_bottom,
                top: self.ortho_top,
                near: self.near_clip,
                far: self.far_clip,
            },
        }
    }

    fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    fn viewport_dimensions(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let view = ViewEnvironment::new();

        assert_eq!(view.projection_type(), ProjectionType::Perspective);
        assert!(!view.is_stereo_enabled());
        assert_eq!(view.field_of_view(), 45.0);
        assert_eq!(view.viewport_dimensions().as_array(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_field_of_view_bounds() {
        let mut view = ViewEnvironment::new();

        assert_eq!(view.set_field_of_view(0.0), Err(ViewError::InvalidFieldOfView(0.0)));
        assert_eq!(view.set_field_of_view(180.5), Err(ViewError::InvalidFieldOfView(180.5)));
        assert!(view.set_field_of_view(180.0).is_ok());
        assert_eq!(view.field_of_view(), 180.0);
    }

    #[test]
    fn test_clip_validation() {
        let mut view = ViewEnvironment::new();

        assert_eq!(view.set_near_clip_distance(-1.0), Err(ViewError::NegativeClipDistance(-1.0)));
        assert!(matches!(view.set_clip_distance(10.0, 5.0), Err(ViewError::InvertedClipDistances { .. })));
        assert!(matches!(view.set_far_clip_distance(0.001), Err(ViewError::InvertedClipDistances { .. })));

        view.set_projection_type(ProjectionType::Orthographic);
        assert!(view.set_clip_distance(-10.0, 10.0).is_ok());
        assert_eq!(view.near_clip_distance(), -10.0);
    }

    #[test]
    fn test_perspective_frustum_uses_viewport_aspect() {
        let mut view = ViewEnvironment::new();
        view.set_field_of_view(90.0).unwrap();
        view.set_clip_distance(1.0, 100.0).unwrap();
        view.set_viewport_dimensions(Viewport::new(0, 0, 200, 100));

        let [x_min, x_max, y_min, y_max, near, far] = view.view_frustum().as_array();

        assert_relative_eq!(y_max, 1.0, epsilon = 1e-12);
        assert_relative_eq!(y_min, -1.0, epsilon = 1e-12);
        assert_relative_eq!(x_min, -2.0, epsilon = 1e-12);
        assert_relative_eq!(x_max, 2.0, epsilon = 1e-12);
        assert_eq!((near, far), (1.0, 100.0));
    }

    #[test]
    fn test_explicit_aspect_overrides_viewport() {
        let mut view = ViewEnvironment::new();
        view.set_field_of_view(90.0).unwrap();
        view.set_clip_distance(1.0, 10.0).unwrap();
        view.set_viewport_dimensions(Viewport::new(0, 0, 200, 100));
        view.set_aspect_ratio(0.5);

        match view.view_frustum() {
            ViewFrustum::Perspective { x_max, .. } => assert_relative_eq!(x_max, 0.5, epsilon = 1e-12),
            other => panic!("unexpected frustum {other:?}"),
        }
    }

    #[test]
    fn test_zero_height_viewport_uses_square_aspect() {
        let mut view = ViewEnvironment::new();
        view.set_field_of_view(90.0).unwrap();
        view.set_clip_distance(1.0, 10.0).unwrap();

        let [x_min, x_max, ..] = view.view_frustum().as_array();

        assert!(x_min.is_finite() && x_max.is_finite());
        assert_relative_eq!(x_max, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_orthographic_frustum_uses_ortho_params() {
        let mut view = ViewEnvironment::new();
        view.set_projection_type(ProjectionType::Orthographic);
        view.set_ortho_params(-4.0, 4.0, -3.0, 3.0);
        view.set_clip_distance(0.5, 20.0).unwrap();

        let frustum = view.view_frustum();

        assert_eq!(frustum.projection_type(), ProjectionType::Orthographic);
        assert_eq!(frustum.as_array(), [-4.0, 4.0, -3.0, 3.0, 0.5, 20.0]);
    }

    #[test]
    fn test_pixel_location_requires_viewport() {
        let mut view = ViewEnvironment::new();
        assert!(view.pixel_location_in_surface(1.0, 1.0, None).is_none());

        view.set_viewport_dimensions(Viewport::new(0, 0, 100, 0));
        assert!(view.pixel_location_in_surface(1.0, 1.0, None).is_none());

        view.set_field_of_view(90.0).unwrap();
        view.set_clip_distance(1.0, 10.0).unwrap();
        view.set_viewport_dimensions(Viewport::new(0, 0, 100, 100));

        let centre = view.pixel_location_in_surface(50.0, 50.0, None).unwrap();
        assert_relative_eq!(centre.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(centre.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(centre.z, -1.0, epsilon = 1e-12);

        let corner = view.pixel_location_in_surface(100.0, 0.0, None).unwrap();
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(corner.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_config_rejects_bad_values() {
        let config = ViewConfig {
            field_of_view: 200.0,
            ..ViewConfig::default()
        };
        assert_eq!(ViewEnvironment::from_config(&config), Err(ViewError::InvalidFieldOfView(200.0)));

        let config = ViewConfig {
            projection: ProjectionType::Orthographic,
            stereo: true,
            ..ViewConfig::default()
        };
        let view = ViewEnvironment::from_config(&config).unwrap();
        assert!(view.is_stereo_enabled());
        assert_eq!(view.projection_type(), ProjectionType::Orthographic);
    }
}
