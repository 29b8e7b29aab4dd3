use glam::{Mat4, Vec3};

/// Which projection the camera renders with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Fixed camera constants.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub start_position: Vec3,
    /// Degrees. -90 looks down -Z.
    pub start_yaw: f32,
    /// Degrees.
    pub start_pitch: f32,
    /// Degrees of rotation per pixel of pointer motion.
    pub sensitivity: f32,
    /// World units per second.
    pub speed: f32,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Half the width/height of the orthographic view box.
    pub ortho_half_extent: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 2.0, 8.0),
            start_yaw: -90.0,
            start_pitch: 0.0,
            sensitivity: 0.1,
            speed: 5.0,
            fov_y: 45.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
            ortho_half_extent: 10.0,
        }
    }
}

impl CameraConfig {
    /// Perspective or orthographic projection for `mode`.
    ///
    /// Depth maps to `[0, 1]` as wgpu expects.
    pub fn projection_matrix(&self, mode: ProjectionMode) -> Mat4 {
        match mode {
            ProjectionMode::Perspective => {
                Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let h = self.ortho_half_extent;
                Mat4::orthographic_rh(-h, h, -h, h, self.near, self.far)
            }
        }
    }
}

/// Persistent camera state, advanced once per frame by
/// [`FlyCameraController`](crate::FlyCameraController).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    /// Unit view direction derived from yaw and pitch.
    pub front: Vec3,
    /// Fixed world up.
    pub up: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees, kept inside `[-89, 89]`.
    pub pitch: f32,
    pub projection: ProjectionMode,
}

impl CameraState {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: config.start_position,
            front: front_from_angles(config.start_yaw, config.start_pitch),
            up: Vec3::Y,
            yaw: config.start_yaw,
            pitch: config.start_pitch,
            projection: ProjectionMode::Perspective,
        }
    }

    /// Unit vector pointing to the camera's right.
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

/// Spherical to Cartesian conversion of yaw/pitch in degrees.
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
}
