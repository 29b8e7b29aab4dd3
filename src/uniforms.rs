//! GPU uniform blocks packed from a [`UniformStore`].
//!
//! Every `vec3` is followed by a scalar or an explicit pad so the Rust layout
//! matches WGSL uniform address space rules without implicit padding. The
//! structs mirror those in `shaders/scene.wgsl` field for field.
//!
//! Parameters that were never pushed fall back to neutral values: identity
//! matrices, white object color, unit UV scale, texturing and lighting off.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::shader_params::{self as names, UniformStore};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniforms {
    pub ambient_color: [f32; 3],
    pub ambient_strength: f32,
    pub diffuse_color: [f32; 3],
    pub _pad0: f32,
    pub specular_color: [f32; 3],
    pub shininess: f32,
}

/// Per-draw state, written at a dynamic offset for every recorded draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`, for transforming normals.
    pub normal_matrix: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub uv_scale: [f32; 2],
    pub object_texture: i32,
    pub use_texture: u32,
    pub material: MaterialUniforms,
}

impl ObjectUniforms {
    /// Pack the per-draw parameters currently staged in `store`.
    pub fn from_store(store: &UniformStore) -> Self {
        let model = store.mat4(names::MODEL).unwrap_or(Mat4::IDENTITY);
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix(model).to_cols_array_2d(),
            object_color: store
                .vec4(names::OBJECT_COLOR)
                .unwrap_or(Vec4::ONE)
                .to_array(),
            uv_scale: store.vec2(names::UV_SCALE).unwrap_or(Vec2::ONE).to_array(),
            object_texture: store.int(names::OBJECT_TEXTURE).unwrap_or(0),
            use_texture: store.bool(names::USE_TEXTURE).unwrap_or(false) as u32,
            material: MaterialUniforms {
                ambient_color: vec3_or(store, names::MATERIAL_AMBIENT_COLOR, Vec3::ZERO),
                ambient_strength: store.float(names::MATERIAL_AMBIENT_STRENGTH).unwrap_or(0.0),
                diffuse_color: vec3_or(store, names::MATERIAL_DIFFUSE_COLOR, Vec3::ONE),
                _pad0: 0.0,
                specular_color: vec3_or(store, names::MATERIAL_SPECULAR_COLOR, Vec3::ZERO),
                shininess: store.float(names::MATERIAL_SHININESS).unwrap_or(32.0),
            },
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirLightUniforms {
    pub direction: [f32; 3],
    pub _pad0: f32,
    pub ambient: [f32; 3],
    pub _pad1: f32,
    pub diffuse: [f32; 3],
    pub _pad2: f32,
    pub specular: [f32; 3],
    pub _pad3: f32,
}

/// Attenuation coefficients ride in the `w` lanes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniforms {
    pub position: [f32; 3],
    pub constant: f32,
    pub ambient: [f32; 3],
    pub linear: f32,
    pub diffuse: [f32; 3],
    pub quadratic: f32,
    pub specular: [f32; 3],
    pub _pad0: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightUniforms {
    pub position: [f32; 3],
    pub constant: f32,
    pub direction: [f32; 3],
    pub linear: f32,
    pub ambient: [f32; 3],
    pub quadratic: f32,
    pub diffuse: [f32; 3],
    pub cut_off: f32,
    pub specular: [f32; 3],
    pub outer_cut_off: f32,
}

/// Per-frame state: camera and lights.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_pos: [f32; 3],
    pub use_lighting: u32,
    pub dir_light: DirLightUniforms,
    pub point_light: PointLightUniforms,
    pub point_light2: PointLightUniforms,
    pub spot_light: SpotLightUniforms,
}

impl FrameUniforms {
    pub fn from_store(store: &UniformStore) -> Self {
        let dir = |field: &str| vec3_or(store, &format!("dirLight.{field}"), Vec3::ZERO);
        let spot = |field: &str| vec3_or(store, &format!("spotLight.{field}"), Vec3::ZERO);
        let spot_f = |field: &str| store.float(&format!("spotLight.{field}")).unwrap_or(0.0);

        Self {
            view: mat4_or_identity(store, names::VIEW),
            projection: mat4_or_identity(store, names::PROJECTION),
            view_pos: vec3_or(store, names::VIEW_POS, Vec3::ZERO),
            use_lighting: store.bool(names::USE_LIGHTING).unwrap_or(false) as u32,
            dir_light: DirLightUniforms {
                direction: dir("direction"),
                ambient: dir("ambient"),
                diffuse: dir("diffuse"),
                specular: dir("specular"),
                ..Default::default()
            },
            point_light: point_light(store, "pointLight"),
            point_light2: point_light(store, "pointLight2"),
            spot_light: SpotLightUniforms {
                position: spot("position"),
                constant: store.float("spotLight.constant").unwrap_or(1.0),
                direction: spot("direction"),
                linear: spot_f("linear"),
                ambient: spot("ambient"),
                quadratic: spot_f("quadratic"),
                diffuse: spot("diffuse"),
                cut_off: spot_f("cutOff"),
                specular: spot("specular"),
                outer_cut_off: spot_f("outerCutOff"),
            },
        }
    }
}

fn point_light(store: &UniformStore, prefix: &str) -> PointLightUniforms {
    let v = |field: &str| vec3_or(store, &format!("{prefix}.{field}"), Vec3::ZERO);
    let f = |field: &str, default: f32| {
        store
            .float(&format!("{prefix}.{field}"))
            .unwrap_or(default)
    };
    PointLightUniforms {
        position: v("position"),
        constant: f("constant", 1.0),
        ambient: v("ambient"),
        linear: f("linear", 0.0),
        diffuse: v("diffuse"),
        quadratic: f("quadratic", 0.0),
        specular: v("specular"),
        _pad0: 0.0,
    }
}

/// Inverse-transpose of `model`. A singular model, such as one with a zero
/// scale axis, has no inverse and gets identity instead of NaNs.
fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant() == 0.0 {
        Mat4::IDENTITY
    } else {
        model.inverse().transpose()
    }
}

fn vec3_or(store: &UniformStore, name: &str, default: Vec3) -> [f32; 3] {
    store.vec3(name).unwrap_or(default).to_array()
}

fn mat4_or_identity(store: &UniformStore, name: &str) -> [[f32; 4]; 4] {
    store
        .mat4(name)
        .unwrap_or(Mat4::IDENTITY)
        .to_cols_array_2d()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::SceneLights;
    use crate::shader_params::ShaderParams;
    use std::mem::size_of;

    #[test]
    fn block_sizes_match_shader_layout() {
        assert_eq!(size_of::<MaterialUniforms>(), 48);
        assert_eq!(size_of::<ObjectUniforms>(), 208);
        assert_eq!(size_of::<DirLightUniforms>(), 64);
        assert_eq!(size_of::<PointLightUniforms>(), 64);
        assert_eq!(size_of::<SpotLightUniforms>(), 80);
        assert_eq!(size_of::<FrameUniforms>(), 416);
    }

    #[test]
    fn unset_object_parameters_are_neutral() {
        let object = ObjectUniforms::from_store(&UniformStore::new());
        assert_eq!(object.model, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(object.object_color, [1.0; 4]);
        assert_eq!(object.uv_scale, [1.0, 1.0]);
        assert_eq!(object.use_texture, 0);
    }

    #[test]
    fn object_block_reflects_pushed_values() {
        let mut store = UniformStore::new();
        let model = Mat4::from_scale(Vec3::new(2.0, 4.0, 1.0));
        store.set_mat4(names::MODEL, model);
        store.set_bool(names::USE_TEXTURE, true);
        store.set_sampler(names::OBJECT_TEXTURE, 3);
        store.set_vec2(names::UV_SCALE, Vec2::new(4.0, 2.0));
        store.set_float(names::MATERIAL_SHININESS, 96.0);

        let object = ObjectUniforms::from_store(&store);
        assert_eq!(object.use_texture, 1);
        assert_eq!(object.object_texture, 3);
        assert_eq!(object.uv_scale, [4.0, 2.0]);
        assert_eq!(object.material.shininess, 96.0);

        // Non-uniform scale: the normal matrix divides instead of multiplies.
        let normal = Mat4::from_cols_array_2d(&object.normal_matrix);
        let n = normal.transform_vector3(Vec3::Y);
        assert!((n - Vec3::new(0.0, 0.25, 0.0)).length() < 1e-6);
    }

    #[test]
    fn zero_scale_model_keeps_a_finite_normal_matrix() {
        let mut store = UniformStore::new();
        store.set_mat4(names::MODEL, Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)));

        let object = ObjectUniforms::from_store(&store);
        assert!(object.normal_matrix.iter().flatten().all(|v| v.is_finite()));
        assert_eq!(object.normal_matrix, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn frame_block_carries_light_rig() {
        let mut store = UniformStore::new();
        let lights = SceneLights::desk(Vec3::new(0.0, 2.0, 8.0), Vec3::NEG_Z);
        lights.push(&mut store);
        store.set_bool(names::USE_LIGHTING, true);

        let frame = FrameUniforms::from_store(&store);
        assert_eq!(frame.use_lighting, 1);
        assert_eq!(frame.point_light.position, lights.point.position.to_array());
        assert_eq!(frame.point_light2.quadratic, lights.point2.attenuation.quadratic);
        assert_eq!(frame.spot_light.position, [0.0, 2.0, 8.0]);
        assert_eq!(frame.spot_light.outer_cut_off, lights.spot.outer_cut_off);
        assert_eq!(frame.dir_light.direction, [-0.2, -1.0, -0.1]);
    }
}
