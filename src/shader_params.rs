//! Named shader parameters.
//!
//! The composer never touches GPU buffers directly. It pushes typed values by
//! name through [`ShaderParams`], and the renderer packs the current values of
//! a [`UniformStore`] into uniform blocks (see [`crate::uniforms`]). The names
//! below are the contract between the composer and `shaders/scene.wgsl`.

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3, Vec4};

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const USE_TEXTURE: &str = "bUseTexture";
pub const USE_LIGHTING: &str = "bUseLighting";
pub const UV_SCALE: &str = "UVscale";
pub const VIEW_POS: &str = "viewPos";

pub const MATERIAL_AMBIENT_COLOR: &str = "material.ambientColor";
pub const MATERIAL_AMBIENT_STRENGTH: &str = "material.ambientStrength";
pub const MATERIAL_DIFFUSE_COLOR: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR_COLOR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";

/// Typed push interface into the active shader program. Write-only.
pub trait ShaderParams {
    fn set_float(&mut self, name: &str, value: f32);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_vec2(&mut self, name: &str, value: Vec2);
    fn set_vec3(&mut self, name: &str, value: Vec3);
    fn set_vec4(&mut self, name: &str, value: Vec4);
    fn set_mat4(&mut self, name: &str, value: Mat4);

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_int(name, value as i32);
    }

    fn set_sampler(&mut self, name: &str, slot: i32) {
        self.set_int(name, slot);
    }
}

/// A single pushed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

/// CPU-side staging of the current shader parameter values.
///
/// Values persist until overwritten, exactly like program uniforms: anything
/// not pushed for a draw keeps whatever the previous draw left behind.
#[derive(Clone, Debug, Default)]
pub struct UniformStore {
    values: HashMap<String, UniformValue>,
}

impl UniformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            UniformValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.int(name).map(|v| v != 0)
    }

    pub fn vec2(&self, name: &str) -> Option<Vec2> {
        match self.get(name)? {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        match self.get(name)? {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec4(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            UniformValue::Vec4(v) => Some(v),
            _ => None,
        }
    }

    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match self.get(name)? {
            UniformValue::Mat4(v) => Some(v),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: UniformValue) {
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl ShaderParams for UniformStore {
    fn set_float(&mut self, name: &str, value: f32) {
        self.set(name, UniformValue::Float(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.set(name, UniformValue::Int(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.set(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set(name, UniformValue::Vec4(value));
    }

    fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set(name, UniformValue::Mat4(value));
    }
}
