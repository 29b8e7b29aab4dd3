//! Multi-light Phong illumination.
//!
//! The scene is lit by exactly four lights: one directional, two point lights
//! and a spotlight that follows the camera. [`SceneLights::push`] uploads them
//! under the `dirLight.*`, `pointLight.*`, `pointLight2.*` and `spotLight.*`
//! names every frame. The per-fragment evaluation runs in
//! `shaders/scene.wgsl`; [`shade`] is the same model on the CPU and is what the
//! tests pin down.

use glam::{Vec3, Vec4};

use crate::material::Material;
use crate::shader_params::ShaderParams;

/// Inverse-quadratic distance falloff coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// `1 / (constant + linear * d + quadratic * d^2)`
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in, not necessarily normalized.
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    /// Cosine of the inner cone angle.
    pub cut_off: f32,
    /// Cosine of the outer cone angle.
    pub outer_cut_off: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

impl SpotLight {
    /// Smooth cone-edge factor in `[0, 1]` for a unit vector pointing from
    /// the fragment toward the light.
    pub fn cone_factor(&self, to_light: Vec3) -> f32 {
        let theta = to_light.dot((-self.direction).normalize_or_zero());
        let epsilon = self.cut_off - self.outer_cut_off;
        ((theta - self.outer_cut_off) / epsilon).clamp(0.0, 1.0)
    }
}

/// The four lights of the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLights {
    pub directional: DirectionalLight,
    pub point: PointLight,
    pub point2: PointLight,
    pub spot: SpotLight,
}

impl SceneLights {
    /// Soft overhead light, a cool front fill, a warm rim light and a camera
    /// torch at `camera_position` pointing along `camera_front`.
    pub fn desk(camera_position: Vec3, camera_front: Vec3) -> Self {
        Self {
            directional: DirectionalLight {
                direction: Vec3::new(-0.2, -1.0, -0.1),
                ambient: Vec3::splat(0.4),
                diffuse: Vec3::splat(0.7),
                specular: Vec3::splat(0.7),
            },
            point: PointLight {
                position: Vec3::new(0.0, 4.0, 6.0),
                ambient: Vec3::splat(0.25),
                diffuse: Vec3::splat(0.75),
                specular: Vec3::splat(1.0),
                attenuation: Attenuation::new(1.0, 0.09, 0.032),
            },
            point2: PointLight {
                position: Vec3::new(-4.0, 3.0, -2.0),
                ambient: Vec3::new(0.08, 0.04, 0.02),
                diffuse: Vec3::new(0.3, 0.15, 0.08),
                specular: Vec3::new(0.4, 0.2, 0.1),
                attenuation: Attenuation::new(1.0, 0.14, 0.07),
            },
            spot: SpotLight {
                position: camera_position,
                direction: camera_front,
                cut_off: 10.0_f32.to_radians().cos(),
                outer_cut_off: 15.0_f32.to_radians().cos(),
                ambient: Vec3::splat(0.15),
                diffuse: Vec3::splat(0.8),
                specular: Vec3::splat(1.0),
                attenuation: Attenuation::new(1.0, 0.09, 0.032),
            },
        }
    }

    /// Move the torch to follow the camera.
    pub fn track_camera(&mut self, camera_position: Vec3, camera_front: Vec3) {
        self.spot.position = camera_position;
        self.spot.direction = camera_front;
    }

    pub fn push(&self, params: &mut impl ShaderParams) {
        let d = &self.directional;
        params.set_vec3("dirLight.direction", d.direction);
        params.set_vec3("dirLight.ambient", d.ambient);
        params.set_vec3("dirLight.diffuse", d.diffuse);
        params.set_vec3("dirLight.specular", d.specular);

        push_point(params, "pointLight", &self.point);
        push_point(params, "pointLight2", &self.point2);

        let s = &self.spot;
        params.set_vec3("spotLight.position", s.position);
        params.set_vec3("spotLight.direction", s.direction);
        params.set_float("spotLight.cutOff", s.cut_off);
        params.set_float("spotLight.outerCutOff", s.outer_cut_off);
        params.set_vec3("spotLight.ambient", s.ambient);
        params.set_vec3("spotLight.diffuse", s.diffuse);
        params.set_vec3("spotLight.specular", s.specular);
        push_attenuation(params, "spotLight", &s.attenuation);
    }
}

fn push_point(params: &mut impl ShaderParams, prefix: &str, light: &PointLight) {
    params.set_vec3(&format!("{prefix}.position"), light.position);
    params.set_vec3(&format!("{prefix}.ambient"), light.ambient);
    params.set_vec3(&format!("{prefix}.diffuse"), light.diffuse);
    params.set_vec3(&format!("{prefix}.specular"), light.specular);
    push_attenuation(params, prefix, &light.attenuation);
}

fn push_attenuation(params: &mut impl ShaderParams, prefix: &str, attenuation: &Attenuation) {
    params.set_float(&format!("{prefix}.constant"), attenuation.constant);
    params.set_float(&format!("{prefix}.linear"), attenuation.linear);
    params.set_float(&format!("{prefix}.quadratic"), attenuation.quadratic);
}

/// Inputs for shading one fragment.
#[derive(Clone, Copy, Debug)]
pub struct Fragment {
    pub position: Vec3,
    pub normal: Vec3,
    pub view_position: Vec3,
    /// Sampled texture color, or `None` for untextured draws.
    pub texel: Option<Vec4>,
    pub object_color: Vec4,
}

/// Base color: the texel when textured, otherwise the material diffuse tinted
/// by the object color.
pub fn base_color(fragment: &Fragment, material: &Material) -> Vec3 {
    match fragment.texel {
        Some(texel) => texel.truncate(),
        None => material.diffuse_color * fragment.object_color.truncate(),
    }
}

/// Final fragment color. With lighting disabled this is the unlit base color.
/// Alpha comes from the texel when textured, otherwise from the object color.
pub fn shade(
    lights: &SceneLights,
    material: &Material,
    fragment: &Fragment,
    use_lighting: bool,
) -> Vec4 {
    let base = base_color(fragment, material);
    let alpha = fragment.texel.map_or(fragment.object_color.w, |texel| texel.w);
    if !use_lighting {
        return base.extend(alpha);
    }

    let normal = fragment.normal.normalize_or_zero();
    let to_view = (fragment.view_position - fragment.position).normalize_or_zero();
    let terms = LightTerms {
        normal,
        to_view,
        base,
        material,
    };

    let d = &lights.directional;
    let mut color = terms.phong(
        (-d.direction).normalize_or_zero(),
        d.ambient,
        d.diffuse,
        d.specular,
    );

    for point in [&lights.point, &lights.point2] {
        let offset = point.position - fragment.position;
        let falloff = point.attenuation.factor(offset.length());
        color += terms.phong(
            offset.normalize_or_zero(),
            point.ambient,
            point.diffuse,
            point.specular,
        ) * falloff;
    }

    let spot = &lights.spot;
    let offset = spot.position - fragment.position;
    let to_light = offset.normalize_or_zero();
    let falloff = spot.attenuation.factor(offset.length()) * spot.cone_factor(to_light);
    color += terms.phong(to_light, spot.ambient, spot.diffuse, spot.specular) * falloff;

    color.extend(alpha)
}

struct LightTerms<'a> {
    normal: Vec3,
    to_view: Vec3,
    base: Vec3,
    material: &'a Material,
}

impl LightTerms<'_> {
    fn phong(&self, to_light: Vec3, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Vec3 {
        let m = self.material;
        let lambert = self.normal.dot(to_light).max(0.0);
        let reflected = reflect(-to_light, self.normal);
        let highlight = self.to_view.dot(reflected).max(0.0).powf(m.shininess);

        ambient * m.ambient_color * m.ambient_strength
            + diffuse * lambert * self.base
            + specular * highlight * m.specular_color
    }
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}
